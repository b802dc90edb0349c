//! Outbound notification sink. Both implementations only log; there is no
//! mail transport behind them.

use tracing::info;

/// Fire-and-forget notification channel.
pub trait MailService: Send + Sync {
    fn send(&self, subject: &str, message: &str);
}

/// Mail sink used during local development.
#[derive(Debug, Clone)]
pub struct LocalMailService {
    from_address: String,
    to_address: String,
}

impl LocalMailService {
    pub fn new(from_address: impl Into<String>, to_address: impl Into<String>) -> Self {
        Self { from_address: from_address.into(), to_address: to_address.into() }
    }
}

impl MailService for LocalMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            mail_service = "local",
            from = %self.from_address,
            to = %self.to_address,
            subject,
            message,
            "mail sent"
        );
    }
}

/// Mail sink standing in for a hosted provider in release builds.
#[derive(Debug, Clone)]
pub struct CloudMailService {
    from_address: String,
    to_address: String,
}

impl CloudMailService {
    pub fn new(from_address: impl Into<String>, to_address: impl Into<String>) -> Self {
        Self { from_address: from_address.into(), to_address: to_address.into() }
    }
}

impl MailService for CloudMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            mail_service = "cloud",
            from = %self.from_address,
            to = %self.to_address,
            subject,
            message,
            "mail sent"
        );
    }
}

/// Recording sink for tests and doc examples
pub mod mock {
    use std::sync::Mutex;

    use super::MailService;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentMail {
        pub subject: String,
        pub message: String,
    }

    #[derive(Debug, Default)]
    pub struct RecordingMailService {
        sent: Mutex<Vec<SentMail>>,
    }

    impl RecordingMailService {
        pub fn sent(&self) -> Vec<SentMail> {
            match self.sent.lock() {
                Ok(sent) => sent.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            }
        }
    }

    impl MailService for RecordingMailService {
        fn send(&self, subject: &str, message: &str) {
            let mail = SentMail { subject: subject.to_string(), message: message.to_string() };
            match self.sent.lock() {
                Ok(mut sent) => sent.push(mail),
                Err(poisoned) => poisoned.into_inner().push(mail),
            }
        }
    }
}
