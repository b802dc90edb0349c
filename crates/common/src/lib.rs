//! Shared building blocks for the City Info workspace: logging setup and
//! response types reused by the server and the binaries.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn health_serializes_status() {
        let json = serde_json::to_value(types::Health { status: "ok" }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[test]
    fn log_format_parses_from_str() {
        assert_eq!("json".parse::<utils::logging::LogFormat>(), Ok(utils::logging::LogFormat::Json));
        assert_eq!("COMPACT".parse::<utils::logging::LogFormat>(), Ok(utils::logging::LogFormat::Compact));
        assert!("pretty".parse::<utils::logging::LogFormat>().is_err());
    }
}
