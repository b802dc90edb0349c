use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::{ServiceError, ValidationErrors};
use thiserror::Error;
use tracing::error;

/// Field key for request bodies that could not be read or deserialized.
pub const BODY_FIELD: &str = "body";

pub const GENERIC_DETAIL: &str = "A problem happened while handling your request.";

/// Problem-details style error body: `{status, title, detail?, errors?}`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonApiError {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

fn serialize_status<S: serde::Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail, errors: None }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "One or more validation errors occurred.".into(),
            detail: None,
            errors: Some(errors),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(detail) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail)),
            ServiceError::Validation(errors) => Self::validation(errors),
            other @ (ServiceError::Db(_) | ServiceError::SaveFailed) => {
                // 不向客户端暴露内部错误
                error!(severity = "critical", error = %other, "unhandled error while handling request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(GENERIC_DETAIL.into()))
            }
        }
    }
}

/// Malformed or mistyped JSON bodies are reported as validation errors under `body`.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(ValidationErrors::single(BODY_FIELD, rejection.body_text()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("listener failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
