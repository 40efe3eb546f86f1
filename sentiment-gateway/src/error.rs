//! Error types for the sentiment gateway.

use axum::http::StatusCode;

/// Generic message returned to callers for internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error raised while handling a single invocation.
///
/// Every stage of the pipeline produces one of these; the response builder
/// turns it into a status code and error body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The caller sent something unusable, or the endpoint answered with a
    /// well-formed but unusable payload.
    #[error("{0}")]
    Validation(String),

    /// The inference endpoint failed after all retries.
    #[error("Inference endpoint error ({}): {message}", code_or_unknown(.code))]
    Service {
        code: Option<String>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn code_or_unknown(code: &Option<String>) -> &str {
    code.as_deref().unwrap_or("unknown")
}

/// Closed classification of [`Error`] reported to callers as `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Service,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Service => "ServiceError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Service { .. } => ErrorKind::Service,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Error code reported by the inference endpoint, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Service { code, .. } => match code.as_deref() {
                Some("ValidationException" | "ModelError") => StatusCode::BAD_REQUEST,
                Some("ThrottlingException" | "ServiceUnavailable") => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Internal details are only logged.
    pub fn caller_message(&self) -> String {
        match self {
            Error::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
