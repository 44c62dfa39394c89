// ============================
// crates/backend-lib/src/error.rs
// ============================

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Verification code expired")]
    CodeExpired,

    #[error("Verification code mismatch")]
    CodeMismatch,

    #[error("Too many failed attempts")]
    AttemptsExceeded,

    #[error("A code was issued recently, wait {remaining_secs} seconds before requesting another")]
    Throttled { remaining_secs: i64 },

    #[error("Delivery failure: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::CodeExpired | AppError::CodeMismatch => {
                StatusCode::BAD_REQUEST
            },
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AttemptsExceeded | AppError::Throttled { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            },
            AppError::Delivery(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Unauthorized(_) => "AUTH_001",
            AppError::NotFound(_) => "NF_001",
            AppError::CodeExpired => "CODE_001",
            AppError::CodeMismatch => "CODE_002",
            AppError::AttemptsExceeded => "CODE_003",
            AppError::Throttled { .. } => "RATE_001",
            AppError::Delivery(_) => "MAIL_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a user-safe message; internal details never leave the process.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Invalid credentials".to_string(),
            AppError::Delivery(_) => "Could not deliver the email, try again later".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let mut body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        // Throttled responses carry the wait so clients can show a countdown.
        if let AppError::Throttled { remaining_secs } = self {
            body["error"]["remainingSeconds"] = serde_json::json!(remaining_secs);
        }

        (status, axum::Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("serialization failure: {err}"))
    }
}
