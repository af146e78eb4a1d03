//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Missing identifier: {0}")]
    MissingId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error response for the UI layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Url(_) => "URL_ERROR",
            AppError::Api { .. } => "API_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::MissingId(_) => "MISSING_ID",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Stream(_) => "STREAM_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_code_and_message() {
        let err = AppError::MissingId("created checklist has no id".to_string());
        let resp = ErrorResponse::from(err);
        assert_eq!(resp.code, "MISSING_ID");
        assert!(resp.message.contains("created checklist has no id"));
    }
}
