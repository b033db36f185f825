use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Generator output is not valid JSON, even after fence stripping.
    /// `raw` is the untouched generator text and must be shown to the user.
    #[error("Generator output could not be parsed: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generator output parsed, but `recommendations` is not a list.
    #[error("Generator output has an invalid shape: recommendations is not a list")]
    InvalidShape { raw: String },
}

impl AppError {
    /// Raw generator text attached to this error, if any
    pub fn raw(&self) -> Option<&str> {
        match self {
            AppError::Parse { raw, .. } | AppError::InvalidShape { raw } => Some(raw),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_)
            | AppError::HttpClient(_)
            | AppError::Parse { .. }
            | AppError::InvalidShape { .. } => StatusCode::BAD_GATEWAY,
        };

        let message = match &self {
            AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::ExternalApi(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = match self.raw() {
            Some(raw) => json!({ "error": message, "raw": raw }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
