use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message shown when a list snapshot cannot be read
pub const LOAD_FAILURE_MESSAGE: &str = "Unable to load items.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Please sign in to spin the wheel.")]
    NotAuthenticated,

    #[error("Unknown list type: {0}")]
    InvalidTarget(String),

    #[error("Failed to load list snapshot: {0}")]
    LoadFailure(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error came from reading the store rather than from the request itself
    pub fn is_load_failure(&self) -> bool {
        matches!(self, AppError::LoadFailure(_) | AppError::HttpClient(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidTarget(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            // Store details stay in the logs
            AppError::LoadFailure(_) | AppError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, LOAD_FAILURE_MESSAGE.to_string())
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
