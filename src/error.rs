use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::MovieId;

/// Application-level errors
///
/// Every kind is recoverable: handlers surface it to the user and the session
/// keeps going.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("Movie {0} is already rated")]
    DuplicateEntry(MovieId),

    #[error("Invalid rating: {0} (expected a number between 1 and 5)")]
    InvalidRating(String),

    #[error("Rate at least {need} movies before predicting (have {have})")]
    InsufficientRatings { have: usize, need: usize },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Predictor error: {0}")]
    RemoteError(String),

    #[error("Predictor did not respond in time")]
    NetworkTimeout,

    #[error("Predictor unreachable: {0}")]
    NetworkFailure(String),

    #[error("Movie catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("A prediction is already in progress")]
    PredictionInFlight,

    #[error("Prediction was cancelled")]
    PredictionCancelled,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::NetworkTimeout
        } else if err.is_decode() {
            AppError::RemoteError(format!("malformed response: {}", err))
        } else {
            AppError::NetworkFailure(err.to_string())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MovieNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEntry(_)
            | AppError::PredictionInFlight
            | AppError::PredictionCancelled => StatusCode::CONFLICT,
            AppError::InvalidRating(_) | AppError::InsufficientRatings { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::EmptyInput(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::RemoteError(_) | AppError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::NetworkTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The predictor's own message is what the user needs to see
        let message = match self {
            AppError::RemoteError(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
