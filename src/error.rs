// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Failures of the quiz pipeline (sampling, sessions, scoring, recording).
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{0}")]
    InvalidScope(String),

    #[error("{0}")]
    InvalidAnswers(String),

    #[error("No questions found for the selected scope")]
    EmptyPool,

    #[error("{0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Quiz already submitted")]
    AlreadySubmitted,

    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type QuizResult<T> = Result<T, QuizError>;

impl From<sqlx::Error> for QuizError {
    fn from(err: sqlx::Error) -> Self {
        QuizError::Storage(err.to_string())
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., quiz already submitted)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Maps the quiz taxonomy onto HTTP semantics.
/// Storage details stay in the logs; the client only sees a generic 500.
impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::InvalidScope(msg) | QuizError::InvalidAnswers(msg) => {
                AppError::BadRequest(msg)
            }
            QuizError::EmptyPool => AppError::NotFound(QuizError::EmptyPool.to_string()),
            QuizError::NotFound(msg) => AppError::NotFound(msg),
            QuizError::Forbidden => AppError::Forbidden("Forbidden".to_string()),
            QuizError::AlreadySubmitted => {
                AppError::Conflict(QuizError::AlreadySubmitted.to_string())
            }
            QuizError::Storage(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Malformed JSON bodies become a 400 with the extractor's message.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Malformed query strings become a 400 with the extractor's message.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
