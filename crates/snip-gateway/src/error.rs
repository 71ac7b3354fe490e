use crate::model::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{CoreError, Interrupted, ShortenerError};
use thiserror::Error;
use tracing::{debug, error};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short url: {0}")]
    InvalidShortCode(String),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("rate limit exceeded")]
    RateLimited,
}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => AppError::InvalidShortCode(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::InvalidBody(value.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(err) => match err {
                ShortenerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::KeyAlreadyExists(_) => StatusCode::CONFLICT,
                ShortenerError::StorageCapacityReached => StatusCode::INSUFFICIENT_STORAGE,
                ShortenerError::Interrupted(Interrupted::Cancelled)
                | ShortenerError::Interrupted(Interrupted::DeadlineExceeded) => {
                    StatusCode::REQUEST_TIMEOUT
                }
                ShortenerError::Generator(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::InvalidUrl(_) | AppError::InvalidShortCode(_) | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::INSUFFICIENT_STORAGE {
            error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
