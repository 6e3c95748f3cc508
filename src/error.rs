//! Typed errors and HTTP mapping.

use crate::response::{error_body, ErrorBody};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Startup configuration could not be resolved.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: expected {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid todo id: {0}")]
    InvalidId(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("todo not found: {0}")]
    NotFound(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store: {0}")]
    Store(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::InvalidId(_) => error_body("Invalid todo id."),
            AppError::Validation(messages) => ErrorBody {
                errors: Some(messages.clone()),
                ..error_body("Validation failed.")
            },
            AppError::BadRequest(detail) => ErrorBody {
                error: Some(detail.clone()),
                ..error_body("Invalid request body.")
            },
            AppError::NotFound(_) => error_body("Todo not found."),
            AppError::Db(e) => ErrorBody {
                error: Some(e.to_string()),
                ..error_body("A server error occurred.")
            },
            AppError::Store(detail) => ErrorBody {
                error: Some(detail.clone()),
                ..error_body("A server error occurred.")
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
