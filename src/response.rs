//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

/// Error envelope shared by every failing route: `{success: false, message, error?, errors?}`.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub fn error_body(message: &'static str) -> ErrorBody {
    ErrorBody {
        success: false,
        message,
        error: None,
        errors: None,
    }
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            success: true,
            message: None,
            data,
        }),
    )
}

pub fn success_with_message<T: Serialize>(
    status: StatusCode,
    message: &'static str,
    data: T,
) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        status,
        Json(SuccessOne {
            success: true,
            message: Some(message),
            data,
        }),
    )
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            count: data.len(),
            data,
        }),
    )
}
