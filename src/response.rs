//! Standard response envelope helpers.
//!
//! Every endpoint answers with `{success, data, message}` on success or
//! `{success, message, errors}` on failure.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// Status used by [`send_error`] callers that do not pick one.
pub const DEFAULT_ERROR_STATUS: StatusCode = StatusCode::UNAUTHORIZED;

#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
    pub errors: Value,
}

pub fn send_success<T: Serialize>(data: T, message: impl Into<String>) -> (StatusCode, Json<Success<T>>) {
    (
        StatusCode::OK,
        Json(Success {
            success: true,
            data,
            message: message.into(),
        }),
    )
}

pub fn send_error(message: impl Into<String>, errors: Value, code: StatusCode) -> (StatusCode, Json<Failure>) {
    (
        code,
        Json(Failure {
            success: false,
            message: message.into(),
            errors,
        }),
    )
}

/// Empty `errors` / `data` payload: `[]`.
pub fn no_errors() -> Value {
    Value::Array(Vec::new())
}
