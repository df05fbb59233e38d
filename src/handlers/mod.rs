//! HTTP handlers for products and authentication.

pub mod auth;
pub mod product;
pub use auth::*;
pub use product::*;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::AppError;

/// Unwrap a JSON body; rejections keep their own status (400, 413, 415, 422).
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(body) = payload?;
    Ok(body)
}
