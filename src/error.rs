//! Typed errors and HTTP mapping.
//!
//! Every error is rendered through the response envelope. Domain failures use the
//! legacy 401 status; [`apply_status_policy`](crate::middleware::apply_status_policy)
//! rewrites it when strict status codes are enabled.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::response::{no_errors, send_error, DEFAULT_ERROR_STATUS};
use crate::service::FieldErrors;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} is not valid unicode")]
    NotUnicode { key: &'static str },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("password hashing: {0}")]
    Hash(String),
    #[error("background task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Coarse classification attached to error responses so a layer can remap the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Auth,
    BadRequest,
    Internal,
}

impl ErrorKind {
    /// Status used instead of the legacy 401 when strict status codes are enabled.
    /// `None` keeps whatever status the error was rendered with.
    pub fn strict_status(self) -> Option<StatusCode> {
        match self {
            ErrorKind::NotFound => Some(StatusCode::NOT_FOUND),
            ErrorKind::Validation => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorKind::Auth | ErrorKind::BadRequest | ErrorKind::Internal => None,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::InvalidCredentials | AppError::Unauthenticated => ErrorKind::Auth,
            AppError::Body(_) => ErrorKind::BadRequest,
            AppError::Config(_) | AppError::Db(_) | AppError::Hash(_) | AppError::Join(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let mut response = match self {
            AppError::NotFound(message) => {
                send_error(message, no_errors(), DEFAULT_ERROR_STATUS).into_response()
            }
            AppError::Validation(errors) => {
                send_error("Validation Error", errors.to_value(), DEFAULT_ERROR_STATUS)
                    .into_response()
            }
            AppError::InvalidCredentials => send_error(
                "Unauthorized",
                json!({ "error": "Invalid credentials" }),
                DEFAULT_ERROR_STATUS,
            )
            .into_response(),
            AppError::Unauthenticated => {
                send_error("Unauthenticated.", no_errors(), DEFAULT_ERROR_STATUS).into_response()
            }
            AppError::Body(rejection) => {
                send_error(rejection.body_text(), no_errors(), rejection.status()).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                send_error("Server Error", no_errors(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
        };
        response.extensions_mut().insert(kind);
        response
    }
}
