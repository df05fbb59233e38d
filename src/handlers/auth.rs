//! Register, login and logout handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::handlers::json_body;
use crate::response::{no_errors, send_success};
use crate::service::{AuthService, LoginInput, RegisterInput};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = json_body(payload)?;
    let auth = AuthService::register(&*state.store, &input).await?;
    Ok(send_success(auth, "User registered successfully"))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = json_body(payload)?;
    let auth = AuthService::login(&*state.store, &input).await?;
    Ok(send_success(auth, "User logged in successfully"))
}

pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> Result<impl IntoResponse, AppError> {
    AuthService::logout(&*state.store, &caller).await?;
    Ok(send_success(no_errors(), "User logged out successfully"))
}
