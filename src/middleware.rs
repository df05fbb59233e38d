//! Bearer token gate and status-code policy.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{AppError, ErrorKind};
use crate::extractors::{bearer_token, AuthUser};
use crate::service::AuthService;
use crate::state::AppState;

/// Rejects the request with 401 unless it carries a valid bearer token; on success the
/// resolved [`AuthUser`] is stored in the request extensions.
pub async fn require_token(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        tracing::warn!(path = %req.uri().path(), "missing bearer token");
        return AppError::Unauthenticated.into_response();
    };
    let caller: AuthUser = match AuthService::authenticate(&*state.store, &token).await {
        Ok(caller) => caller,
        Err(err) => {
            if matches!(err, AppError::Unauthenticated) {
                tracing::warn!(path = %req.uri().path(), "invalid bearer token");
            }
            return err.into_response();
        }
    };
    tracing::debug!(user_id = caller.user_id, "authorized request");
    req.extensions_mut().insert(caller);
    next.run(req).await
}

/// With strict status codes, swap the legacy 401 on error envelopes for the conventional status.
pub async fn apply_status_policy(State(state): State<AppState>, mut response: Response) -> Response {
    if state.strict_status_codes {
        if let Some(status) = response
            .extensions()
            .get::<ErrorKind>()
            .and_then(|kind| kind.strict_status())
        {
            *response.status_mut() = status;
        }
    }
    response
}
