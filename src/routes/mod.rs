//! Router assembly.

pub mod api;
pub mod common;

pub use api::api_routes;
pub use common::common_routes;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;

/// Full application: API routes under `config.api_prefix`, probes at the root.
/// `max_body_bytes` replaces axum's built-in extractor limit as well.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api = api_routes(state.clone());
    let api = if config.api_prefix.is_empty() {
        api
    } else {
        Router::new().nest(&config.api_prefix, api)
    };
    Router::new()
        .merge(common_routes(state))
        .merge(api)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
