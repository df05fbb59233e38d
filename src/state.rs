//! Shared application state for all routes.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// When set, not-found and validation errors use 404 / 422 instead of 401.
    pub strict_status_codes: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        AppState {
            store,
            strict_status_codes: false,
        }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        AppState {
            store,
            strict_status_codes: config.strict_status_codes,
        }
    }

    pub fn with_strict_status_codes(mut self, strict: bool) -> Self {
        self.strict_status_codes = strict;
        self
    }
}
