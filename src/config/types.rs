//! Runtime configuration values and their defaults.

use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/catalog";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Mount point for the API routes; empty string mounts them at the root.
    pub api_prefix: String,
    pub db_max_connections: u32,
    pub max_body_bytes: usize,
    /// 404 for missing products and 422 for validation errors instead of the legacy 401.
    pub strict_status_codes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            strict_status_codes: false,
        }
    }
}
