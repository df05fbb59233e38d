//! Catalog API: product catalog CRUD over axum and sqlx with bearer-token auth.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use extractors::AuthUser;
pub use migration::apply_migrations;
pub use resource::ProductView;
pub use response::{send_error, send_success};
pub use routes::{api_routes, app, common_routes};
pub use service::{AuthService, ProductService};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
