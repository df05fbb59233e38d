//! catalog-server: loads configuration, prepares PostgreSQL, serves the catalog API.
//!
//! Run from repo root: `cargo run -p catalog-server`

use catalog_api::{app, apply_migrations, ensure_database_exists, AppConfig, AppState, PgStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("catalog_api=info,catalog_server=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    apply_migrations(&pool).await?;

    let state = AppState::from_config(Arc::new(PgStore::new(pool)), &config);
    let router = app(state, &config);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        prefix = %config.api_prefix,
        strict_status_codes = config.strict_status_codes,
        "catalog server listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}
