//! Persistence seams for products, users and access tokens.
//!
//! [`PgStore`] is the production implementation; [`MemoryStore`] keeps everything in
//! process and backs the test suite.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::str::FromStr;

use crate::error::{AppError, ConfigError};
use crate::models::{AccessToken, NewProduct, NewUser, Product, ProductChanges, User};

/// Product records. Soft-deleted rows are invisible to every method here.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products with status = 1, ordered by id.
    async fn list_active(&self) -> Result<Vec<Product>, AppError>;

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError>;

    /// Insert with status = 1 and both timestamps set to now.
    async fn insert_product(&self, new: NewProduct) -> Result<Product, AppError>;

    /// Overwrite name, detail and updated_by. Returns `None` when the product is missing.
    async fn update_product(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError>;

    /// Set status = 0 and updated_by, then stamp deleted_at. Returns false when missing.
    async fn soft_delete_product(&self, id: i64, deleted_by: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with a validation error on the `email` field when the address is taken.
    async fn insert_user(&self, new: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_token(&self, user_id: i64, name: &str, digest: &str) -> Result<AccessToken, AppError>;

    async fn find_token(&self, id: i64) -> Result<Option<AccessToken>, AppError>;

    async fn find_token_by_digest(&self, digest: &str) -> Result<Option<AccessToken>, AppError>;

    async fn touch_token(&self, id: i64) -> Result<(), AppError>;

    /// Returns false when the token did not exist.
    async fn revoke_token(&self, id: i64) -> Result<bool, AppError>;
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: ProductStore + UserStore + TokenStore {
    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Create the database named in `database_url` if it does not exist (connects to `postgres` db to run CREATE DATABASE).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_database_url(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres`, `db`).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| invalid_database_url("missing database path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

/// Credentials stay out of the message; only the parse failure is reported.
fn invalid_database_url(reason: String) -> AppError {
    ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value: reason,
    }
    .into()
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
