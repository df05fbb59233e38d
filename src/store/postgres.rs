//! PostgreSQL store over a sqlx pool.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ProductStore, Store, TokenStore, UserStore};
use crate::error::AppError;
use crate::models::{AccessToken, NewProduct, NewUser, Product, ProductChanges, User};
use crate::service::FieldErrors;

const PRODUCT_COLUMNS: &str =
    "id, name, detail, status, created_by, updated_by, created_at, updated_at, deleted_at";
const USER_COLUMNS: &str = "id, name, email, password, created_at, updated_at";
const TOKEN_COLUMNS: &str = "id, user_id, name, token, last_used_at, created_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {} FROM products WHERE status = TRUE AND deleted_at IS NULL ORDER BY id",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = $1 AND deleted_at IS NULL",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (name, detail, status, created_by, created_at, updated_at) \
             VALUES ($1, $2, TRUE, $3, NOW(), NOW()) RETURNING {}",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(&new.name)
            .bind(&new.detail)
            .bind(new.created_by)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_product(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET name = $2, detail = $3, updated_by = $4, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.detail)
            .bind(changes.updated_by)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn soft_delete_product(&self, id: i64, deleted_by: i64) -> Result<bool, AppError> {
        let sql = "UPDATE products SET status = FALSE, updated_by = $2, updated_at = NOW(), deleted_at = NOW() \
                   WHERE id = $1 AND deleted_at IS NULL";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(id)
            .bind(deleted_by)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (name, email, password, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, User>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Validation(FieldErrors::single("email", "The email has already been taken."))
                }
                other => AppError::Db(other),
            })
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn insert_token(&self, user_id: i64, name: &str, digest: &str) -> Result<AccessToken, AppError> {
        let sql = format!(
            "INSERT INTO personal_access_tokens (user_id, name, token, created_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING {}",
            TOKEN_COLUMNS
        );
        tracing::debug!(sql = %sql, user_id, "query");
        Ok(sqlx::query_as::<_, AccessToken>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(digest)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_token(&self, id: i64) -> Result<Option<AccessToken>, AppError> {
        let sql = format!("SELECT {} FROM personal_access_tokens WHERE id = $1", TOKEN_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, AccessToken>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_token_by_digest(&self, digest: &str) -> Result<Option<AccessToken>, AppError> {
        let sql = format!("SELECT {} FROM personal_access_tokens WHERE token = $1", TOKEN_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, AccessToken>(&sql)
            .bind(digest)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn touch_token(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE personal_access_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM personal_access_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
