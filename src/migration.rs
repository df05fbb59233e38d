//! Schema DDL for users, products and personal access tokens.
//! Every statement is idempotent (IF NOT EXISTS) so this runs on every start.

use crate::error::AppError;
use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ,
        updated_at TIMESTAMPTZ
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_unique ON users (email)",
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        detail TEXT NOT NULL,
        status BOOLEAN NOT NULL DEFAULT TRUE,
        created_by BIGINT,
        updated_by BIGINT,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS personal_access_tokens (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        token TEXT NOT NULL,
        last_used_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS personal_access_tokens_token_unique ON personal_access_tokens (token)",
    "CREATE INDEX IF NOT EXISTS personal_access_tokens_user_id_index ON personal_access_tokens (user_id)",
];

/// Create the catalog tables and indexes when missing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in STATEMENTS {
        tracing::debug!(sql = %sql.trim(), "migration");
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!(statements = STATEMENTS.len(), "migrations applied");
    Ok(())
}
