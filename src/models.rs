//! Persisted records and the inputs used to write them.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub detail: String,
    /// `true` = active (rendered as 1), `false` = inactive (0).
    pub status: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the product is soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub detail: String,
    pub created_by: i64,
}

#[derive(Clone, Debug)]
pub struct ProductChanges {
    pub name: String,
    pub detail: String,
    pub updated_by: i64,
}

#[derive(Clone, Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone, Debug, FromRow)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// SHA-256 hex digest of the secret half of the plain-text token.
    pub token: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}
