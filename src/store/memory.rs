//! In-process store. Same visibility rules as the PostgreSQL store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ProductStore, Store, TokenStore, UserStore};
use crate::error::AppError;
use crate::models::{AccessToken, NewProduct, NewUser, Product, ProductChanges, User};
use crate::service::FieldErrors;

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    users: Vec<User>,
    tokens: Vec<AccessToken>,
    next_product_id: i64,
    next_user_id: i64,
    next_token_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw row including soft-deleted state; bypasses the soft-delete scope.
    #[cfg(test)]
    pub(crate) async fn product_with_trashed(&self, id: i64) -> Option<Product> {
        self.tables.read().await.products.iter().find(|p| p.id == id).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn token_count(&self, user_id: i64) -> usize {
        self.tables
            .read()
            .await
            .tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.status && !p.is_deleted())
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id && !p.is_deleted())
            .cloned())
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let product = Product {
            id: next_id(&mut tables.next_product_id),
            name: new.name,
            detail: new.detail,
            status: true,
            created_by: Some(new.created_by),
            updated_by: None,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id && !p.is_deleted()) else {
            return Ok(None);
        };
        product.name = changes.name;
        product.detail = changes.detail;
        product.updated_by = Some(changes.updated_by);
        product.updated_at = Some(Utc::now());
        Ok(Some(product.clone()))
    }

    async fn soft_delete_product(&self, id: i64, deleted_by: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id && !p.is_deleted()) else {
            return Ok(false);
        };
        let now = Utc::now();
        product.status = false;
        product.updated_by = Some(deleted_by);
        product.updated_at = Some(now);
        product.deleted_at = Some(now);
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(AppError::Validation(FieldErrors::single(
                "email",
                "The email has already been taken.",
            )));
        }
        let now = Utc::now();
        let user = User {
            id: next_id(&mut tables.next_user_id),
            name: new.name,
            email: new.email,
            password: new.password_hash,
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert_token(&self, user_id: i64, name: &str, digest: &str) -> Result<AccessToken, AppError> {
        let mut tables = self.tables.write().await;
        let token = AccessToken {
            id: next_id(&mut tables.next_token_id),
            user_id,
            name: name.to_string(),
            token: digest.to_string(),
            last_used_at: None,
            created_at: Some(Utc::now()),
        };
        tables.tokens.push(token.clone());
        Ok(token)
    }

    async fn find_token(&self, id: i64) -> Result<Option<AccessToken>, AppError> {
        Ok(self.tables.read().await.tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_token_by_digest(&self, digest: &str) -> Result<Option<AccessToken>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .tokens
            .iter()
            .find(|t| t.token == digest)
            .cloned())
    }

    async fn touch_token(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = tables.tokens.iter_mut().find(|t| t.id == id) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables.tokens.retain(|t| t.id != id);
        Ok(tables.tokens.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
