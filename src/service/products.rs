//! Product operations on top of a [`ProductStore`].

use serde::Deserialize;

use crate::error::AppError;
use crate::models::{NewProduct, ProductChanges};
use crate::resource::ProductView;
use crate::service::validation::scalar_string;
use crate::service::RequestValidator;
use crate::store::ProductStore;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Width of the `products.name` column.
pub const NAME_MAX_CHARS: usize = 255;

/// Body of add/update requests. Fields are optional so absence is reported as a validation error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub detail: Option<String>,
}

impl ProductInput {
    fn validated(&self) -> Result<(String, String), AppError> {
        let mut v = RequestValidator::new();
        let name = v.required("name", self.name.as_deref());
        if let Some(name) = name {
            v.max("name", name, NAME_MAX_CHARS);
        }
        let name = name.map(str::to_string);
        let detail = v.required("detail", self.detail.as_deref()).map(str::to_string);
        v.finish()?;
        Ok((name.unwrap_or_default(), detail.unwrap_or_default()))
    }
}

pub struct ProductService;

impl ProductService {
    pub async fn list<S: ProductStore + ?Sized>(store: &S) -> Result<Vec<ProductView>, AppError> {
        let products = store.list_active().await?;
        tracing::debug!(count = products.len(), "products listed");
        Ok(products.iter().map(ProductView::from).collect())
    }

    pub async fn create<S: ProductStore + ?Sized>(
        store: &S,
        input: &ProductInput,
        caller_id: i64,
    ) -> Result<ProductView, AppError> {
        let (name, detail) = input.validated()?;
        let product = store
            .insert_product(NewProduct {
                name,
                detail,
                created_by: caller_id,
            })
            .await?;
        tracing::info!(product_id = product.id, caller_id, "product created");
        Ok(product.into())
    }

    pub async fn show<S: ProductStore + ?Sized>(store: &S, id: i64) -> Result<ProductView, AppError> {
        store
            .find_product(id)
            .await?
            .map(ProductView::from)
            .ok_or(AppError::NotFound(PRODUCT_NOT_FOUND))
    }

    /// Lookup comes before validation, so a missing product wins over a bad body.
    pub async fn update<S: ProductStore + ?Sized>(
        store: &S,
        id: i64,
        input: &ProductInput,
        caller_id: i64,
    ) -> Result<ProductView, AppError> {
        if store.find_product(id).await?.is_none() {
            return Err(AppError::NotFound(PRODUCT_NOT_FOUND));
        }
        let (name, detail) = input.validated()?;
        let product = store
            .update_product(
                id,
                ProductChanges {
                    name,
                    detail,
                    updated_by: caller_id,
                },
            )
            .await?
            .ok_or(AppError::NotFound(PRODUCT_NOT_FOUND))?;
        tracing::info!(product_id = id, caller_id, "product updated");
        Ok(product.into())
    }

    pub async fn delete<S: ProductStore + ?Sized>(store: &S, id: i64, caller_id: i64) -> Result<(), AppError> {
        if !store.soft_delete_product(id, caller_id).await? {
            return Err(AppError::NotFound(PRODUCT_NOT_FOUND));
        }
        tracing::info!(product_id = id, caller_id, "product soft-deleted");
        Ok(())
    }
}
