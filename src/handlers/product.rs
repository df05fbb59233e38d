//! Product CRUD handlers: list, create, show, update, soft-delete.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::handlers::json_body;
use crate::response::{no_errors, send_success};
use crate::service::{ProductInput, ProductService, PRODUCT_NOT_FOUND};
use crate::state::AppState;

/// Ids that are not integers cannot name a product.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.trim().parse().map_err(|_| AppError::NotFound(PRODUCT_NOT_FOUND))
}

pub async fn list_products(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::list(&*state.store).await?;
    Ok(send_success(products, "Products retrieved successfully"))
}

pub async fn create_product(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = json_body(payload)?;
    let product = ProductService::create(&*state.store, &input, caller.user_id).await?;
    Ok(send_success(product, "Product created successfully"))
}

pub async fn show_product(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let product = ProductService::show(&*state.store, id).await?;
    Ok(send_success(product, "Product retrieved successfully"))
}

pub async fn update_product(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id_str): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let input = json_body(payload)?;
    let product = ProductService::update(&*state.store, id, &input, caller.user_id).await?;
    Ok(send_success(product, "Product updated successfully"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    ProductService::delete(&*state.store, id, caller.user_id).await?;
    Ok(send_success(no_errors(), "Product deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
    }
}
