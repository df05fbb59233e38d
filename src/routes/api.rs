//! Catalog API routes: public register/login, token-gated product CRUD and logout.

use crate::handlers::{
    create_product, delete_product, list_products, login, logout, register, show_product,
    update_product,
};
use crate::middleware::{apply_status_policy, require_token};
use crate::state::AppState;
use axum::{
    middleware::{from_fn_with_state, map_response_with_state},
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/listProducts", get(list_products))
        .route("/addProduct", post(create_product))
        .route("/showProduct/:id", get(show_product))
        .route("/updateProduct/:id", post(update_product))
        .route("/deleteProduct/:id", post(delete_product))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
        .layer(map_response_with_state(state.clone(), apply_status_policy))
        .with_state(state)
}
