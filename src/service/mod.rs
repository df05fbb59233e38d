//! Product and auth operations over the store traits, plus request validation.

mod auth;
mod products;
mod validation;
pub use auth::{AuthPayload, AuthService, LoginInput, RegisterInput};
pub use products::{ProductInput, ProductService, PRODUCT_NOT_FOUND};
pub use validation::{FieldErrors, RequestValidator};
