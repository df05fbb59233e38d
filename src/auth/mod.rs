//! Credential primitives: password hashing and bearer token encoding.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
