//! Registration, login, logout and bearer token resolution.

use serde::{Deserialize, Serialize};

use crate::auth::token::{self, PresentedToken, TOKEN_NAME};
use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::models::{AccessToken, NewUser, User};
use crate::service::validation::scalar_string;
use crate::service::RequestValidator;
use crate::store::{TokenStore, UserStore};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub password_confirmation: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub password: Option<String>,
}

/// `data` of a successful register/login.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub name: String,
}

pub struct AuthService;

impl AuthService {
    pub async fn register<S: UserStore + TokenStore + ?Sized>(
        store: &S,
        input: &RegisterInput,
    ) -> Result<AuthPayload, AppError> {
        let mut v = RequestValidator::new();
        let name = v.required("name", input.name.as_deref());
        let email = v.required("email", input.email.as_deref());
        if let Some(email) = email {
            if v.email("email", email) && store.find_user_by_email(email).await?.is_some() {
                v.taken("email");
            }
        }
        let password = v.required("password", input.password.as_deref());
        if let Some(password) = password {
            v.confirmed("password", password, input.password_confirmation.as_deref());
        }
        v.finish()?;

        let (name, email, password) = (
            name.unwrap_or_default(),
            email.unwrap_or_default(),
            password.unwrap_or_default(),
        );
        let password_hash = hash_password(password).await?;
        let user = store
            .insert_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Self::issue(store, &user).await
    }

    /// Any mismatch, including an unknown email, is reported as invalid credentials.
    pub async fn login<S: UserStore + TokenStore + ?Sized>(
        store: &S,
        input: &LoginInput,
    ) -> Result<AuthPayload, AppError> {
        let (Some(email), Some(password)) = (input.email.as_deref(), input.password.as_deref()) else {
            return Err(AppError::InvalidCredentials);
        };
        let Some(user) = store.find_user_by_email(email).await? else {
            tracing::warn!("login for unknown email");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &user.password).await? {
            tracing::warn!(user_id = user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        tracing::info!(user_id = user.id, "user logged in");
        Self::issue(store, &user).await
    }

    /// Revoke the token the caller authenticated with. Other tokens stay valid.
    pub async fn logout<S: TokenStore + ?Sized>(store: &S, caller: &AuthUser) -> Result<(), AppError> {
        store.revoke_token(caller.token_id).await?;
        tracing::info!(user_id = caller.user_id, token_id = caller.token_id, "token revoked");
        Ok(())
    }

    /// Resolve a bearer token to its owner and record the use.
    pub async fn authenticate<S: UserStore + TokenStore + ?Sized>(
        store: &S,
        bearer: &str,
    ) -> Result<AuthUser, AppError> {
        let record = Self::find_token(store, bearer)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        if store.find_user(record.user_id).await?.is_none() {
            return Err(AppError::Unauthenticated);
        }
        store.touch_token(record.id).await?;
        Ok(AuthUser {
            user_id: record.user_id,
            token_id: record.id,
        })
    }

    async fn find_token<S: TokenStore + ?Sized>(store: &S, bearer: &str) -> Result<Option<AccessToken>, AppError> {
        match token::parse(bearer) {
            Some(PresentedToken::WithId { id, secret }) => Ok(store
                .find_token(id)
                .await?
                .filter(|record| token::matches(&record.token, secret))),
            Some(PresentedToken::Bare(secret)) => store.find_token_by_digest(&token::digest(secret)).await,
            None => Ok(None),
        }
    }

    async fn issue<S: TokenStore + ?Sized>(store: &S, user: &User) -> Result<AuthPayload, AppError> {
        let secret = token::generate_secret();
        let record = store
            .insert_token(user.id, TOKEN_NAME, &token::digest(&secret))
            .await?;
        Ok(AuthPayload {
            token: token::plain_text(record.id, &secret),
            name: user.name.clone(),
        })
    }
}
