//! Token-bearer authentication.
//!
//! Credentials are declared in config as SHA-256 password digests. Token
//! issuance is get-or-create per user: repeated logins hand back the same
//! opaque token. Tokens live in an in-memory store behind a trait seam so a
//! persistent implementation can be swapped in.

use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use supplyline_core::error::SupplyError;

use crate::app_state::AppState;
use crate::config::UserConfig;
use crate::http::ApiError;

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Username/password verification against config-declared digests.
pub struct Credentials {
    users: HashMap<String, String>,
}

impl Credentials {
    pub fn from_users(users: &[UserConfig]) -> Self {
        let users = users
            .iter()
            .map(|u| (u.username.clone(), u.password_sha256.to_ascii_lowercase()))
            .collect();
        Self { users }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(digest) => sha256_hex(password.as_bytes()) == *digest,
            None => false,
        }
    }
}

/// Issued-token registry.
pub trait TokenStore: Send + Sync {
    /// Return the user's token, minting one on first use.
    fn issue(&self, username: &str) -> String;
    /// Resolve a presented token to its username.
    fn resolve(&self, token: &str) -> Option<String>;
}

#[derive(Default)]
pub struct InMemoryTokenStore {
    by_user: DashMap<String, String>,
    by_token: DashMap<String, String>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn issue(&self, username: &str) -> String {
        let token = self
            .by_user
            .entry(username.to_string())
            .or_insert_with(|| Uuid::new_v4().simple().to_string())
            .clone();
        self.by_token.insert(token.clone(), username.to_string());
        token
    }

    fn resolve(&self, token: &str) -> Option<String> {
        self.by_token.get(token).map(|e| e.value().clone())
    }
}

/// Extractor enforcing `Authorization: Bearer <token>` on protected routes.
pub struct AuthUser(pub String);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        match token.and_then(|t| state.tokens().resolve(t)) {
            Some(username) => Ok(AuthUser(username)),
            None => {
                state
                    .metrics()
                    .auth_failures
                    .inc(&[("reason", "missing_or_unknown_token")]);
                Err(SupplyError::AuthFailed.into())
            }
        }
    }
}
