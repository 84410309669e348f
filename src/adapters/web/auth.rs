//! Authentication backend for axum-login.
//!
//! Multi-user: credentials are verified against the `users` table through the
//! store port. The session auth hash is the stored password hash, so changing
//! a password invalidates existing sessions.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use axum_login::{AuthUser, AuthnBackend, UserId};
use rand::rngs::OsRng;
use std::sync::Arc;

use crate::domain::account::User;
use crate::domain::error::StocksimError;
use crate::ports::store_port::StorePort;

/// The identity carried by the session: user id, display name, and the
/// password hash bytes axum-login uses to validate the session cookie.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pw_hash_bytes: Vec<u8>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            pw_hash_bytes: user.password_hash.as_bytes().to_vec(),
        }
    }
}

impl AuthUser for SessionUser {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        &self.pw_hash_bytes
    }
}

/// Login credentials submitted via the login form.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn StorePort>,
}

impl Backend {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }
}

impl AuthnBackend for Backend {
    type User = SessionUser;
    type Credentials = Credentials;
    type Error = StocksimError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Some(user) = self.store.find_user_by_username(&creds.username)? else {
            return Ok(None);
        };

        let parsed_hash = match PasswordHash::new(&user.password_hash) {
            Ok(h) => h,
            Err(_) => return Ok(None),
        };

        let argon2 = Argon2::default();
        if argon2
            .verify_password(creds.password.as_bytes(), &parsed_hash)
            .is_ok()
        {
            Ok(Some(SessionUser::from(&user)))
        } else {
            Ok(None)
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(self
            .store
            .find_user_by_id(*user_id)?
            .map(|u| SessionUser::from(&u)))
    }
}

/// Argon2id hash of a password with a freshly generated salt. The plaintext
/// is never stored.
pub fn hash_password(password: &str) -> Result<String, StocksimError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StocksimError::PasswordHash {
            reason: e.to_string(),
        })
}
