use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::{SessionStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Verifies who the caller is: password logins and bearer tokens
pub struct AuthenticationProvider {
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
}

impl AuthenticationProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        session_store: Arc<SessionStore>,
        crypto_provider: Arc<CryptoProvider>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            user_store,
            session_store,
            crypto_provider,
            token_provider,
        }
    }

    /// Check a username and password
    ///
    /// Unknown users and wrong passwords give the same error so the response
    /// does not reveal which usernames exist.
    pub async fn verify_credential(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let Some(user) = self.user_store.find_by_username(conn, username).await? else {
            return Err(CredentialError::InvalidCredentials.into());
        };

        if self
            .crypto_provider
            .verify_password(&user.password_hash, password)
            .await?
        {
            Ok(user)
        } else {
            Err(CredentialError::InvalidCredentials.into())
        }
    }

    /// Resolve a bearer token to claims
    ///
    /// The JWT must validate and its session must still exist; logging out
    /// or a role change deletes the session.
    pub async fn authenticate(&self, conn: &impl ConnectionTrait, token: &str) -> Result<Claims, InternalError> {
        let claims = self.token_provider.validate_jwt(token)?;

        if self.session_store.find(conn, &claims.jti).await?.is_none() {
            return Err(CredentialError::SessionRevoked(claims.jti).into());
        }

        Ok(claims)
    }
}
