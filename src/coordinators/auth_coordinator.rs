use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{AuthenticationProvider, PermissionProvider, TokenProvider};
use crate::stores::{SessionStore, UserStore};
use crate::types::dto::auth::{RefreshResponse, TokenResponse};
use crate::types::internal::context::RequestContext;

const TOKEN_TYPE: &str = "Bearer";

/// Authentication coordinator that orchestrates login, logout, and token refresh workflows
///
/// Every login opens a session whose id is the JWT `jti`. The refresh token is
/// stored only as an HMAC hash on that session.
pub struct AuthCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    token_provider: Arc<TokenProvider>,
    authentication_provider: Arc<AuthenticationProvider>,
    permission_provider: Arc<PermissionProvider>,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            session_store: app_data.session_store.clone(),
            token_provider: app_data.token_provider.clone(),
            authentication_provider: app_data.authentication_provider.clone(),
            permission_provider: app_data.permission_provider.clone(),
        }
    }

    /// Orchestrate a complete login workflow
    ///
    /// 1. Verify credentials
    /// 2. Open a session with a fresh id
    /// 3. Issue the access JWT for that session
    /// 4. Issue a refresh token and store its hash on the session
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, InternalError> {
        let user = match self
            .authentication_provider
            .verify_credential(&self.db, username, password)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Failed login for '{}'", username);
                return Err(e);
            }
        };

        let session_id = Uuid::new_v4().to_string();
        let access_token = self.token_provider.generate_jwt(&user, &session_id)?;

        let refresh_token = self.token_provider.generate_refresh_token();
        let refresh_hash = self.token_provider.hash_refresh_token(&refresh_token)?;
        let expires_at = self.token_provider.get_refresh_expiration();

        self.session_store
            .create(
                &self.db,
                &session_id,
                user.id,
                &refresh_hash,
                Utc::now().timestamp(),
                expires_at,
            )
            .await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "User logged in");

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.token_provider.jwt_expiration_seconds(),
        })
    }

    /// Issue a new access JWT for the session owning `refresh_token`
    ///
    /// Expired sessions are removed on the way out.
    pub async fn refresh(&self, ctx: &RequestContext, refresh_token: &str) -> Result<RefreshResponse, InternalError> {
        let refresh_hash = self.token_provider.hash_refresh_token(refresh_token)?;

        let Some(session) = self
            .session_store
            .find_by_refresh_hash(&self.db, &refresh_hash)
            .await?
        else {
            tracing::debug!(request_id = %ctx.request_id, "Unknown refresh token");
            return Err(CredentialError::invalid_token("refresh_token", "not found").into());
        };

        if session.expires_at < Utc::now().timestamp() {
            self.session_store.delete(&self.db, &session.id).await?;
            return Err(CredentialError::ExpiredToken("refresh_token".to_string()).into());
        }

        let Some(user) = self.user_store.find_by_id(&self.db, session.user_id).await? else {
            self.session_store.delete(&self.db, &session.id).await?;
            return Err(CredentialError::invalid_token("refresh_token", "user no longer exists").into());
        };

        let access_token = self.token_provider.generate_jwt(&user, &session.id)?;
        tracing::debug!(request_id = %ctx.request_id, user_id = user.id, "Access token refreshed");

        Ok(RefreshResponse {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.token_provider.jwt_expiration_seconds(),
        })
    }

    /// End the caller's session; its access and refresh tokens stop working
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let claims = self.permission_provider.require_authenticated(ctx)?;
        self.session_store.delete(&self.db, &claims.jti).await?;
        tracing::info!(request_id = %ctx.request_id, user_id = %claims.sub, "User logged out");
        Ok(())
    }
}
