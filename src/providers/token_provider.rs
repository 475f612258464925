use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::prelude::*;
use std::fmt;
use std::sync::Arc;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::CryptoProvider;
use crate::types::db::user;
use crate::types::internal::auth::{Claims, RoleFlags};

/// Provides JWT generation and validation plus refresh token operations
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    crypto_provider: Arc<CryptoProvider>,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, crypto_provider: Arc<CryptoProvider>) -> Self {
        Self {
            secret_manager,
            crypto_provider,
            jwt_expiration_minutes: 15,
            refresh_expiration_days: 7,
        }
    }

    /// Generate an access JWT for `user` bound to session `jti`
    ///
    /// Role flags are copied from the user row at the time of issue.
    pub fn generate_jwt(&self, user: &user::Model, jti: &str) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        let roles = RoleFlags::from(user);

        let claims = Claims {
            sub: user.id.to_string(),
            exp: now + (self.jwt_expiration_minutes * 60),
            iat: now,
            jti: jti.to_string(),
            is_farm_owner: roles.is_farm_owner,
            is_farm_manager: roles.is_farm_manager,
            is_assistant_farm_manager: roles.is_assistant_farm_manager,
            is_team_leader: roles.is_team_leader,
            is_farm_worker: roles.is_farm_worker,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Validate a JWT and return its claims
    ///
    /// Expired tokens are reported separately from tampered or malformed ones.
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken("jwt".to_string()).into(),
            _ => {
                tracing::debug!("JWT rejected: {}", e);
                CredentialError::invalid_token("jwt", "invalid signature or malformed").into()
            }
        })
    }

    /// Generate a refresh token: 32 random bytes, base64 encoded
    pub fn generate_refresh_token(&self) -> String {
        let random_bytes: [u8; 32] = rand::rng().random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token for storage
    pub fn hash_refresh_token(&self, token: &str) -> Result<String, InternalError> {
        self.crypto_provider
            .hmac_sha256_token(self.secret_manager.refresh_token_secret(), token)
    }

    /// Lifetime of an access JWT in seconds
    pub fn jwt_expiration_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Unix timestamp at which a refresh token issued now expires
    pub fn get_refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + (self.refresh_expiration_days * 24 * 60 * 60)
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}min, refresh_expiration: {}days }}",
            self.jwt_expiration_minutes, self.refresh_expiration_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{TEST_JWT_SECRET, sample_user, test_secret_manager};

    fn create_test_token_provider() -> TokenProvider {
        let secret_manager = test_secret_manager();
        let crypto = Arc::new(CryptoProvider::new(secret_manager.clone()));
        TokenProvider::new(secret_manager, crypto)
    }

    fn decode_unchecked(token: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn test_jwt_expiration_is_15_minutes() {
        let provider = create_test_token_provider();
        let token = provider.generate_jwt(&sample_user(7, "amina"), "session-1").unwrap();

        let claims = decode_unchecked(&token);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.jti, "session-1");
    }

    #[test]
    fn test_jwt_carries_role_flags() {
        let provider = create_test_token_provider();
        let mut user = sample_user(3, "mwangi");
        user.is_team_leader = true;
        user.is_farm_worker = true;

        let claims = provider
            .validate_jwt(&provider.generate_jwt(&user, "session-2").unwrap())
            .unwrap();

        assert!(claims.is_team_leader);
        assert!(claims.is_farm_worker);
        assert!(!claims.is_farm_owner);
        assert_eq!(claims.user_id(), Some(3));
    }

    #[test]
    fn test_validate_rejects_tampered_token() {
        let provider = create_test_token_provider();
        let mut token = provider.generate_jwt(&sample_user(1, "owner"), "s").unwrap();
        token.push('x');

        let err = provider.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[test]
    fn test_validate_reports_expired_token() {
        let provider = create_test_token_provider();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            exp: now - 3600,
            iat: now - 7200,
            jti: "old".to_string(),
            is_farm_owner: true,
            is_farm_manager: false,
            is_assistant_farm_manager: false,
            is_team_leader: false,
            is_farm_worker: false,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        let err = provider.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::ExpiredToken(_))));
    }

    #[test]
    fn test_generate_refresh_token_creates_unique_tokens() {
        let provider = create_test_token_provider();
        let first = provider.generate_refresh_token();
        let second = provider.generate_refresh_token();

        assert_ne!(first, second);
        assert_eq!(first.len(), 44);
    }

    #[test]
    fn test_refresh_hash_is_stable() {
        let provider = create_test_token_provider();
        let token = provider.generate_refresh_token();

        assert_eq!(
            provider.hash_refresh_token(&token).unwrap(),
            provider.hash_refresh_token(&token).unwrap()
        );
        assert_ne!(provider.hash_refresh_token(&token).unwrap(), token);
    }

    #[test]
    fn test_debug_and_display_do_not_expose_secrets() {
        let provider = create_test_token_provider();
        let debug_output = format!("{:?}", provider);
        let display_output = format!("{}", provider);

        assert!(!debug_output.contains(TEST_JWT_SECRET));
        assert_eq!(debug_output.matches("<redacted>").count(), 1);
        assert!(display_output.contains("15min"));
        assert!(display_output.contains("7days"));
    }
}
