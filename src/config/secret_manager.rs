use std::fmt;

use crate::config::{EnvironmentProvider, SecretConfig, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// Holds the JWT signing key, the password pepper and the key used to
/// hash refresh tokens before they are stored.
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
    refresh_token_secret: String,
}

impl SecretManager {
    /// Initialize from the process environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or fails validation
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with(&SystemEnvironment)
    }

    /// Initialize from an arbitrary environment provider
    pub fn init_with(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let pepper = Self::load_secret(env, &Self::pepper_config())?;
        let refresh_token_secret = Self::load_secret(env, &Self::refresh_token_config())?;

        Ok(Self {
            jwt_secret,
            pepper,
            refresh_token_secret,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env("JWT_SECRET").required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PEPPER").required(true).min_length(16)
    }

    fn refresh_token_config() -> SecretConfig {
        SecretConfig::env("REFRESH_TOKEN_SECRET")
            .required(true)
            .min_length(32)
    }

    /// Get the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    /// Get the key for refresh token HMACs
    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    /// Load a secret based on its configuration
    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let name = config.secret_type.name();

        let value = match env.get_var(name) {
            Some(v) => v,
            None if !config.required => return Ok(String::new()),
            None => return Err(SecretError::missing(name)),
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const PEPPER: &str = "valid-pepper-16ch";
    const REFRESH: &str = "refresh-secret-with-at-least-32-chars";

    fn full_env() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            ("JWT_SECRET", JWT),
            ("PEPPER", PEPPER),
            ("REFRESH_TOKEN_SECRET", REFRESH),
        ])
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let manager = SecretManager::init_with(&full_env()).unwrap();

        assert_eq!(manager.jwt_secret(), JWT);
        assert_eq!(manager.pepper(), PEPPER);
        assert_eq!(manager.refresh_token_secret(), REFRESH);
    }

    #[test]
    fn test_error_when_jwt_secret_missing() {
        let env = MockEnvironment::empty()
            .with_vars(&[("PEPPER", PEPPER), ("REFRESH_TOKEN_SECRET", REFRESH)]);

        match SecretManager::init_with(&env).unwrap_err() {
            SecretError::Missing { secret_name } => assert_eq!(secret_name, "JWT_SECRET"),
            other => panic!("Expected Missing error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_when_refresh_secret_missing() {
        let env = MockEnvironment::empty().with_vars(&[("JWT_SECRET", JWT), ("PEPPER", PEPPER)]);

        match SecretManager::init_with(&env).unwrap_err() {
            SecretError::Missing { secret_name } => {
                assert_eq!(secret_name, "REFRESH_TOKEN_SECRET")
            }
            other => panic!("Expected Missing error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_when_pepper_too_short() {
        let env = full_env().with_var("PEPPER", "short");

        match SecretManager::init_with(&env).unwrap_err() {
            SecretError::InvalidLength { secret_name, expected, actual } => {
                assert_eq!(secret_name, "PEPPER");
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected InvalidLength error, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_secret_defaults_to_empty() {
        let config = SecretConfig::env("NOT_SET").required(false);
        let value = SecretManager::load_secret(&MockEnvironment::empty(), &config).unwrap();

        assert_eq!(value, "");
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let manager = SecretManager::init_with(&full_env()).unwrap();
        let debug_output = format!("{:?}", manager);

        assert_eq!(debug_output.matches("<redacted>").count(), 3);
        assert!(!debug_output.contains(JWT));
        assert!(!debug_output.contains(PEPPER));
        assert!(!debug_output.contains(REFRESH));
    }

    #[test]
    fn test_display_trait_shows_metadata_only() {
        let manager = SecretManager::init_with(&full_env()).unwrap();

        assert_eq!(format!("{}", manager), "SecretManager { secrets_loaded: 3 }");
    }
}
