use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Invalid token: {token_type} - {reason}")]
    InvalidToken {
        token_type: String,
        reason: String,
    },

    #[error("Expired token: {0}")]
    ExpiredToken(String),

    /// The JWT was valid but its session has been logged out or revoked
    #[error("Session revoked: {0}")]
    SessionRevoked(String),
}

impl CredentialError {
    pub fn invalid_token(token_type: &str, reason: &str) -> Self {
        Self::InvalidToken {
            token_type: token_type.to_string(),
            reason: reason.to_string(),
        }
    }
}
