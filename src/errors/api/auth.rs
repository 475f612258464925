use crate::errors::internal::{CredentialError, InternalError, PermissionError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 400)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Submitted account data failed validation
    #[oai(status = 400)]
    BadRequest(Json<AuthErrorResponse>),

    /// No valid session on the request
    #[oai(status = 401)]
    Unauthorized(Json<AuthErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Invalid refresh token
    #[oai(status = 401)]
    InvalidRefreshToken(Json<AuthErrorResponse>),

    /// Refresh token has expired
    #[oai(status = 401)]
    ExpiredRefreshToken(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Unable to log in with provided credentials.".to_string(),
            status_code: 400,
        }))
    }

    /// Create a BadRequest error carrying a validation code
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        AuthError::BadRequest(Json(AuthErrorResponse {
            error: code.to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized(Json(AuthErrorResponse {
            error: "not_authenticated".to_string(),
            message: PermissionError::NotAuthenticated.to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(AuthErrorResponse {
            error: "token_not_valid".to_string(),
            message: "Given token not valid for any token type".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(AuthErrorResponse {
            error: "token_expired".to_string(),
            message: "Token is invalid or expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidRefreshToken error
    pub fn invalid_refresh_token() -> Self {
        AuthError::InvalidRefreshToken(Json(AuthErrorResponse {
            error: "invalid_refresh_token".to_string(),
            message: "Refresh token is invalid".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredRefreshToken error
    pub fn expired_refresh_token() -> Self {
        AuthError::ExpiredRefreshToken(Json(AuthErrorResponse {
            error: "expired_refresh_token".to_string(),
            message: "Refresh token has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint hit during auth operation: {}", err);
                Self::bad_request("duplicate_entry", "A user with these details already exists.")
            }
            InternalError::Database(_) => {
                tracing::error!("Database error in auth operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            // Domain errors - convert to specific API errors
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                if token_type == "refresh_token" {
                    Self::invalid_refresh_token()
                } else {
                    Self::invalid_token()
                }
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                if token_type == "refresh_token" {
                    Self::expired_refresh_token()
                } else {
                    Self::expired_token()
                }
            }
            InternalError::Credential(CredentialError::SessionRevoked(_))
            | InternalError::Permission(PermissionError::NotAuthenticated) => Self::unauthorized(),
            InternalError::Validation(validation) => {
                Self::bad_request(&validation.code, validation.message.clone())
            }

            // Other domain errors that shouldn't appear in auth context
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(AuthErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    fn body(&self) -> &AuthErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::BadRequest(json)
            | AuthError::Unauthorized(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidRefreshToken(json)
            | AuthError::ExpiredRefreshToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the error code from the error variant
    pub fn code(&self) -> &str {
        &self.body().error
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::ValidationError;
    use sea_orm::DbErr;

    #[test]
    fn test_invalid_credentials_message() {
        let err = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());

        assert_eq!(err.message(), "Unable to log in with provided credentials.");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("find_user", DbErr::Custom("boom".to_string()));
        let err = AuthError::from_internal_error(internal_err);

        assert_eq!(err.message(), "An internal error occurred");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_refresh_token_errors_are_distinguished() {
        let invalid = AuthError::from_internal_error(
            CredentialError::invalid_token("refresh_token", "not found").into(),
        );
        let expired = AuthError::from_internal_error(
            CredentialError::ExpiredToken("refresh_token".to_string()).into(),
        );

        assert_eq!(invalid.code(), "invalid_refresh_token");
        assert_eq!(expired.code(), "expired_refresh_token");
    }

    #[test]
    fn test_revoked_session_is_unauthorized() {
        let err = AuthError::from_internal_error(
            CredentialError::SessionRevoked("abc".to_string()).into(),
        );

        assert_eq!(err.status_code(), 401);
        assert_eq!(
            err.message(),
            "Authentication credentials were not provided! Please login to proceed."
        );
    }

    #[test]
    fn test_validation_error_keeps_code() {
        let err = AuthError::from_internal_error(
            ValidationError::new("password_too_short", "This password is too short.").into(),
        );

        assert_eq!(err.code(), "password_too_short");
        assert_eq!(err.status_code(), 400);
    }
}
