use crate::errors::internal::{CredentialError, InternalError, PermissionError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for user management endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// User management error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Request rejected by validation
    #[oai(status = 400)]
    BadRequest(Json<AdminErrorResponse>),

    /// Caller is not logged in
    #[oai(status = 401)]
    Unauthorized(Json<AdminErrorResponse>),

    /// Caller lacks the required farm role
    #[oai(status = 403)]
    PermissionDenied(Json<AdminErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

impl AdminError {
    /// Create a BadRequest error
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        AdminError::BadRequest(Json(AdminErrorResponse {
            error: code.to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AdminError::Unauthorized(Json(AdminErrorResponse {
            error: "not_authenticated".to_string(),
            message: PermissionError::NotAuthenticated.to_string(),
            status_code: 401,
        }))
    }

    /// Create a PermissionDenied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        AdminError::PermissionDenied(Json(AdminErrorResponse {
            error: "permission_denied".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    /// Create a UserNotFound error
    pub fn user_not_found(message: impl Into<String>) -> Self {
        AdminError::UserNotFound(Json(AdminErrorResponse {
            error: "user_not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    /// Convert InternalError to AdminError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint hit during user update: {}", err);
                Self::bad_request("duplicate_entry", "A user with these details already exists.")
            }
            InternalError::Database(_) => {
                tracing::error!("Database error in user operation: {}", err);
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

            // Domain errors
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => {
                Self::user_not_found(format!("User with ID {} was not found.", user_id))
            }
            InternalError::NotFound { .. } | InternalError::NoMatches { .. } => {
                Self::user_not_found(err.to_string())
            }
            InternalError::Credential(CredentialError::SessionRevoked(_))
            | InternalError::Permission(PermissionError::NotAuthenticated) => Self::unauthorized(),
            InternalError::Permission(PermissionError::Denied(message)) => {
                Self::permission_denied(message.clone())
            }
            InternalError::Permission(PermissionError::Forbidden { message, .. }) => {
                Self::permission_denied(message.clone())
            }
            InternalError::Validation(validation) => {
                Self::bad_request(&validation.code, validation.message.clone())
            }

            // Other domain errors
            _ => {
                tracing::error!("Unexpected error in user operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AdminError::InternalError(Json(AdminErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::BadRequest(json) => json.0.message.clone(),
            AdminError::Unauthorized(json) => json.0.message.clone(),
            AdminError::PermissionDenied(json) => json.0.message.clone(),
            AdminError::UserNotFound(json) => json.0.message.clone(),
            AdminError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::BadRequest(json) => json.0.status_code,
            AdminError::Unauthorized(json) => json.0.status_code,
            AdminError::PermissionDenied(json) => json.0.status_code,
            AdminError::UserNotFound(json) => json.0.status_code,
            AdminError::InternalError(json) => json.0.status_code,
        }
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
