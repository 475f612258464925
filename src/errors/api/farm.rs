use crate::errors::internal::{CredentialError, InternalError, PermissionError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for farm record endpoints
#[derive(Object, Debug)]
pub struct FarmErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Farm record error types
#[derive(ApiResponse, Debug)]
pub enum FarmError {
    /// A farm rule rejected the request
    #[oai(status = 400)]
    BadRequest(Json<FarmErrorResponse>),

    /// Caller is not logged in
    #[oai(status = 401)]
    Unauthorized(Json<FarmErrorResponse>),

    /// Caller lacks the required farm role, or the action is refused outright
    #[oai(status = 403)]
    PermissionDenied(Json<FarmErrorResponse>),

    /// Record not found, or a filtered listing matched nothing
    #[oai(status = 404)]
    NotFound(Json<FarmErrorResponse>),

    /// The HTTP method is not supported for this resource
    #[oai(status = 405)]
    MethodNotAllowed(Json<FarmErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<FarmErrorResponse>),
}

impl FarmError {
    fn response(code: &str, message: impl Into<String>, status_code: u16) -> Json<FarmErrorResponse> {
        Json(FarmErrorResponse {
            error: code.to_string(),
            message: message.into(),
            status_code,
        })
    }

    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        FarmError::BadRequest(Self::response(code, message, 400))
    }

    pub fn unauthorized() -> Self {
        FarmError::Unauthorized(Self::response(
            "not_authenticated",
            PermissionError::NotAuthenticated.to_string(),
            401,
        ))
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        FarmError::PermissionDenied(Self::response("permission_denied", message, 403))
    }

    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        FarmError::PermissionDenied(Self::response(code, message, 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FarmError::NotFound(Self::response("not_found", message, 404))
    }

    pub fn method_not_allowed(method: &str) -> Self {
        FarmError::MethodNotAllowed(Self::response(
            "method_not_allowed",
            format!("Method \"{}\" not allowed.", method),
            405,
        ))
    }

    /// Convert InternalError to FarmError
    ///
    /// Infrastructure failures are logged and collapsed into a generic 500.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint hit: {}", err);
                Self::bad_request("duplicate_entry", "A record with these details already exists.")
            }
            InternalError::Database(_) => {
                tracing::error!("Database error in farm operation: {}", err);
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

            InternalError::Validation(validation) => {
                Self::bad_request(&validation.code, validation.message.clone())
            }
            InternalError::Permission(PermissionError::NotAuthenticated)
            | InternalError::Credential(CredentialError::SessionRevoked(_)) => Self::unauthorized(),
            InternalError::Permission(PermissionError::Denied(message)) => {
                Self::permission_denied(message.clone())
            }
            InternalError::Permission(PermissionError::Forbidden { code, message }) => {
                Self::forbidden(code, message.clone())
            }
            InternalError::NotFound { .. } => Self::not_found(err.to_string()),
            InternalError::NoMatches { message } => Self::not_found(message.clone()),

            _ => {
                tracing::error!("Unexpected error in farm operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        FarmError::InternalError(Self::response(
            "internal_error",
            "An internal error occurred",
            500,
        ))
    }

    fn body(&self) -> &FarmErrorResponse {
        match self {
            FarmError::BadRequest(json)
            | FarmError::Unauthorized(json)
            | FarmError::PermissionDenied(json)
            | FarmError::NotFound(json)
            | FarmError::MethodNotAllowed(json)
            | FarmError::InternalError(json) => &json.0,
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

impl From<InternalError> for FarmError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for FarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = FarmError::from_internal_error(InternalError::validation(
            "invalid_cow_breed",
            "Invalid cow breed: 'Holstein'.",
        ));

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "invalid_cow_breed");
        assert_eq!(err.message(), "Invalid cow breed: 'Holstein'.");
    }

    #[test]
    fn test_no_matches_maps_to_not_found() {
        let err = FarmError::from_internal_error(InternalError::no_matches(
            "No Weight records found matching the provided filters.",
        ));

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "No Weight records found matching the provided filters.");
    }

    #[test]
    fn test_forbidden_keeps_code() {
        let err = FarmError::from_internal_error(
            PermissionError::forbidden(
                "lactation_linked_to_pregnancy",
                "Deletion not allowed. Lactation record is associated with a pregnancy.",
            )
            .into(),
        );

        assert_eq!(err.status_code(), 403);
        assert_eq!(err.code(), "lactation_linked_to_pregnancy");
    }

    #[test]
    fn test_method_not_allowed_message() {
        let err = FarmError::method_not_allowed("PATCH");

        assert_eq!(err.status_code(), 405);
        assert_eq!(err.message(), "Method \"PATCH\" not allowed.");
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = FarmError::from_internal_error(InternalError::database(
            "insert_milk",
            DbErr::Custom("secret detail".to_string()),
        ));

        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("secret detail"));
    }
}
