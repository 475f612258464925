use thiserror::Error;

pub mod credential;
pub mod database;
pub mod permission;
pub mod validation;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use permission::PermissionError;
pub use validation::ValidationError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// live in their own enums. Not exposed via API - endpoints convert to
/// AuthError, AdminError or FarmError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} with ID {id} was not found.")]
    NotFound { resource: String, id: String },

    /// A filtered listing came back empty
    #[error("{message}")]
    NoMatches { message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl ToString) -> InternalError {
        InternalError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn no_matches(message: impl Into<String>) -> InternalError {
        InternalError::NoMatches {
            message: message.into(),
        }
    }

    /// Shorthand for a rule violation reported back as 400
    pub fn validation(code: &str, message: impl Into<String>) -> InternalError {
        InternalError::Validation(ValidationError::new(code, message))
    }
}
