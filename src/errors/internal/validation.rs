use thiserror::Error;

/// A domain rule was broken by the submitted data
///
/// `code` is a stable machine-readable identifier (`invalid_weight`,
/// `duplicate_cow_breed`, ...); `message` is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
