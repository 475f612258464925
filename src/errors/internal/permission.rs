use thiserror::Error;

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("Authentication credentials were not provided! Please login to proceed.")]
    NotAuthenticated,

    /// Caller lacks the role the action requires
    #[error("{0}")]
    Denied(String),

    /// The action is refused regardless of role
    #[error("{message}")]
    Forbidden { code: String, message: String },
}

impl PermissionError {
    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
