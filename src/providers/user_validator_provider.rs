use crate::errors::internal::ValidationError;
use crate::providers::field_rules::{check_max_length, check_not_blank};
use crate::types::internal::choices::Sex;

/// Profile fields as submitted, before uniqueness checks
#[derive(Debug, Clone, Copy)]
pub struct ProfileFields<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub sex: &'a str,
}

/// Field rules for user accounts
pub struct UserValidatorProvider {
    min_password_length: usize,
}

impl UserValidatorProvider {
    pub fn new() -> Self {
        Self { min_password_length: 8 }
    }

    pub fn validate_sex(&self, sex: &str) -> Result<Sex, ValidationError> {
        if sex.is_empty() {
            return Err(ValidationError::new("invalid_sex", "Sex field cannot be empty."));
        }
        sex.parse::<Sex>().map_err(|err| {
            ValidationError::new(
                "invalid_sex",
                format!(
                    "Invalid value for sex: '{}'. It must be one of {}.",
                    err.value,
                    err.allowed.join(", ")
                ),
            )
        })
    }

    /// Validate every profile field in declaration order (fail fast)
    pub fn validate_profile(&self, fields: &ProfileFields<'_>) -> Result<Sex, ValidationError> {
        check_not_blank("username", fields.username)?;
        check_max_length("username", fields.username, 45)?;
        if let Some(email) = fields.email {
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                return Err(ValidationError::new("invalid_email", "Enter a valid email address."));
            }
        }
        check_not_blank("first_name", fields.first_name)?;
        check_max_length("first_name", fields.first_name, 20)?;
        check_not_blank("last_name", fields.last_name)?;
        check_max_length("last_name", fields.last_name, 20)?;
        if let Some(phone_number) = fields.phone_number {
            check_max_length("phone_number", phone_number, 13)?;
        }
        self.validate_sex(fields.sex)
    }

    pub fn validate_password(&self, password: &str) -> Result<(), ValidationError> {
        if password.chars().count() < self.min_password_length {
            return Err(ValidationError::new(
                "password_too_short",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    self.min_password_length
                ),
            ));
        }
        Ok(())
    }
}

impl Default for UserValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}
