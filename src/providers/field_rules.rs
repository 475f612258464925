use std::str::FromStr;

use crate::errors::internal::ValidationError;
use crate::types::internal::choices::InvalidChoice;

/// Parse a choice label, reporting `invalid_<field>` on failure
///
/// `field` is the snake_case field name, e.g. `availability_status`.
pub fn parse_choice<T>(field: &str, value: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = InvalidChoice>,
{
    value.parse::<T>().map_err(|err| {
        ValidationError::new(
            &format!("invalid_{}", field),
            format!(
                "Invalid value for {}: '{}'. It must be one of {}.",
                field.replace('_', " "),
                err.value,
                err.allowed.join(", ")
            ),
        )
    })
}

/// Reject values longer than `max` characters
pub fn check_max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length > max {
        return Err(ValidationError::new(
            "invalid_length",
            format!(
                "Ensure {} has at most {} characters (it has {}).",
                field.replace('_', " "),
                max,
                length
            ),
        ));
    }
    Ok(())
}

/// Reject empty or whitespace-only values
pub fn check_not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(
            "blank_field",
            format!("The {} field cannot be blank.", field.replace('_', " ")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::choices::AvailabilityStatus;

    #[test]
    fn test_parse_choice_reports_field_specific_code() {
        let err = parse_choice::<AvailabilityStatus>("availability_status", "Missing").unwrap_err();
        assert_eq!(err.code, "invalid_availability_status");
        assert_eq!(
            err.message,
            "Invalid value for availability status: 'Missing'. It must be one of Alive, Sold, Dead."
        );

        let ok: AvailabilityStatus = parse_choice("availability_status", "Sold").unwrap();
        assert_eq!(ok, AvailabilityStatus::Sold);
    }

    #[test]
    fn test_max_length_counts_characters() {
        assert!(check_max_length("first_name", "Wanjikū", 7).is_ok());
        let err = check_max_length("first_name", "Wanjikū", 6).unwrap_err();
        assert_eq!(err.code, "invalid_length");
        assert!(err.message.contains("at most 6"));
    }

    #[test]
    fn test_not_blank() {
        assert!(check_not_blank("name", "Daisy").is_ok());
        assert_eq!(check_not_blank("name", "   ").unwrap_err().code, "blank_field");
    }
}
