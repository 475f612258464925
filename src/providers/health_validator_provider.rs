use crate::errors::internal::ValidationError;
use crate::providers::field_rules::{check_max_length, parse_choice};
use crate::types::db::cow;
use crate::types::internal::choices::{AvailabilityStatus, CullingReason};

pub const MIN_WEIGHT_KGS: f64 = 10.0;
pub const MAX_WEIGHT_KGS: f64 = 1500.0;

/// Rules for weight and culling records
#[derive(Debug, Default)]
pub struct HealthValidatorProvider {}

impl HealthValidatorProvider {
    pub fn new() -> Self {
        Self {}
    }

    pub fn validate_weight(&self, weight_in_kgs: f64) -> Result<(), ValidationError> {
        if weight_in_kgs.is_nan() || weight_in_kgs < MIN_WEIGHT_KGS {
            return Err(ValidationError::new(
                "invalid_weight",
                "A cow cannot weigh less than 10 kgs!",
            ));
        }
        if weight_in_kgs > MAX_WEIGHT_KGS {
            return Err(ValidationError::new(
                "invalid_weight",
                "A cow's weight cannot exceed 1500 kgs!",
            ));
        }
        Ok(())
    }

    /// Only cows still on the farm can be weighed
    pub fn validate_weighable(&self, cow: &cow::Model) -> Result<(), ValidationError> {
        if cow.availability_status != AvailabilityStatus::Alive.as_str() {
            return Err(ValidationError::new(
                "invalid_availability_status",
                format!(
                    "Weight records are only allowed for cows present in the farm. This cow is marked as: {}",
                    cow.availability_status
                ),
            ));
        }
        Ok(())
    }

    pub fn duplicate_weight_record(&self) -> ValidationError {
        ValidationError::new(
            "duplicate_weight_record",
            "This cow already has a weight record on this date!",
        )
    }

    pub fn validate_culling(&self, reason: &str, notes: Option<&str>) -> Result<CullingReason, ValidationError> {
        let reason = parse_choice("reason", reason)?;
        if let Some(notes) = notes {
            check_max_length("notes", notes, 100)?;
        }
        Ok(reason)
    }

    pub fn duplicate_culling_record(&self, cow_id: i32) -> ValidationError {
        ValidationError::new(
            "duplicate_culling_record",
            format!("Cow {} already has a culling record.", cow_id),
        )
    }
}
