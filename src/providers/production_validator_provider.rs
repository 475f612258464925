use chrono::{Duration, NaiveDate};

use crate::errors::internal::ValidationError;
use crate::providers::cow_validator_provider::{days_since, tag_number};
use crate::types::db::{cow, lactation};
use crate::types::internal::choices::{AvailabilityStatus, CowCategory, LactationStage, Sex};

/// Youngest age, in days, at which a cow can start lactating
pub const FIRST_LACTATION_AGE_DAYS: i64 = 635;
/// Length of one lactation cycle used for lactation number checks
pub const LACTATION_CYCLE_DAYS: i64 = 305;
pub const MAX_MILK_PER_ENTRY_KGS: f64 = 35.0;

/// Days a lactation has run: until its end date, or until today
pub fn days_in_lactation(lactation: &lactation::Model, today: NaiveDate) -> i64 {
    let until = lactation.actual_end_date.unwrap_or(today);
    (until - lactation.start_date).num_days()
}

pub fn lactation_stage(lactation: &lactation::Model, today: NaiveDate) -> LactationStage {
    if lactation.actual_end_date.is_some() {
        return LactationStage::Ended;
    }
    match days_in_lactation(lactation, today) {
        days if days <= 100 => LactationStage::Early,
        days if days <= 200 => LactationStage::Mid,
        days if days <= 275 => LactationStage::Late,
        _ => LactationStage::Dry,
    }
}

/// Formatted end date, or `"Ongoing"`
pub fn expected_end_date(lactation: &lactation::Model) -> String {
    lactation
        .actual_end_date
        .map(|end| end.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Ongoing".to_string())
}

/// A lactation as it is about to be stored
#[derive(Debug, Clone, Copy)]
pub struct LactationFields {
    pub start_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub lactation_number: i16,
    pub pregnancy_id: Option<i32>,
}

/// Rules for lactation and milk records
#[derive(Debug, Default)]
pub struct ProductionValidatorProvider {}

impl ProductionValidatorProvider {
    pub fn new() -> Self {
        Self {}
    }

    /// Checks that apply to every lactation save, manual or automatic
    pub fn validate_lactation(
        &self,
        cow: &cow::Model,
        breed_name: &str,
        fields: &LactationFields,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if fields.lactation_number < 1 {
            return Err(ValidationError::new(
                "invalid_lactation_number",
                "Invalid lactation number.",
            ));
        }

        let earliest_start = cow.date_of_birth + Duration::days(FIRST_LACTATION_AGE_DAYS);
        if fields.start_date < earliest_start {
            return Err(ValidationError::new(
                "invalid_start_date",
                format!(
                    "Invalid start date. Lactation must have started or be around {}, not {}.",
                    earliest_start, fields.start_date
                ),
            ));
        }

        if fields.start_date > today {
            return Err(ValidationError::new(
                "start_date_in_future",
                "Start date cannot be in the future.",
            ));
        }

        if fields.actual_end_date.is_some_and(|end| end > today) {
            return Err(ValidationError::new(
                "end_date_in_future",
                "End date cannot be in the future.",
            ));
        }

        if cow.is_bought && fields.pregnancy_id.is_some() {
            return Err(ValidationError::new(
                "pregnancy_should_be_null",
                format!(
                    "Pregnancy must be NULL for this lactation record No.({}). {} never gave birth in this farm; it was brought on {}.",
                    fields.lactation_number,
                    tag_number(breed_name, cow.date_of_birth, cow.id),
                    cow.date_introduced_in_farm
                ),
            ));
        }

        let age = days_since(cow.date_of_birth, today);
        let cycles = (age - FIRST_LACTATION_AGE_DAYS) as f64 / LACTATION_CYCLE_DAYS as f64;
        if cycles < 1.0 && fields.lactation_number != 1 {
            return Err(ValidationError::new(
                "invalid_lactation_number",
                "Invalid lactation number.",
            ));
        }

        Ok(())
    }

    /// Extra checks for lactations entered by hand rather than by calving
    pub fn validate_manual_entry(&self, cow: &cow::Model) -> Result<(), ValidationError> {
        if !cow.is_bought {
            return Err(ValidationError::new(
                "manual_entry_only_on_bought_cows",
                "Manual entry is allowed only for bought cows.",
            ));
        }
        if cow.category != CowCategory::MilkingCow.as_str() {
            return Err(ValidationError::new(
                "only_bought_cows_with_calves_allowed",
                format!(
                    "Only bought cows that have calved are allowed. This cow is categorized as ({}). Manual entry is forbidden.",
                    cow.category
                ),
            ));
        }
        Ok(())
    }

    pub fn validate_milk_amount(&self, amount_in_kgs: f64) -> Result<(), ValidationError> {
        if amount_in_kgs.is_nan() || amount_in_kgs < 0.0 {
            return Err(ValidationError::new("invalid_amount", "Invalid amount!"));
        }
        if amount_in_kgs > MAX_MILK_PER_ENTRY_KGS {
            return Err(ValidationError::new(
                "exceeds_maximum_amount",
                format!(
                    "Amount {} Kgs exceeds the maximum expected amount of 35 kgs!",
                    amount_in_kgs
                ),
            ));
        }
        Ok(())
    }

    /// Whether `cow` can be milked, given its latest lactation
    pub fn validate_milk_cow(
        &self,
        cow: &cow::Model,
        latest_lactation: Option<&lactation::Model>,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if cow.availability_status == AvailabilityStatus::Dead.as_str() {
            return Err(ValidationError::new(
                "invalid_availability_status",
                "Cannot add milk record for a dead cow.",
            ));
        }
        if cow.availability_status == AvailabilityStatus::Sold.as_str() {
            return Err(ValidationError::new(
                "invalid_availability_status",
                "Cannot add milk record for a sold cow.",
            ));
        }
        if cow.gender != Sex::Female.as_str() {
            return Err(ValidationError::new(
                "male_cow",
                "This cow is a Bull and cannot produce milk!",
            ));
        }

        let Some(lactation) = latest_lactation else {
            return Err(ValidationError::new(
                "no_active_lactation",
                "Cannot add milk entry, cow has no active lactation",
            ));
        };

        match lactation_stage(lactation, today) {
            LactationStage::Dry => Err(ValidationError::new(
                "dried_off_cow",
                "Cannot add milk entry, Cow has been dried off",
            )),
            LactationStage::Ended => Err(ValidationError::new(
                "previous_lactation_ended",
                "Cannot add milk entry, Previous Lactation Ended!",
            )),
            _ => Ok(()),
        }
    }
}
