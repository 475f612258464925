use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::errors::internal::ValidationError;
use crate::providers::cow_validator_provider::days_since;
use crate::types::db::{cow, pregnancy};
use crate::types::internal::choices::{
    AvailabilityStatus, CowPregnancyStatus, PregnancyOutcome, PregnancyStatus, ProductionStatus, Sex,
};

/// Minimum age, in days, for pregnancy and heat
pub const BREEDING_AGE_DAYS: i64 = 365;
pub const GESTATION_DAYS: i64 = 285;
const DAYS_PER_MONTH: f64 = 30.417;

/// Days since the start, or `None` once the pregnancy has ended
///
/// A pregnancy has ended when both a calving date and an outcome are recorded.
pub fn pregnancy_duration(
    start_date: NaiveDate,
    date_of_calving: Option<NaiveDate>,
    outcome: Option<&str>,
    today: NaiveDate,
) -> Option<i64> {
    if date_of_calving.is_some() && outcome.is_some() {
        None
    } else {
        Some(days_since(start_date, today))
    }
}

/// Expected calving date while no outcome is recorded
pub fn due_date(pregnancy: &pregnancy::Model) -> Option<NaiveDate> {
    match pregnancy.pregnancy_outcome {
        None => Some(pregnancy.start_date + Duration::days(GESTATION_DAYS)),
        Some(_) => None,
    }
}

fn months(days: i64) -> f64 {
    (days as f64 / DAYS_PER_MONTH * 100.0).round() / 100.0
}

/// A pregnancy as it is about to be stored
#[derive(Debug, Clone, Copy)]
pub struct PregnancyFields {
    pub start_date: NaiveDate,
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: PregnancyStatus,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<PregnancyOutcome>,
}

/// What the heat rules need to know about a cow's history
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatHistory {
    /// A heat was observed within the day before now
    pub heat_in_past_day: bool,
    /// A heat was observed within the 21 days before this observation
    pub heat_in_previous_21_days: bool,
    /// Most recent recorded calving date
    pub latest_calving: Option<NaiveDate>,
}

/// Rules for pregnancy and heat records
#[derive(Debug, Default)]
pub struct ReproductionValidatorProvider {}

impl ReproductionValidatorProvider {
    pub fn new() -> Self {
        Self {}
    }

    /// Full pregnancy validation
    ///
    /// The cow's current pregnancy and availability status are only checked
    /// when `creating`; an existing record is updated as the pregnancy moves on.
    pub fn validate_pregnancy(
        &self,
        cow: &cow::Model,
        fields: &PregnancyFields,
        creating: bool,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        self.validate_breeding_age(cow, fields.start_date, today)?;
        if creating {
            self.validate_cow_ready(cow)?;
        }
        self.validate_dates(fields, today)?;
        self.validate_status(fields, today)?;
        self.validate_outcome(fields)
    }

    fn validate_breeding_age(
        &self,
        cow: &cow::Model,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        let age = days_since(cow.date_of_birth, today);
        if age < BREEDING_AGE_DAYS {
            return Err(ValidationError::new(
                "age_below_threshold",
                format!(
                    "This cow must have a pregnancy threshold age of 1 year. This cow is {} months old.",
                    months(age)
                ),
            ));
        }

        let age_at_start = (start_date - cow.date_of_birth).num_days();
        if age_at_start < 0 {
            return Err(ValidationError::new("invalid_start_date", "Invalid start date."));
        }
        if age_at_start < BREEDING_AGE_DAYS {
            return Err(ValidationError::new(
                "pregnancy_age_threshold_not_met",
                format!(
                    "Invalid start date. Cow cannot be pregnant at {} months of age.",
                    months(age_at_start)
                ),
            ));
        }
        Ok(())
    }

    fn validate_cow_ready(&self, cow: &cow::Model) -> Result<(), ValidationError> {
        let status = cow.current_pregnancy_status.as_str();
        if status == CowPregnancyStatus::Pregnant.as_str() {
            return Err(ValidationError::new("cow_already_pregnant", "This cow is already pregnant!"));
        }
        if status == CowPregnancyStatus::Calved.as_str() {
            return Err(ValidationError::new("cow_calved_recently", "This cow just gave birth recently!"));
        }
        if status == CowPregnancyStatus::Unavailable.as_str() {
            return Err(ValidationError::new("cow_not_ready", "This cow is not ready!"));
        }

        if cow.availability_status == AvailabilityStatus::Dead.as_str() {
            return Err(ValidationError::new("dead_cow", "Cannot add pregnancy record for a dead cow."));
        }
        if cow.availability_status == AvailabilityStatus::Sold.as_str() {
            return Err(ValidationError::new("sold_cow", "Cannot add pregnancy record for a sold cow."));
        }
        Ok(())
    }

    fn validate_dates(&self, fields: &PregnancyFields, today: NaiveDate) -> Result<(), ValidationError> {
        let start = fields.start_date;
        if start > today {
            return Err(ValidationError::new(
                "invalid_start_date",
                "Start date cannot be in the future.",
            ));
        }

        if let Some(calving) = fields.date_of_calving {
            if calving < start {
                return Err(ValidationError::new(
                    "invalid_date_of_calving",
                    "Date of calving must be after the start date.",
                ));
            }
            if calving > today {
                return Err(ValidationError::new(
                    "invalid_date_of_calving",
                    "Calving date cannot be in the future.",
                ));
            }
            let difference = (calving - start).num_days();
            if !(270..=295).contains(&difference) {
                return Err(ValidationError::new(
                    "invalid_calving_start_date_difference",
                    format!(
                        "Difference between calving date and start date should be between 270 and 295 days. Current difference {} day(s)",
                        difference
                    ),
                ));
            }
        }

        if let Some(scan) = fields.pregnancy_scan_date {
            if scan < start {
                return Err(ValidationError::new(
                    "scan_date_before_start_date",
                    "Pregnancy scan date must be after the start date.",
                ));
            }
            if scan > today {
                return Err(ValidationError::new(
                    "scan_date_in_future",
                    "Pregnancy scan date cannot be in the future.",
                ));
            }
            let elapsed = (scan - start).num_days();
            if !(21..=60).contains(&elapsed) {
                return Err(ValidationError::new(
                    "invalid_scan_date_difference",
                    format!(
                        "Scan date should be between 21 and 60 days from the start date.Currently {} elapsed.",
                        elapsed
                    ),
                ));
            }
        }

        if let Some(failed) = fields.pregnancy_failed_date {
            if failed > today {
                return Err(ValidationError::new(
                    "failed_date_in_future",
                    "Pregnancy failed date cannot be in the future.",
                ));
            }
            if failed < start {
                return Err(ValidationError::new(
                    "failed_date_before_start_date",
                    "Pregnancy failed date cannot be before the start date.",
                ));
            }
            if fields.pregnancy_status != PregnancyStatus::Failed {
                return Err(ValidationError::new(
                    "invalid_failed_date_status",
                    "Pregnancy status must be 'Failed' if pregnancy failed date is provided.",
                ));
            }
            if !(21..=295).contains(&(failed - start).num_days()) {
                return Err(ValidationError::new(
                    "invalid_failed_date_difference",
                    "Pregnancy failed date must be between 21 and 295 days from the start date.",
                ));
            }
        }

        Ok(())
    }

    fn validate_status(&self, fields: &PregnancyFields, today: NaiveDate) -> Result<(), ValidationError> {
        let status = fields.pregnancy_status;
        if status == PregnancyStatus::Failed && fields.pregnancy_failed_date.is_none() {
            return Err(ValidationError::new(
                "missing_date_of_failure",
                "Pregnancy is marked as failed, provide the date of failure",
            ));
        }

        if days_since(fields.start_date, today) < 30 && status != PregnancyStatus::Unconfirmed {
            return Err(ValidationError::new(
                "too_early_to_confirm_status",
                format!(
                    "Confirm the pregnancy status on {}",
                    fields.start_date + Duration::days(30)
                ),
            ));
        }

        let outcome = fields.pregnancy_outcome.map(|o| o.as_str());
        if let Some(duration) = pregnancy_duration(fields.start_date, fields.date_of_calving, outcome, today) {
            if duration >= 30 && !matches!(status, PregnancyStatus::Confirmed | PregnancyStatus::Failed) {
                return Err(ValidationError::new(
                    "invalid_pregnancy_status",
                    format!(
                        "Pregnancy status must be confirmed or failed. The pregnancy duration is {} days.",
                        duration
                    ),
                ));
            }
        }
        Ok(())
    }

    fn validate_outcome(&self, fields: &PregnancyFields) -> Result<(), ValidationError> {
        let status = fields.pregnancy_status;
        if let Some(outcome) = fields.pregnancy_outcome {
            if matches!(outcome, PregnancyOutcome::Live | PregnancyOutcome::Stillborn)
                && status != PregnancyStatus::Confirmed
            {
                return Err(ValidationError::new(
                    "invalid_outcome_status",
                    format!(
                        "Pregnancy status must be 'Confirmed' if the pregnancy outcome is '{}'.",
                        outcome
                    ),
                ));
            }
            if outcome == PregnancyOutcome::Live && fields.date_of_calving.is_none() {
                return Err(ValidationError::new(
                    "missing_date_of_calving",
                    format!(
                        "Date of calving must be provided if the pregnancy outcome is '{}'.",
                        outcome
                    ),
                ));
            }
            if outcome == PregnancyOutcome::Miscarriage && status != PregnancyStatus::Failed {
                return Err(ValidationError::new(
                    "invalid_outcome_status",
                    format!(
                        "Pregnancy status must be 'Failed' if the pregnancy outcome is 'Miscarriage'. Currently its {}",
                        status
                    ),
                ));
            }
        }

        let gave_birth = matches!(
            fields.pregnancy_outcome,
            Some(PregnancyOutcome::Live | PregnancyOutcome::Stillborn)
        );
        if fields.date_of_calving.is_some() && !gave_birth {
            return Err(ValidationError::new("missing_outcome", "Provide the pregnancy outcome"));
        }
        Ok(())
    }

    pub fn validate_heat(
        &self,
        cow: &cow::Model,
        observation_time: NaiveDateTime,
        history: &HeatHistory,
        now: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        if observation_time > now {
            return Err(ValidationError::new(
                "invalid_observation_time",
                "Observation time cannot be in the future.",
            ));
        }
        if cow.availability_status == AvailabilityStatus::Dead.as_str() {
            return Err(ValidationError::new("dead_cow", "Cow is dead and cannot be in heat."));
        }
        if cow.gender == Sex::Male.as_str() {
            return Err(ValidationError::new(
                "invalid_gender",
                "Heat can only be observed in female cows.",
            ));
        }
        if days_since(cow.date_of_birth, now.date()) < BREEDING_AGE_DAYS {
            return Err(ValidationError::new(
                "invalid_age_for_heat",
                "Cow must be at least 12 months old to be in heat.",
            ));
        }
        if cow.current_pregnancy_status == CowPregnancyStatus::Pregnant.as_str() {
            return Err(ValidationError::new("cow_already_pregnant", "Cow is already pregnant."));
        }
        if cow.current_production_status != ProductionStatus::Open.as_str() {
            return Err(ValidationError::new(
                "invalid_production_status",
                format!(
                    "Cow must be open and ready to be served. This cow is marked as {}",
                    cow.current_production_status
                ),
            ));
        }
        if history.heat_in_past_day {
            return Err(ValidationError::new(
                "already_in_heat",
                "Cow is already in heat within the past day.",
            ));
        }
        if let Some(calving) = history.latest_calving {
            let since_calving = (observation_time.date() - calving).num_days();
            if cow.current_pregnancy_status == CowPregnancyStatus::Calved.as_str() && since_calving < 60 {
                return Err(ValidationError::new(
                    "in_heat_after_calving",
                    "Cow cannot be in heat within 60 days after calving.",
                ));
            }
        }
        if history.heat_in_previous_21_days {
            return Err(ValidationError::new(
                "in_heat_within_21_days",
                "Cow cannot be in heat within 21 days of previous heat observation.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{cow_model, date};

    fn open_cow() -> cow::Model {
        cow_model(1, "Female", date(2020, 1, 1))
    }

    fn fields(start: NaiveDate) -> PregnancyFields {
        PregnancyFields {
            start_date: start,
            date_of_calving: None,
            pregnancy_status: PregnancyStatus::Unconfirmed,
            pregnancy_scan_date: None,
            pregnancy_failed_date: None,
            pregnancy_outcome: None,
        }
    }

    fn code(result: Result<(), ValidationError>) -> String {
        result.unwrap_err().code
    }

    #[test]
    fn test_new_unconfirmed_pregnancy_is_valid() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        assert!(validator.validate_pregnancy(&open_cow(), &fields(date(2024, 5, 20)), true, today).is_ok());
    }

    #[test]
    fn test_age_rules() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        let young = cow_model(1, "Female", date(2023, 12, 1));

        let err = validator
            .validate_pregnancy(&young, &fields(date(2024, 5, 30)), true, today)
            .unwrap_err();
        assert_eq!(err.code, "age_below_threshold");
        assert_eq!(
            err.message,
            "This cow must have a pregnancy threshold age of 1 year. This cow is 6.02 months old."
        );

        let cow = cow_model(1, "Female", date(2023, 1, 1));
        assert_eq!(
            code(validator.validate_pregnancy(&cow, &fields(date(2022, 12, 1)), true, today)),
            "invalid_start_date"
        );
        assert_eq!(
            code(validator.validate_pregnancy(&cow, &fields(date(2023, 6, 1)), true, today)),
            "pregnancy_age_threshold_not_met"
        );
    }

    #[test]
    fn test_cow_readiness_only_on_creation() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        let mut cow = open_cow();
        cow.current_pregnancy_status = "Pregnant".to_string();

        assert_eq!(
            code(validator.validate_pregnancy(&cow, &fields(date(2024, 5, 20)), true, today)),
            "cow_already_pregnant"
        );
        assert!(validator.validate_pregnancy(&cow, &fields(date(2024, 5, 20)), false, today).is_ok());

        cow.current_pregnancy_status = "Unavailable".to_string();
        assert_eq!(
            code(validator.validate_pregnancy(&cow, &fields(date(2024, 5, 20)), true, today)),
            "cow_not_ready"
        );

        cow.current_pregnancy_status = "Open".to_string();
        cow.availability_status = "Sold".to_string();
        assert_eq!(
            code(validator.validate_pregnancy(&cow, &fields(date(2024, 5, 20)), true, today)),
            "sold_cow"
        );
    }

    #[test]
    fn test_calving_window() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        let start = date(2023, 8, 1);
        let mut calved = fields(start);
        calved.pregnancy_status = PregnancyStatus::Confirmed;
        calved.pregnancy_outcome = Some(PregnancyOutcome::Live);

        calved.date_of_calving = Some(start + Duration::days(280));
        assert!(validator.validate_pregnancy(&open_cow(), &calved, false, today).is_ok());

        calved.date_of_calving = Some(start + Duration::days(250));
        let err = validator.validate_pregnancy(&open_cow(), &calved, false, today).unwrap_err();
        assert_eq!(err.code, "invalid_calving_start_date_difference");
        assert!(err.message.ends_with("Current difference 250 day(s)"));

        calved.date_of_calving = Some(date(2024, 6, 2));
        assert_eq!(
            code(validator.validate_pregnancy(&open_cow(), &calved, false, today)),
            "invalid_date_of_calving"
        );
    }

    #[test]
    fn test_scan_and_failed_dates() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        let start = date(2024, 3, 1);

        let mut scanned = fields(start);
        scanned.pregnancy_status = PregnancyStatus::Confirmed;
        scanned.pregnancy_scan_date = Some(start + Duration::days(10));
        let err = validator.validate_pregnancy(&open_cow(), &scanned, false, today).unwrap_err();
        assert_eq!(err.code, "invalid_scan_date_difference");
        assert!(err.message.ends_with("Currently 10 elapsed."));

        let mut failed = fields(start);
        failed.pregnancy_failed_date = Some(start + Duration::days(40));
        assert_eq!(
            code(validator.validate_pregnancy(&open_cow(), &failed, false, today)),
            "invalid_failed_date_status"
        );

        failed.pregnancy_status = PregnancyStatus::Failed;
        failed.pregnancy_outcome = Some(PregnancyOutcome::Miscarriage);
        assert!(validator.validate_pregnancy(&open_cow(), &failed, false, today).is_ok());

        failed.pregnancy_failed_date = None;
        assert_eq!(
            code(validator.validate_pregnancy(&open_cow(), &failed, false, today)),
            "missing_date_of_failure"
        );
    }

    #[test]
    fn test_status_follows_duration() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);

        let mut early = fields(date(2024, 5, 20));
        early.pregnancy_status = PregnancyStatus::Confirmed;
        let err = validator.validate_pregnancy(&open_cow(), &early, false, today).unwrap_err();
        assert_eq!(err.code, "too_early_to_confirm_status");
        assert_eq!(err.message, "Confirm the pregnancy status on 2024-06-19");

        let late = fields(date(2024, 4, 1));
        let err = validator.validate_pregnancy(&open_cow(), &late, false, today).unwrap_err();
        assert_eq!(err.code, "invalid_pregnancy_status");
        assert_eq!(
            err.message,
            "Pregnancy status must be confirmed or failed. The pregnancy duration is 61 days."
        );
    }

    #[test]
    fn test_outcome_rules() {
        let validator = ReproductionValidatorProvider::new();
        let today = date(2024, 6, 1);
        let start = date(2024, 3, 1);

        let mut live = fields(start);
        live.pregnancy_status = PregnancyStatus::Confirmed;
        live.pregnancy_outcome = Some(PregnancyOutcome::Live);
        let err = validator.validate_pregnancy(&open_cow(), &live, false, today).unwrap_err();
        assert_eq!(err.code, "missing_date_of_calving");

        let mut miscarried = fields(start);
        miscarried.pregnancy_status = PregnancyStatus::Confirmed;
        miscarried.pregnancy_outcome = Some(PregnancyOutcome::Miscarriage);
        let err = validator.validate_pregnancy(&open_cow(), &miscarried, false, today).unwrap_err();
        assert_eq!(
            err.message,
            "Pregnancy status must be 'Failed' if the pregnancy outcome is 'Miscarriage'. Currently its Confirmed"
        );

        let start = date(2023, 8, 1);
        let mut no_outcome = fields(start);
        no_outcome.pregnancy_status = PregnancyStatus::Confirmed;
        no_outcome.date_of_calving = Some(start + Duration::days(280));
        assert_eq!(
            code(validator.validate_pregnancy(&open_cow(), &no_outcome, false, today)),
            "missing_outcome"
        );
    }

    #[test]
    fn test_duration_and_due_date() {
        let today = date(2024, 6, 1);
        assert_eq!(pregnancy_duration(date(2024, 5, 1), None, None, today), Some(31));
        assert_eq!(
            pregnancy_duration(date(2023, 8, 1), Some(date(2024, 5, 1)), Some("Live"), today),
            None
        );

        let record = pregnancy::Model {
            id: 1,
            cow_id: 1,
            start_date: date(2024, 1, 1),
            date_of_calving: None,
            pregnancy_status: "Confirmed".to_string(),
            pregnancy_notes: None,
            calving_notes: None,
            pregnancy_scan_date: None,
            pregnancy_failed_date: None,
            pregnancy_outcome: None,
        };
        assert_eq!(due_date(&record), Some(date(2024, 10, 12)));
    }

    #[test]
    fn test_heat_rules() {
        let validator = ReproductionValidatorProvider::new();
        let now = date(2024, 6, 1).and_hms_opt(8, 0, 0).unwrap();
        let cow = open_cow();
        let quiet = HeatHistory::default();

        assert!(validator.validate_heat(&cow, now, &quiet, now).is_ok());
        assert_eq!(
            code(validator.validate_heat(&cow, now + Duration::hours(1), &quiet, now)),
            "invalid_observation_time"
        );

        let recent = HeatHistory { heat_in_past_day: true, heat_in_previous_21_days: true, ..Default::default() };
        assert_eq!(code(validator.validate_heat(&cow, now, &recent, now)), "already_in_heat");

        let within_21 = HeatHistory { heat_in_previous_21_days: true, ..Default::default() };
        assert_eq!(code(validator.validate_heat(&cow, now, &within_21, now)), "in_heat_within_21_days");

        let mut calved = open_cow();
        calved.current_pregnancy_status = "Calved".to_string();
        let after_calving = HeatHistory { latest_calving: Some(date(2024, 5, 1)), ..Default::default() };
        assert_eq!(
            code(validator.validate_heat(&calved, now, &after_calving, now)),
            "in_heat_after_calving"
        );

        let mut lactating = open_cow();
        lactating.current_production_status = "Pregnant and Lactating".to_string();
        let err = validator.validate_heat(&lactating, now, &quiet, now).unwrap_err();
        assert_eq!(
            err.message,
            "Cow must be open and ready to be served. This cow is marked as Pregnant and Lactating"
        );

        let bull = cow_model(2, "Male", date(2020, 1, 1));
        assert_eq!(code(validator.validate_heat(&bull, now, &quiet, now)), "invalid_gender");

        let calf = cow_model(3, "Female", date(2024, 1, 1));
        assert_eq!(code(validator.validate_heat(&calf, now, &quiet, now)), "invalid_age_for_heat");
    }
}
