use chrono::{Datelike, NaiveDate};

use crate::errors::internal::ValidationError;
use crate::providers::field_rules::{check_max_length, check_not_blank, parse_choice};
use crate::types::db::cow;
use crate::types::internal::choices::{
    AvailabilityStatus, CowBreedName, CowCategory, CowPregnancyStatus, ProductionStatus, Sex,
};

/// Choice fields of a cow, parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CowChoices {
    pub gender: Sex,
    pub availability_status: AvailabilityStatus,
    pub current_pregnancy_status: CowPregnancyStatus,
    pub category: CowCategory,
    pub current_production_status: ProductionStatus,
}

/// Rules for breeds, cows and inseminators
#[derive(Debug, Default)]
pub struct CowValidatorProvider {}

impl CowValidatorProvider {
    pub fn new() -> Self {
        Self {}
    }

    pub fn validate_breed_name(&self, name: &str) -> Result<CowBreedName, ValidationError> {
        name.parse::<CowBreedName>()
            .map_err(|_| ValidationError::new("invalid_cow_breed", format!("Invalid cow breed: '{}'.", name)))
    }

    pub fn validate_name(&self, name: &str) -> Result<(), ValidationError> {
        check_not_blank("name", name)?;
        check_max_length("name", name, 35)
    }

    pub fn validate_choices(
        &self,
        gender: &str,
        availability_status: &str,
        current_pregnancy_status: &str,
        category: &str,
        current_production_status: &str,
    ) -> Result<CowChoices, ValidationError> {
        Ok(CowChoices {
            gender: parse_choice("gender", gender)?,
            availability_status: parse_choice("availability_status", availability_status)?,
            current_pregnancy_status: parse_choice("current_pregnancy_status", current_pregnancy_status)?,
            category: parse_choice("category", category)?,
            current_production_status: parse_choice("current_production_status", current_production_status)?,
        })
    }

    pub fn validate_date_of_birth(&self, date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        if date_of_birth > today {
            return Err(ValidationError::new(
                "date_of_birth_in_future",
                "Date of birth cannot be in the future.",
            ));
        }
        Ok(())
    }

    /// Sire must be a male cow and dam a female one
    pub fn validate_parents(
        &self,
        sire: Option<&cow::Model>,
        dam: Option<&cow::Model>,
    ) -> Result<(), ValidationError> {
        if let Some(sire) = sire {
            if sire.gender != Sex::Male.as_str() {
                return Err(ValidationError::new(
                    "invalid_sire_gender",
                    format!("The sire must be a male cow. Cow {} is {}.", sire.id, sire.gender),
                ));
            }
        }
        if let Some(dam) = dam {
            if dam.gender != Sex::Female.as_str() {
                return Err(ValidationError::new(
                    "invalid_dam_gender",
                    format!("The dam must be a female cow. Cow {} is {}.", dam.id, dam.gender),
                ));
            }
        }
        Ok(())
    }

    pub fn validate_inseminator(
        &self,
        first_name: &str,
        last_name: &str,
        phone_number: &str,
        sex: &str,
        company: Option<&str>,
        license_number: Option<&str>,
    ) -> Result<Sex, ValidationError> {
        check_not_blank("first_name", first_name)?;
        check_max_length("first_name", first_name, 20)?;
        check_not_blank("last_name", last_name)?;
        check_max_length("last_name", last_name, 20)?;
        check_not_blank("phone_number", phone_number)?;
        check_max_length("phone_number", phone_number, 15)?;
        if let Some(company) = company {
            check_max_length("company", company, 50)?;
        }
        if let Some(license_number) = license_number {
            check_max_length("license_number", license_number, 25)?;
        }
        parse_choice("sex", sex)
    }
}

/// `"FR-2022-5"`: first two letters of the breed, birth year, id
pub fn tag_number(breed_name: &str, date_of_birth: NaiveDate, id: i32) -> String {
    let prefix: String = breed_name.chars().take(2).collect::<String>().to_uppercase();
    format!("{}-{}-{}", prefix, date_of_birth.year(), id)
}

/// Days since `since`
pub fn days_since(since: NaiveDate, today: NaiveDate) -> i64 {
    (today - since).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{cow_model, date};

    #[test]
    fn test_breed_name() {
        let validator = CowValidatorProvider::new();
        assert_eq!(validator.validate_breed_name("Jersey").unwrap(), CowBreedName::Jersey);

        let err = validator.validate_breed_name("Holstein").unwrap_err();
        assert_eq!(err.code, "invalid_cow_breed");
        assert_eq!(err.message, "Invalid cow breed: 'Holstein'.");
    }

    #[test]
    fn test_choices_report_the_offending_field() {
        let validator = CowValidatorProvider::new();
        let parsed = validator
            .validate_choices("Female", "Alive", "Open", "Milking Cow", "Pregnant and Lactating")
            .unwrap();
        assert_eq!(parsed.category, CowCategory::MilkingCow);

        let err = validator
            .validate_choices("Female", "Alive", "Open", "Cow", "Open")
            .unwrap_err();
        assert_eq!(err.code, "invalid_category");
    }

    #[test]
    fn test_birth_date_and_parents() {
        let validator = CowValidatorProvider::new();
        let today = date(2024, 6, 1);
        assert!(validator.validate_date_of_birth(today, today).is_ok());
        assert_eq!(
            validator.validate_date_of_birth(date(2024, 6, 2), today).unwrap_err().code,
            "date_of_birth_in_future"
        );

        let bull = cow_model(1, "Male", date(2019, 1, 1));
        let heifer = cow_model(2, "Female", date(2019, 1, 1));
        assert!(validator.validate_parents(Some(&bull), Some(&heifer)).is_ok());
        assert_eq!(
            validator.validate_parents(Some(&heifer), None).unwrap_err().code,
            "invalid_sire_gender"
        );
        assert_eq!(
            validator.validate_parents(None, Some(&bull)).unwrap_err().code,
            "invalid_dam_gender"
        );
    }

    #[test]
    fn test_inseminator_rules() {
        let validator = CowValidatorProvider::new();
        assert!(validator
            .validate_inseminator("Grace", "Achieng", "+254711000001", "Female", None, Some("LIC-1"))
            .is_ok());
        assert_eq!(
            validator
                .validate_inseminator("Grace", "Achieng", "+2547110000011234", "Female", None, None)
                .unwrap_err()
                .code,
            "invalid_length"
        );
        assert_eq!(
            validator
                .validate_inseminator("Grace", "Achieng", "0711", "F", None, None)
                .unwrap_err()
                .code,
            "invalid_sex"
        );
    }

    #[test]
    fn test_tag_number_and_age() {
        assert_eq!(tag_number("Friesian", date(2022, 4, 1), 5), "FR-2022-5");
        assert_eq!(days_since(date(2024, 1, 1), date(2024, 1, 31)), 30);
    }
}
