use chrono::{NaiveDate, NaiveDateTime};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::providers::production_validator_provider::{days_in_lactation, expected_end_date, lactation_stage};
use crate::types::db::{lactation, milk};
use crate::types::dto::common::{list_response, record_response};

/// A lactation entered by hand, for cows bought already in milk
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateLactationRequest {
    pub cow_id: i32,
    pub start_date: NaiveDate,
    /// Defaults to 1
    pub lactation_number: Option<i16>,
    pub pregnancy_id: Option<i32>,
    pub actual_end_date: Option<NaiveDate>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct LactationResponse {
    pub id: i32,
    pub cow_id: i32,
    pub start_date: NaiveDate,
    pub lactation_number: i16,
    #[oai(skip_serializing_if_is_none)]
    pub pregnancy_id: Option<i32>,
    #[oai(skip_serializing_if_is_none)]
    pub actual_end_date: Option<NaiveDate>,
    pub days_in_lactation: i64,
    pub lactation_stage: String,
    /// End date, or `Ongoing`
    pub expected_end_date: String,
}

impl LactationResponse {
    pub fn new(lactation: lactation::Model, today: NaiveDate) -> Self {
        Self {
            days_in_lactation: days_in_lactation(&lactation, today),
            lactation_stage: lactation_stage(&lactation, today).to_string(),
            expected_end_date: expected_end_date(&lactation),
            id: lactation.id,
            cow_id: lactation.cow_id,
            start_date: lactation.start_date,
            lactation_number: lactation.lactation_number,
            pregnancy_id: lactation.pregnancy_id,
            actual_end_date: lactation.actual_end_date,
        }
    }
}

list_response!(LactationListResponse, LactationResponse);
record_response!(LactationApiResponse, LactationResponse);

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateMilkRequest {
    pub cow_id: i32,
    /// Defaults to now
    pub milking_date: Option<NaiveDateTime>,
    pub amount_in_kgs: f64,
}

/// Milk record changes. The cow and lactation stay as recorded.
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMilkRequest {
    pub milking_date: Option<NaiveDateTime>,
    pub amount_in_kgs: Option<f64>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct MilkResponse {
    pub id: i32,
    pub cow_id: i32,
    pub lactation_id: i32,
    pub milking_date: NaiveDateTime,
    pub amount_in_kgs: f64,
}

impl From<milk::Model> for MilkResponse {
    fn from(model: milk::Model) -> Self {
        Self {
            id: model.id,
            cow_id: model.cow_id,
            lactation_id: model.lactation_id,
            milking_date: model.milking_date,
            amount_in_kgs: model.amount_in_kgs,
        }
    }
}

list_response!(MilkListResponse, MilkResponse);
record_response!(MilkApiResponse, MilkResponse);
