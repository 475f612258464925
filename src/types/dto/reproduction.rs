use chrono::{NaiveDate, NaiveDateTime};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::providers::reproduction_validator_provider::{due_date, pregnancy_duration};
use crate::types::db::{heat, pregnancy};
use crate::types::dto::common::{list_response, record_response};

const ENDED: &str = "Ended";

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreatePregnancyRequest {
    pub cow_id: i32,
    pub start_date: NaiveDate,
    pub date_of_calving: Option<NaiveDate>,
    /// Defaults to `Unconfirmed`
    pub pregnancy_status: Option<String>,
    pub pregnancy_notes: Option<String>,
    pub calving_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<String>,
}

/// Pregnancy changes; omitted fields keep their value. The cow cannot change.
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePregnancyRequest {
    pub start_date: Option<NaiveDate>,
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: Option<String>,
    pub pregnancy_notes: Option<String>,
    pub calving_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<String>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct PregnancyResponse {
    pub id: i32,
    pub cow_id: i32,
    pub start_date: NaiveDate,
    #[oai(skip_serializing_if_is_none)]
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: String,
    #[oai(skip_serializing_if_is_none)]
    pub pregnancy_notes: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub calving_notes: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub pregnancy_scan_date: Option<NaiveDate>,
    #[oai(skip_serializing_if_is_none)]
    pub pregnancy_failed_date: Option<NaiveDate>,
    #[oai(skip_serializing_if_is_none)]
    pub pregnancy_outcome: Option<String>,
    /// Days since the start, or `Ended`
    pub pregnancy_duration: String,
    /// Expected calving date, or `Ended`
    pub due_date: String,
}

impl PregnancyResponse {
    pub fn new(pregnancy: pregnancy::Model, today: NaiveDate) -> Self {
        let duration = pregnancy_duration(
            pregnancy.start_date,
            pregnancy.date_of_calving,
            pregnancy.pregnancy_outcome.as_deref(),
            today,
        )
        .map_or_else(|| ENDED.to_string(), |days| days.to_string());
        let due = due_date(&pregnancy).map_or_else(|| ENDED.to_string(), |date| date.to_string());

        Self {
            id: pregnancy.id,
            cow_id: pregnancy.cow_id,
            start_date: pregnancy.start_date,
            date_of_calving: pregnancy.date_of_calving,
            pregnancy_status: pregnancy.pregnancy_status,
            pregnancy_notes: pregnancy.pregnancy_notes,
            calving_notes: pregnancy.calving_notes,
            pregnancy_scan_date: pregnancy.pregnancy_scan_date,
            pregnancy_failed_date: pregnancy.pregnancy_failed_date,
            pregnancy_outcome: pregnancy.pregnancy_outcome,
            pregnancy_duration: duration,
            due_date: due,
        }
    }
}

list_response!(PregnancyListResponse, PregnancyResponse);
record_response!(PregnancyApiResponse, PregnancyResponse);

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateHeatRequest {
    pub cow_id: i32,
    /// Defaults to now
    pub observation_time: Option<NaiveDateTime>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct HeatResponse {
    pub id: i32,
    pub cow_id: i32,
    pub observation_time: NaiveDateTime,
}

impl From<heat::Model> for HeatResponse {
    fn from(model: heat::Model) -> Self {
        Self {
            id: model.id,
            cow_id: model.cow_id,
            observation_time: model.observation_time,
        }
    }
}

list_response!(HeatListResponse, HeatResponse);
record_response!(HeatApiResponse, HeatResponse);
