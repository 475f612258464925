use chrono::NaiveDate;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::{culling_record, weight_record};
use crate::types::dto::common::{list_response, record_response};

/// A weighing, dated today
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateWeightRecordRequest {
    pub cow_id: i32,
    pub weight_in_kgs: f64,
}

#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWeightRecordRequest {
    pub weight_in_kgs: Option<f64>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct WeightRecordResponse {
    pub id: i32,
    pub cow_id: i32,
    pub weight_in_kgs: f64,
    pub date_taken: NaiveDate,
}

impl From<weight_record::Model> for WeightRecordResponse {
    fn from(model: weight_record::Model) -> Self {
        Self {
            id: model.id,
            cow_id: model.cow_id,
            weight_in_kgs: model.weight_in_kgs,
            date_taken: model.date_taken,
        }
    }
}

list_response!(WeightRecordListResponse, WeightRecordResponse);
record_response!(WeightRecordApiResponse, WeightRecordResponse);

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateCullingRecordRequest {
    pub cow_id: i32,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct CullingRecordResponse {
    pub id: i32,
    pub cow_id: i32,
    pub reason: String,
    #[oai(skip_serializing_if_is_none)]
    pub notes: Option<String>,
    pub date_carried: NaiveDate,
}

impl From<culling_record::Model> for CullingRecordResponse {
    fn from(model: culling_record::Model) -> Self {
        Self {
            id: model.id,
            cow_id: model.cow_id,
            reason: model.reason,
            notes: model.notes,
            date_carried: model.date_carried,
        }
    }
}

list_response!(CullingRecordListResponse, CullingRecordResponse);
record_response!(CullingRecordApiResponse, CullingRecordResponse);
