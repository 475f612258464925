use chrono::NaiveDate;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::providers::cow_validator_provider::{days_since, tag_number};
use crate::types::db::{cow, cow_breed, inseminator};
use crate::types::dto::common::{list_response, record_response};

/// Breed name, one of the supported breeds
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CowBreedRequest {
    pub name: String,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct CowBreedResponse {
    pub id: i32,
    pub name: String,
}

impl From<cow_breed::Model> for CowBreedResponse {
    fn from(breed: cow_breed::Model) -> Self {
        Self {
            id: breed.id,
            name: breed.name,
        }
    }
}

list_response!(CowBreedListResponse, CowBreedResponse);
record_response!(CowBreedApiResponse, CowBreedResponse);

/// A new cow. The breed is given by name and created when missing.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CreateCowRequest {
    pub name: String,
    pub breed: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    /// Defaults to `Alive`
    pub availability_status: Option<String>,
    /// Defaults to `Unavailable`
    pub current_pregnancy_status: Option<String>,
    /// Defaults to `Calf`
    pub category: Option<String>,
    /// Defaults to `Calf`
    pub current_production_status: Option<String>,
    #[oai(default)]
    #[serde(default)]
    pub is_bought: bool,
    pub date_of_death: Option<NaiveDate>,
    pub sire_id: Option<i32>,
    pub dam_id: Option<i32>,
}

/// Cow changes. Breed, gender, parents and purchase details are fixed at
/// creation and cannot be changed here.
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCowRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub availability_status: Option<String>,
    pub current_pregnancy_status: Option<String>,
    pub category: Option<String>,
    pub current_production_status: Option<String>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct CowResponse {
    pub id: i32,
    pub name: String,
    pub breed: String,
    /// `<BR>-<year of birth>-<id>`, e.g. `FR-2022-5`
    pub tag_number: String,
    pub date_of_birth: NaiveDate,
    /// Days since birth
    pub age: i64,
    /// Days since the cow joined the farm
    pub age_in_farm: i64,
    pub gender: String,
    pub availability_status: String,
    pub current_pregnancy_status: String,
    pub category: String,
    pub current_production_status: String,
    pub is_bought: bool,
    pub date_introduced_in_farm: NaiveDate,
    #[oai(skip_serializing_if_is_none)]
    pub date_of_death: Option<NaiveDate>,
    #[oai(skip_serializing_if_is_none)]
    pub sire_id: Option<i32>,
    #[oai(skip_serializing_if_is_none)]
    pub dam_id: Option<i32>,
    /// Number of lactations on record
    pub parity: u64,
}

impl CowResponse {
    pub fn new(cow: cow::Model, breed_name: &str, parity: u64, today: NaiveDate) -> Self {
        Self {
            tag_number: tag_number(breed_name, cow.date_of_birth, cow.id),
            age: days_since(cow.date_of_birth, today),
            age_in_farm: days_since(cow.date_introduced_in_farm, today),
            id: cow.id,
            name: cow.name,
            breed: breed_name.to_string(),
            date_of_birth: cow.date_of_birth,
            gender: cow.gender,
            availability_status: cow.availability_status,
            current_pregnancy_status: cow.current_pregnancy_status,
            category: cow.category,
            current_production_status: cow.current_production_status,
            is_bought: cow.is_bought,
            date_introduced_in_farm: cow.date_introduced_in_farm,
            date_of_death: cow.date_of_death,
            sire_id: cow.sire_id,
            dam_id: cow.dam_id,
            parity,
        }
    }
}

list_response!(CowListResponse, CowResponse);
record_response!(CowApiResponse, CowResponse);

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct InseminatorRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub sex: String,
    pub company: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInseminatorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub sex: Option<String>,
    pub company: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct InseminatorResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub sex: String,
    #[oai(skip_serializing_if_is_none)]
    pub company: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub license_number: Option<String>,
}

impl From<inseminator::Model> for InseminatorResponse {
    fn from(model: inseminator::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            sex: model.sex,
            company: model.company,
            license_number: model.license_number,
        }
    }
}

list_response!(InseminatorListResponse, InseminatorResponse);
record_response!(InseminatorApiResponse, InseminatorResponse);
