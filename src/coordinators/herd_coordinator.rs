use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::coordinators::{EmptyListing, finish_listing};
use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::providers::cow_validator_provider::tag_number;
use crate::providers::{ALL_STAFF, CowValidatorProvider, MANAGEMENT, PermissionProvider};
use crate::stores::{
    CowBreedStore, CowFilter, CowGroup, CowStore, InseminatorStore, NewCow, NewInseminator, PregnancyStore,
};
use crate::types::db::{cow, cow_breed, inseminator};
use crate::types::dto::herd::{
    CowBreedListResponse, CowBreedRequest, CowBreedResponse, CowListResponse, CowResponse, CreateCowRequest,
    InseminatorListResponse, InseminatorRequest, InseminatorResponse, UpdateCowRequest, UpdateInseminatorRequest,
};
use crate::types::internal::choices::{
    AvailabilityStatus, CowCategory, CowPregnancyStatus, ProductionStatus,
};
use crate::types::internal::context::RequestContext;

const BREED_LISTING: EmptyListing = EmptyListing {
    no_matches: "No cow breed(s) found matching the provided filters.",
    nothing_yet: "No cow breeds found in the farm yet.",
};

const COW_LISTING: EmptyListing = EmptyListing {
    no_matches: "No cow(s) found matching the provided filters.",
    nothing_yet: "No cows found in the farm yet.",
};

const INSEMINATOR_LISTING: EmptyListing = EmptyListing {
    no_matches: "No inseminators found matching the provided filters.",
    nothing_yet: "No inseminators found in the farm yet.",
};

/// Breeds, cows and inseminators
pub struct HerdCoordinator {
    db: DatabaseConnection,
    cow_breed_store: Arc<CowBreedStore>,
    cow_store: Arc<CowStore>,
    inseminator_store: Arc<InseminatorStore>,
    pregnancy_store: Arc<PregnancyStore>,
    permission_provider: Arc<PermissionProvider>,
    cow_validator: Arc<CowValidatorProvider>,
}

impl HerdCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            cow_breed_store: app_data.cow_breed_store.clone(),
            cow_store: app_data.cow_store.clone(),
            inseminator_store: app_data.inseminator_store.clone(),
            pregnancy_store: app_data.pregnancy_store.clone(),
            permission_provider: app_data.permission_provider.clone(),
            cow_validator: app_data.cow_validator.clone(),
        }
    }

    // Breeds

    pub async fn list_breeds(
        &self,
        ctx: &RequestContext,
        name: Option<String>,
    ) -> Result<CowBreedListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let breeds = self.cow_breed_store.list(&self.db, name.as_deref()).await?;
        let results = breeds.into_iter().map(CowBreedResponse::from).collect();
        let (results, detail) = finish_listing(results, name.is_some(), BREED_LISTING)?;
        Ok(CowBreedListResponse::new(results, detail))
    }

    pub async fn get_breed(&self, ctx: &RequestContext, id: i32) -> Result<CowBreedResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        Ok(self.find_breed(id).await?.into())
    }

    pub async fn create_breed(
        &self,
        ctx: &RequestContext,
        request: CowBreedRequest,
    ) -> Result<CowBreedResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let name = self.cow_validator.validate_breed_name(&request.name)?;
        self.ensure_breed_name_free(name.as_str(), None).await?;

        let breed = self.cow_breed_store.insert(&self.db, name.as_str()).await?;
        tracing::info!(request_id = %ctx.request_id, breed_id = breed.id, "Cow breed {} created", breed.name);
        Ok(breed.into())
    }

    pub async fn update_breed(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: CowBreedRequest,
    ) -> Result<CowBreedResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let breed = self.find_breed(id).await?;
        let name = self.cow_validator.validate_breed_name(&request.name)?;
        self.ensure_breed_name_free(name.as_str(), Some(id)).await?;

        let breed = self.cow_breed_store.rename(&self.db, breed, name.as_str()).await?;
        Ok(breed.into())
    }

    /// Breeds still referenced by a cow cannot be removed
    pub async fn delete_breed(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let breed = self.find_breed(id).await?;

        let in_use = self.cow_breed_store.usage_count(&self.db, id).await?;
        if in_use > 0 {
            return Err(ValidationError::new(
                "protected_cow_breed",
                format!(
                    "Cannot delete the breed '{}' because {} cow(s) still belong to it.",
                    breed.name, in_use
                ),
            )
            .into());
        }

        self.cow_breed_store.delete(&self.db, id).await?;
        tracing::info!(request_id = %ctx.request_id, breed_id = id, "Cow breed deleted");
        Ok(())
    }

    async fn find_breed(&self, id: i32) -> Result<cow_breed::Model, InternalError> {
        self.cow_breed_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow breed", id))
    }

    async fn ensure_breed_name_free(&self, name: &str, exclude_id: Option<i32>) -> Result<(), InternalError> {
        match self.cow_breed_store.find_by_name(&self.db, name).await? {
            Some(existing) if Some(existing.id) != exclude_id => Err(ValidationError::new(
                "duplicate_cow_breed",
                format!("A breed with the name '{}' already exists.", name),
            )
            .into()),
            _ => Ok(()),
        }
    }

    // Cows

    pub async fn list_cows(&self, ctx: &RequestContext, filter: CowFilter) -> Result<CowListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let cows = self.cow_store.list(&self.db, &filter).await?;
        let results = self.cow_responses(cows).await?;
        let (results, detail) = finish_listing(results, !filter.is_empty(), COW_LISTING)?;
        Ok(CowListResponse::new(results, detail))
    }

    /// One of the predefined herd subsets (available, pregnant, sold, ...)
    pub async fn list_cow_group(&self, ctx: &RequestContext, group: CowGroup) -> Result<CowListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let cows = self.cow_store.list_group(&self.db, group).await?;
        let results = self.cow_responses(cows).await?;
        let (results, detail) = finish_listing(results, false, COW_LISTING)?;
        Ok(CowListResponse::new(results, detail))
    }

    /// Cows whose dam is `cow_id`
    pub async fn list_calves(&self, ctx: &RequestContext, cow_id: i32) -> Result<CowListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        self.find_cow(cow_id).await?;
        let calves = self.cow_store.list_calves(&self.db, cow_id).await?;
        let results = self.cow_responses(calves).await?;
        Ok(CowListResponse::new(results, None))
    }

    pub async fn get_cow(&self, ctx: &RequestContext, id: i32) -> Result<CowResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let (cow, breed) = self
            .cow_store
            .find_with_breed(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))?;
        self.cow_response(cow, &breed.name).await
    }

    /// Register a cow. Missing statuses fall back to a newborn calf's.
    pub async fn create_cow(&self, ctx: &RequestContext, request: CreateCowRequest) -> Result<CowResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();

        self.cow_validator.validate_name(&request.name)?;
        let breed_name = self.cow_validator.validate_breed_name(&request.breed)?;
        let choices = self.cow_validator.validate_choices(
            &request.gender,
            request
                .availability_status
                .as_deref()
                .unwrap_or(AvailabilityStatus::Alive.as_str()),
            request
                .current_pregnancy_status
                .as_deref()
                .unwrap_or(CowPregnancyStatus::Unavailable.as_str()),
            request.category.as_deref().unwrap_or(CowCategory::Calf.as_str()),
            request
                .current_production_status
                .as_deref()
                .unwrap_or(ProductionStatus::Calf.as_str()),
        )?;
        self.cow_validator.validate_date_of_birth(request.date_of_birth, today)?;

        let sire = self.find_parent(request.sire_id).await?;
        let dam = self.find_parent(request.dam_id).await?;
        self.cow_validator.validate_parents(sire.as_ref(), dam.as_ref())?;

        let breed = self.cow_breed_store.get_or_create(&self.db, breed_name.as_str()).await?;
        let cow = self
            .cow_store
            .insert(
                &self.db,
                NewCow {
                    name: request.name,
                    breed_id: breed.id,
                    date_of_birth: request.date_of_birth,
                    gender: choices.gender.as_str().to_string(),
                    availability_status: choices.availability_status.as_str().to_string(),
                    current_pregnancy_status: choices.current_pregnancy_status.as_str().to_string(),
                    category: choices.category.as_str().to_string(),
                    current_production_status: choices.current_production_status.as_str().to_string(),
                    is_bought: request.is_bought,
                    date_introduced_in_farm: today,
                    date_of_death: request.date_of_death,
                    sire_id: request.sire_id,
                    dam_id: request.dam_id,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            cow_id = cow.id,
            "Cow {} registered",
            tag_number(&breed.name, cow.date_of_birth, cow.id)
        );
        Ok(CowResponse::new(cow, &breed.name, 0, today))
    }

    /// Change a cow's name, birth date, statuses or date of death
    pub async fn update_cow(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: UpdateCowRequest,
    ) -> Result<CowResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();
        let (mut cow, breed) = self
            .cow_store
            .find_with_breed(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))?;

        if let Some(name) = request.name {
            cow.name = name;
        }
        if let Some(date_of_birth) = request.date_of_birth {
            cow.date_of_birth = date_of_birth;
        }
        if let Some(status) = request.availability_status {
            cow.availability_status = status;
        }
        if let Some(status) = request.current_pregnancy_status {
            cow.current_pregnancy_status = status;
        }
        if let Some(category) = request.category {
            cow.category = category;
        }
        if let Some(status) = request.current_production_status {
            cow.current_production_status = status;
        }
        if request.date_of_death.is_some() {
            cow.date_of_death = request.date_of_death;
        }

        self.cow_validator.validate_name(&cow.name)?;
        self.cow_validator.validate_choices(
            &cow.gender,
            &cow.availability_status,
            &cow.current_pregnancy_status,
            &cow.category,
            &cow.current_production_status,
        )?;
        self.cow_validator.validate_date_of_birth(cow.date_of_birth, today)?;

        let cow = self.cow_store.update(&self.db, cow).await?;
        tracing::info!(request_id = %ctx.request_id, cow_id = cow.id, "Cow updated");
        self.cow_response(cow, &breed.name).await
    }

    /// Cows with pregnancy history are kept for the records
    pub async fn delete_cow(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let (cow, breed) = self
            .cow_store
            .find_with_breed(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))?;

        if self.pregnancy_store.count_for_cow(&self.db, id).await? > 0 {
            return Err(ValidationError::new(
                "protected_cow",
                format!(
                    "Cannot delete cow {} because it has pregnancy records.",
                    tag_number(&breed.name, cow.date_of_birth, cow.id)
                ),
            )
            .into());
        }

        self.cow_store.delete(&self.db, id).await?;
        tracing::info!(request_id = %ctx.request_id, cow_id = id, "Cow deleted");
        Ok(())
    }

    async fn find_cow(&self, id: i32) -> Result<cow::Model, InternalError> {
        self.cow_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))
    }

    async fn find_parent(&self, id: Option<i32>) -> Result<Option<cow::Model>, InternalError> {
        match id {
            Some(id) => self.find_cow(id).await.map(Some),
            None => Ok(None),
        }
    }

    async fn cow_response(&self, cow: cow::Model, breed_name: &str) -> Result<CowResponse, InternalError> {
        let parity = self.cow_store.parity(&self.db, cow.id).await?;
        Ok(CowResponse::new(cow, breed_name, parity, today()))
    }

    async fn cow_responses(&self, cows: Vec<cow::Model>) -> Result<Vec<CowResponse>, InternalError> {
        let breeds: HashMap<i32, String> = self
            .cow_breed_store
            .list(&self.db, None)
            .await?
            .into_iter()
            .map(|breed| (breed.id, breed.name))
            .collect();

        let mut responses = Vec::with_capacity(cows.len());
        for cow in cows {
            let breed_name = breeds.get(&cow.breed_id).cloned().unwrap_or_default();
            responses.push(self.cow_response(cow, &breed_name).await?);
        }
        Ok(responses)
    }

    // Inseminators

    pub async fn list_inseminators(&self, ctx: &RequestContext) -> Result<InseminatorListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let inseminators = self.inseminator_store.list(&self.db).await?;
        let results = inseminators.into_iter().map(InseminatorResponse::from).collect();
        let (results, detail) = finish_listing(results, false, INSEMINATOR_LISTING)?;
        Ok(InseminatorListResponse::new(results, detail))
    }

    pub async fn get_inseminator(&self, ctx: &RequestContext, id: i32) -> Result<InseminatorResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        Ok(self.find_inseminator(id).await?.into())
    }

    pub async fn create_inseminator(
        &self,
        ctx: &RequestContext,
        request: InseminatorRequest,
    ) -> Result<InseminatorResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let sex = self.cow_validator.validate_inseminator(
            &request.first_name,
            &request.last_name,
            &request.phone_number,
            &request.sex,
            request.company.as_deref(),
            request.license_number.as_deref(),
        )?;
        self.ensure_inseminator_unique(&request.phone_number, request.license_number.as_deref(), None)
            .await?;

        let inseminator = self
            .inseminator_store
            .insert(
                &self.db,
                NewInseminator {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    phone_number: request.phone_number,
                    sex: sex.as_str().to_string(),
                    company: request.company,
                    license_number: request.license_number,
                },
            )
            .await?;

        tracing::info!(request_id = %ctx.request_id, inseminator_id = inseminator.id, "Inseminator added");
        Ok(inseminator.into())
    }

    pub async fn update_inseminator(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: UpdateInseminatorRequest,
    ) -> Result<InseminatorResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let mut inseminator = self.find_inseminator(id).await?;

        if let Some(first_name) = request.first_name {
            inseminator.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            inseminator.last_name = last_name;
        }
        if let Some(phone_number) = request.phone_number {
            inseminator.phone_number = phone_number;
        }
        if let Some(sex) = request.sex {
            inseminator.sex = sex;
        }
        if request.company.is_some() {
            inseminator.company = request.company;
        }
        if request.license_number.is_some() {
            inseminator.license_number = request.license_number;
        }

        let sex = self.cow_validator.validate_inseminator(
            &inseminator.first_name,
            &inseminator.last_name,
            &inseminator.phone_number,
            &inseminator.sex,
            inseminator.company.as_deref(),
            inseminator.license_number.as_deref(),
        )?;
        self.ensure_inseminator_unique(&inseminator.phone_number, inseminator.license_number.as_deref(), Some(id))
            .await?;
        inseminator.sex = sex.as_str().to_string();

        let inseminator = self.inseminator_store.update(&self.db, inseminator).await?;
        Ok(inseminator.into())
    }

    pub async fn delete_inseminator(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        if !self.inseminator_store.delete(&self.db, id).await? {
            return Err(InternalError::not_found("Inseminator", id));
        }
        tracing::info!(request_id = %ctx.request_id, inseminator_id = id, "Inseminator removed");
        Ok(())
    }

    async fn find_inseminator(&self, id: i32) -> Result<inseminator::Model, InternalError> {
        self.inseminator_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Inseminator", id))
    }

    async fn ensure_inseminator_unique(
        &self,
        phone_number: &str,
        license_number: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<(), InternalError> {
        if self
            .inseminator_store
            .phone_in_use(&self.db, phone_number, exclude_id)
            .await?
        {
            return Err(ValidationError::new(
                "duplicate_phone_number",
                "An inseminator with this phone number already exists.",
            )
            .into());
        }
        if let Some(license_number) = license_number {
            if self
                .inseminator_store
                .license_in_use(&self.db, license_number, exclude_id)
                .await?
            {
                return Err(ValidationError::new(
                    "duplicate_license_number",
                    "An inseminator with this license number already exists.",
                )
                .into());
            }
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
