use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::coordinators::{EmptyListing, finish_listing};
use crate::errors::InternalError;
use crate::errors::internal::PermissionError;
use crate::providers::production_validator_provider::LactationFields;
use crate::providers::{ALL_STAFF, MANAGEMENT, PermissionProvider, ProductionValidatorProvider};
use crate::stores::{
    CowStore, LactationFilter, LactationStore, MilkFilter, MilkStore, NewLactation, NewMilk, PregnancyStore,
};
use crate::types::db::{lactation, milk};
use crate::types::dto::production::{
    CreateLactationRequest, CreateMilkRequest, LactationListResponse, LactationResponse, MilkListResponse,
    MilkResponse, UpdateMilkRequest,
};
use crate::types::internal::context::RequestContext;

const LACTATION_LISTING: EmptyListing = EmptyListing {
    no_matches: "No Lactation record(s) found matching the provided filters.",
    nothing_yet: "No Lactation records found.",
};

const MILK_LISTING: EmptyListing = EmptyListing {
    no_matches: "No Milk record(s) found matching the provided filters.",
    nothing_yet: "No Milk records found.",
};

/// Lactation periods and milk yields
pub struct ProductionCoordinator {
    db: DatabaseConnection,
    cow_store: Arc<CowStore>,
    lactation_store: Arc<LactationStore>,
    milk_store: Arc<MilkStore>,
    pregnancy_store: Arc<PregnancyStore>,
    permission_provider: Arc<PermissionProvider>,
    production_validator: Arc<ProductionValidatorProvider>,
}

impl ProductionCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            cow_store: app_data.cow_store.clone(),
            lactation_store: app_data.lactation_store.clone(),
            milk_store: app_data.milk_store.clone(),
            pregnancy_store: app_data.pregnancy_store.clone(),
            permission_provider: app_data.permission_provider.clone(),
            production_validator: app_data.production_validator.clone(),
        }
    }

    pub async fn list_lactations(
        &self,
        ctx: &RequestContext,
        filter: LactationFilter,
    ) -> Result<LactationListResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let today = Utc::now().date_naive();
        let lactations = self.lactation_store.list(&self.db, &filter).await?;
        let results = lactations
            .into_iter()
            .map(|lactation| LactationResponse::new(lactation, today))
            .collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), LACTATION_LISTING)?;
        Ok(LactationListResponse::new(results, detail))
    }

    pub async fn get_lactation(&self, ctx: &RequestContext, id: i32) -> Result<LactationResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let lactation = self.find_lactation(id).await?;
        Ok(LactationResponse::new(lactation, Utc::now().date_naive()))
    }

    /// Record a lactation by hand
    ///
    /// Only cows bought in milk get lactations this way; home-bred cows get
    /// theirs when a calving is recorded on a pregnancy.
    pub async fn create_lactation(
        &self,
        ctx: &RequestContext,
        request: CreateLactationRequest,
    ) -> Result<LactationResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();

        let (cow, breed) = self
            .cow_store
            .find_with_breed(&self.db, request.cow_id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", request.cow_id))?;

        let fields = LactationFields {
            start_date: request.start_date,
            actual_end_date: request.actual_end_date,
            lactation_number: request.lactation_number.unwrap_or(1),
            pregnancy_id: request.pregnancy_id,
        };
        self.production_validator.validate_manual_entry(&cow)?;
        self.production_validator
            .validate_lactation(&cow, &breed.name, &fields, today)?;

        if let Some(pregnancy_id) = fields.pregnancy_id {
            if self.pregnancy_store.find_by_id(&self.db, pregnancy_id).await?.is_none() {
                return Err(InternalError::not_found("Pregnancy", pregnancy_id));
            }
        }

        let lactation = self
            .lactation_store
            .insert(
                &self.db,
                NewLactation {
                    cow_id: cow.id,
                    start_date: fields.start_date,
                    lactation_number: fields.lactation_number,
                    pregnancy_id: fields.pregnancy_id,
                    actual_end_date: fields.actual_end_date,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            cow_id = cow.id,
            lactation_id = lactation.id,
            "Lactation {} recorded",
            lactation.lactation_number
        );
        Ok(LactationResponse::new(lactation, today))
    }

    /// Lactations opened by a calving stay with their pregnancy
    pub async fn delete_lactation(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let lactation = self.find_lactation(id).await?;

        if lactation.pregnancy_id.is_some() {
            return Err(PermissionError::forbidden(
                "protected_lactation",
                "Deletion not allowed. Lactation record is associated with a pregnancy.",
            )
            .into());
        }

        self.lactation_store.delete(&self.db, id).await?;
        tracing::info!(request_id = %ctx.request_id, lactation_id = id, "Lactation deleted");
        Ok(())
    }

    async fn find_lactation(&self, id: i32) -> Result<lactation::Model, InternalError> {
        self.lactation_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Lactation", id))
    }

    pub async fn list_milk(&self, ctx: &RequestContext, filter: MilkFilter) -> Result<MilkListResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let records = self.milk_store.list(&self.db, &filter).await?;
        let results = records.into_iter().map(MilkResponse::from).collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), MILK_LISTING)?;
        Ok(MilkListResponse::new(results, detail))
    }

    pub async fn get_milk(&self, ctx: &RequestContext, id: i32) -> Result<MilkResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        Ok(self.find_milk(id).await?.into())
    }

    /// Record a milking against the cow's latest lactation
    pub async fn create_milk(&self, ctx: &RequestContext, request: CreateMilkRequest) -> Result<MilkResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let now = Utc::now().naive_utc();

        self.production_validator.validate_milk_amount(request.amount_in_kgs)?;
        let cow = self
            .cow_store
            .find_by_id(&self.db, request.cow_id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", request.cow_id))?;
        let latest = self.lactation_store.latest_for_cow(&self.db, cow.id).await?;
        self.production_validator
            .validate_milk_cow(&cow, latest.as_ref(), now.date())?;

        // validate_milk_cow rejects cows without a lactation
        let Some(lactation) = latest else {
            return Err(InternalError::not_found("Lactation for cow", cow.id));
        };

        let record = self
            .milk_store
            .insert(
                &self.db,
                NewMilk {
                    cow_id: cow.id,
                    lactation_id: lactation.id,
                    milking_date: request.milking_date.unwrap_or(now),
                    amount_in_kgs: request.amount_in_kgs,
                },
            )
            .await?;

        tracing::debug!(request_id = %ctx.request_id, cow_id = cow.id, "Milk record added");
        Ok(record.into())
    }

    pub async fn update_milk(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: UpdateMilkRequest,
    ) -> Result<MilkResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let mut record = self.find_milk(id).await?;

        if let Some(amount_in_kgs) = request.amount_in_kgs {
            self.production_validator.validate_milk_amount(amount_in_kgs)?;
            record.amount_in_kgs = amount_in_kgs;
        }
        if let Some(milking_date) = request.milking_date {
            record.milking_date = milking_date;
        }

        let record = self.milk_store.update(&self.db, record).await?;
        Ok(record.into())
    }

    pub async fn delete_milk(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        if !self.milk_store.delete(&self.db, id).await? {
            return Err(InternalError::not_found("Milk record", id));
        }
        Ok(())
    }

    async fn find_milk(&self, id: i32) -> Result<milk::Model, InternalError> {
        self.milk_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Milk record", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::test::utils::{claims_for, date, insert_cow, setup_test_app_data};
    use crate::types::db::cow;
    use crate::types::internal::auth::{FarmRole, RoleFlags};

    fn ctx_with(role: FarmRole) -> RequestContext {
        let mut roles = RoleFlags::default();
        roles.assign(role);
        RequestContext::anonymous().with_auth(claims_for(1, roles))
    }

    /// A bought, four-year-old milking cow
    async fn bought_cow(app_data: &AppData) -> cow::Model {
        let today = Utc::now().date_naive();
        let mut cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", today - Duration::days(4 * 365)).await;
        cow.is_bought = true;
        app_data.cow_store.update(&app_data.db, cow).await.unwrap()
    }

    fn lactation_request(cow_id: i32, start_days_ago: i64) -> CreateLactationRequest {
        CreateLactationRequest {
            cow_id,
            start_date: Utc::now().date_naive() - Duration::days(start_days_ago),
            lactation_number: Some(2),
            pregnancy_id: None,
            actual_end_date: None,
        }
    }

    #[tokio::test]
    async fn test_manual_lactation_for_bought_cow() {
        let app_data = setup_test_app_data().await;
        let cow = bought_cow(&app_data).await;
        let coordinator = ProductionCoordinator::new(app_data);

        let lactation = coordinator
            .create_lactation(&ctx_with(FarmRole::FarmManager), lactation_request(cow.id, 50))
            .await
            .unwrap();

        assert_eq!(lactation.days_in_lactation, 50);
        assert_eq!(lactation.lactation_stage, "Early");
        assert_eq!(lactation.expected_end_date, "Ongoing");
    }

    #[tokio::test]
    async fn test_manual_lactation_rejected_for_home_bred_cow() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Home", "Jersey", "Female", date(2019, 1, 1)).await;
        let coordinator = ProductionCoordinator::new(app_data);

        let err = coordinator
            .create_lactation(&ctx_with(FarmRole::FarmOwner), lactation_request(cow.id, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "manual_entry_only_on_bought_cows"));
    }

    #[tokio::test]
    async fn test_lactation_linked_to_pregnancy_cannot_be_deleted() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Home", "Jersey", "Female", date(2019, 1, 1)).await;
        let pregnancy = app_data
            .pregnancy_store
            .insert(
                &app_data.db,
                crate::stores::NewPregnancy {
                    cow_id: cow.id,
                    start_date: date(2021, 1, 1),
                    date_of_calving: Some(date(2021, 10, 10)),
                    pregnancy_status: "Confirmed".to_string(),
                    pregnancy_notes: None,
                    calving_notes: None,
                    pregnancy_scan_date: None,
                    pregnancy_failed_date: None,
                    pregnancy_outcome: Some("Live".to_string()),
                },
            )
            .await
            .unwrap();
        let lactation = app_data
            .lactation_store
            .insert(
                &app_data.db,
                NewLactation {
                    cow_id: cow.id,
                    start_date: date(2021, 10, 10),
                    lactation_number: 1,
                    pregnancy_id: Some(pregnancy.id),
                    actual_end_date: None,
                },
            )
            .await
            .unwrap();
        let coordinator = ProductionCoordinator::new(app_data);

        let err = coordinator
            .delete_lactation(&ctx_with(FarmRole::FarmOwner), lactation.id)
            .await
            .unwrap_err();

        match err {
            InternalError::Permission(PermissionError::Forbidden { message, .. }) => {
                assert_eq!(message, "Deletion not allowed. Lactation record is associated with a pregnancy.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_milk_goes_to_latest_lactation() {
        let app_data = setup_test_app_data().await;
        let cow = bought_cow(&app_data).await;
        let coordinator = ProductionCoordinator::new(app_data);
        let lactation = coordinator
            .create_lactation(&ctx_with(FarmRole::FarmManager), lactation_request(cow.id, 30))
            .await
            .unwrap();

        let record = coordinator
            .create_milk(
                &ctx_with(FarmRole::FarmWorker),
                CreateMilkRequest {
                    cow_id: cow.id,
                    milking_date: None,
                    amount_in_kgs: 12.5,
                },
            )
            .await
            .unwrap();

        assert_eq!(record.lactation_id, lactation.id);
        assert_eq!(record.amount_in_kgs, 12.5);
    }

    #[tokio::test]
    async fn test_milk_requires_lactation() {
        let app_data = setup_test_app_data().await;
        let cow = bought_cow(&app_data).await;
        let coordinator = ProductionCoordinator::new(app_data);

        let err = coordinator
            .create_milk(
                &ctx_with(FarmRole::FarmWorker),
                CreateMilkRequest {
                    cow_id: cow.id,
                    milking_date: None,
                    amount_in_kgs: 10.0,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "no_active_lactation"));
    }

    #[tokio::test]
    async fn test_milk_amount_limit() {
        let app_data = setup_test_app_data().await;
        let cow = bought_cow(&app_data).await;
        let coordinator = ProductionCoordinator::new(app_data);

        let err = coordinator
            .create_milk(
                &ctx_with(FarmRole::FarmWorker),
                CreateMilkRequest {
                    cow_id: cow.id,
                    milking_date: None,
                    amount_in_kgs: 40.0,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "exceeds_maximum_amount"));
    }

    #[tokio::test]
    async fn test_worker_cannot_list_milk() {
        let app_data = setup_test_app_data().await;
        let coordinator = ProductionCoordinator::new(app_data);

        let err = coordinator
            .list_milk(&ctx_with(FarmRole::FarmWorker), MilkFilter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Permission(PermissionError::Denied(_))));
    }

    #[tokio::test]
    async fn test_empty_milk_listing() {
        let app_data = setup_test_app_data().await;
        let coordinator = ProductionCoordinator::new(app_data);

        let listing = coordinator
            .list_milk(&ctx_with(FarmRole::FarmManager), MilkFilter::default())
            .await
            .unwrap();

        assert_eq!(listing.detail.as_deref(), Some("No Milk records found."));
    }
}
