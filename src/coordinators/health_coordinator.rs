use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::DatabaseConnections;
use crate::coordinators::{EmptyListing, finish_listing};
use crate::errors::InternalError;
use crate::providers::{HealthValidatorProvider, MANAGEMENT, Permission, PermissionProvider};
use crate::stores::{CowStore, CullingRecordFilter, CullingRecordStore, WeightRecordFilter, WeightRecordStore};
use crate::types::db::{cow, culling_record, weight_record};
use crate::types::dto::health::{
    CreateCullingRecordRequest, CreateWeightRecordRequest, CullingRecordListResponse, CullingRecordResponse,
    UpdateWeightRecordRequest, WeightRecordListResponse, WeightRecordResponse,
};
use crate::types::internal::choices::{CowPregnancyStatus, ProductionStatus};
use crate::types::internal::context::RequestContext;

/// Weighing is done by assistants and up
const WEIGHT_KEEPERS: &[Permission] = &[
    Permission::AssistantFarmManager,
    Permission::FarmManager,
    Permission::FarmOwner,
];

const WEIGHT_LISTING: EmptyListing = EmptyListing {
    no_matches: "No Weight records found matching the provided filters.",
    nothing_yet: "No Weight records found.",
};

const CULLING_LISTING: EmptyListing = EmptyListing {
    no_matches: "No Culling records found matching the provided filters.",
    nothing_yet: "No Culling records found.",
};

/// Weight records and culling
pub struct HealthCoordinator {
    connections: DatabaseConnections,
    db: DatabaseConnection,
    cow_store: Arc<CowStore>,
    weight_record_store: Arc<WeightRecordStore>,
    culling_record_store: Arc<CullingRecordStore>,
    permission_provider: Arc<PermissionProvider>,
    health_validator: Arc<HealthValidatorProvider>,
}

impl HealthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            connections: app_data.connections.clone(),
            db: app_data.db.clone(),
            cow_store: app_data.cow_store.clone(),
            weight_record_store: app_data.weight_record_store.clone(),
            culling_record_store: app_data.culling_record_store.clone(),
            permission_provider: app_data.permission_provider.clone(),
            health_validator: app_data.health_validator.clone(),
        }
    }

    pub async fn list_weight_records(
        &self,
        ctx: &RequestContext,
        filter: WeightRecordFilter,
    ) -> Result<WeightRecordListResponse, InternalError> {
        self.permission_provider.require_any(ctx, WEIGHT_KEEPERS)?;
        let records = self.weight_record_store.list(&self.db, &filter).await?;
        let results = records.into_iter().map(WeightRecordResponse::from).collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), WEIGHT_LISTING)?;
        Ok(WeightRecordListResponse::new(results, detail))
    }

    pub async fn get_weight_record(&self, ctx: &RequestContext, id: i32) -> Result<WeightRecordResponse, InternalError> {
        self.permission_provider.require_any(ctx, WEIGHT_KEEPERS)?;
        Ok(self.find_weight_record(id).await?.into())
    }

    /// Weigh a cow today; one weighing per cow per day
    pub async fn create_weight_record(
        &self,
        ctx: &RequestContext,
        request: CreateWeightRecordRequest,
    ) -> Result<WeightRecordResponse, InternalError> {
        self.permission_provider.require_any(ctx, WEIGHT_KEEPERS)?;
        let today = Utc::now().date_naive();

        self.health_validator.validate_weight(request.weight_in_kgs)?;
        let cow = self.find_cow(request.cow_id).await?;
        self.health_validator.validate_weighable(&cow)?;
        if self
            .weight_record_store
            .exists_on_date(&self.db, cow.id, today, None)
            .await?
        {
            return Err(self.health_validator.duplicate_weight_record().into());
        }

        let record = self
            .weight_record_store
            .insert(&self.db, cow.id, request.weight_in_kgs, today)
            .await?;
        tracing::debug!(request_id = %ctx.request_id, cow_id = cow.id, "Weight recorded");
        Ok(record.into())
    }

    pub async fn update_weight_record(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: UpdateWeightRecordRequest,
    ) -> Result<WeightRecordResponse, InternalError> {
        self.permission_provider.require_any(ctx, WEIGHT_KEEPERS)?;
        let mut record = self.find_weight_record(id).await?;

        if let Some(weight_in_kgs) = request.weight_in_kgs {
            self.health_validator.validate_weight(weight_in_kgs)?;
            record.weight_in_kgs = weight_in_kgs;
        }

        let record = self.weight_record_store.update(&self.db, record).await?;
        Ok(record.into())
    }

    pub async fn delete_weight_record(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, WEIGHT_KEEPERS)?;
        if !self.weight_record_store.delete(&self.db, id).await? {
            return Err(InternalError::not_found("Weight record", id));
        }
        Ok(())
    }

    async fn find_weight_record(&self, id: i32) -> Result<weight_record::Model, InternalError> {
        self.weight_record_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Weight record", id))
    }

    pub async fn list_culling_records(
        &self,
        ctx: &RequestContext,
        filter: CullingRecordFilter,
    ) -> Result<CullingRecordListResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let records = self.culling_record_store.list(&self.db, &filter).await?;
        let results = records.into_iter().map(CullingRecordResponse::from).collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), CULLING_LISTING)?;
        Ok(CullingRecordListResponse::new(results, detail))
    }

    pub async fn get_culling_record(&self, ctx: &RequestContext, id: i32) -> Result<CullingRecordResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        Ok(self.find_culling_record(id).await?.into())
    }

    /// Cull a cow
    ///
    /// The record and the cow's new statuses (Culled, Unavailable) are
    /// written in one transaction.
    pub async fn create_culling_record(
        &self,
        ctx: &RequestContext,
        request: CreateCullingRecordRequest,
    ) -> Result<CullingRecordResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();

        let reason = self
            .health_validator
            .validate_culling(&request.reason, request.notes.as_deref())?;
        let cow = self.find_cow(request.cow_id).await?;
        if self
            .culling_record_store
            .find_for_cow(&self.db, cow.id)
            .await?
            .is_some()
        {
            return Err(self.health_validator.duplicate_culling_record(cow.id).into());
        }

        let txn = self.connections.begin_transaction().await?;
        let record = self
            .culling_record_store
            .insert(&txn, cow.id, reason.as_str(), request.notes, today)
            .await?;
        self.cow_store
            .set_statuses(
                &txn,
                cow,
                Some(CowPregnancyStatus::Unavailable),
                Some(ProductionStatus::Culled),
            )
            .await?;
        DatabaseConnections::commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            cow_id = record.cow_id,
            "Cow culled: {}",
            record.reason
        );
        Ok(record.into())
    }

    pub async fn delete_culling_record(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        if !self.culling_record_store.delete(&self.db, id).await? {
            return Err(InternalError::not_found("Culling record", id));
        }
        Ok(())
    }

    async fn find_culling_record(&self, id: i32) -> Result<culling_record::Model, InternalError> {
        self.culling_record_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Culling record", id))
    }

    async fn find_cow(&self, id: i32) -> Result<cow::Model, InternalError> {
        self.cow_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::PermissionError;
    use crate::test::utils::{claims_for, date, insert_cow, setup_test_app_data};
    use crate::types::internal::auth::{FarmRole, RoleFlags};

    fn ctx_with(role: FarmRole) -> RequestContext {
        let mut roles = RoleFlags::default();
        roles.assign(role);
        RequestContext::anonymous().with_auth(claims_for(1, roles))
    }

    #[tokio::test]
    async fn test_one_weighing_per_day() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 5, 1)).await;
        let coordinator = HealthCoordinator::new(app_data);
        let ctx = ctx_with(FarmRole::AssistantFarmManager);
        let request = CreateWeightRecordRequest {
            cow_id: cow.id,
            weight_in_kgs: 420.0,
        };

        let record = coordinator.create_weight_record(&ctx, request.clone()).await.unwrap();
        assert_eq!(record.date_taken, Utc::now().date_naive());

        let err = coordinator.create_weight_record(&ctx, request).await.unwrap_err();
        assert!(matches!(err, InternalError::Validation(v) if v.code == "duplicate_weight_record"));
    }

    #[tokio::test]
    async fn test_weight_bounds() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 5, 1)).await;
        let coordinator = HealthCoordinator::new(app_data);

        let err = coordinator
            .create_weight_record(
                &ctx_with(FarmRole::FarmManager),
                CreateWeightRecordRequest {
                    cow_id: cow.id,
                    weight_in_kgs: 1600.0,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "invalid_weight"));
    }

    #[tokio::test]
    async fn test_worker_cannot_weigh() {
        let app_data = setup_test_app_data().await;
        let coordinator = HealthCoordinator::new(app_data);

        let err = coordinator
            .list_weight_records(&ctx_with(FarmRole::FarmWorker), WeightRecordFilter::default())
            .await
            .unwrap_err();

        match err {
            InternalError::Permission(PermissionError::Denied(message)) => assert_eq!(
                message,
                "Only farm owners, managers, and assistants have permission to perform this action."
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_culling_updates_cow() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2015, 5, 1)).await;
        let coordinator = HealthCoordinator::new(app_data.clone());
        let ctx = ctx_with(FarmRole::FarmOwner);

        let record = coordinator
            .create_culling_record(
                &ctx,
                CreateCullingRecordRequest {
                    cow_id: cow.id,
                    reason: "Age".to_string(),
                    notes: Some("Fourteen lactations".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(record.reason, "Age");

        let stored = app_data.cow_store.find_by_id(&app_data.db, cow.id).await.unwrap().unwrap();
        assert_eq!(stored.current_production_status, "Culled");
        assert_eq!(stored.current_pregnancy_status, "Unavailable");

        let err = coordinator
            .create_culling_record(
                &ctx,
                CreateCullingRecordRequest {
                    cow_id: cow.id,
                    reason: "Age".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Validation(v) if v.code == "duplicate_culling_record"));
    }

    #[tokio::test]
    async fn test_culling_reason_must_be_known() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2015, 5, 1)).await;
        let coordinator = HealthCoordinator::new(app_data);

        let err = coordinator
            .create_culling_record(
                &ctx_with(FarmRole::FarmManager),
                CreateCullingRecordRequest {
                    cow_id: cow.id,
                    reason: "Boredom".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "invalid_reason"));
    }

    #[tokio::test]
    async fn test_filtered_culling_listing_without_match() {
        let app_data = setup_test_app_data().await;
        let coordinator = HealthCoordinator::new(app_data);

        let err = coordinator
            .list_culling_records(
                &ctx_with(FarmRole::FarmManager),
                CullingRecordFilter {
                    year: Some(2020),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No Culling records found matching the provided filters.");
    }
}
