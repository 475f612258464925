use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::DatabaseConnections;
use crate::coordinators::{EmptyListing, finish_listing};
use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::providers::field_rules::parse_choice;
use crate::providers::production_validator_provider::LactationFields;
use crate::providers::reproduction_validator_provider::{HeatHistory, PregnancyFields};
use crate::providers::{
    ALL_STAFF, MANAGEMENT, Permission, PermissionProvider, ProductionValidatorProvider,
    ReproductionValidatorProvider,
};
use crate::stores::{
    CowStore, HeatFilter, HeatStore, LactationStore, NewLactation, NewPregnancy, PregnancyFilter,
    PregnancyStore,
};
use crate::types::db::{cow, pregnancy};
use crate::types::dto::reproduction::{
    CreateHeatRequest, CreatePregnancyRequest, HeatListResponse, HeatResponse, PregnancyListResponse,
    PregnancyResponse, UpdatePregnancyRequest,
};
use crate::types::internal::choices::{CowPregnancyStatus, PregnancyOutcome, PregnancyStatus};
use crate::types::internal::context::RequestContext;

/// Every role may read pregnancy and heat records
const READERS: &[Permission] = &[
    Permission::FarmWorker,
    Permission::TeamLeader,
    Permission::AssistantFarmManager,
    Permission::FarmManager,
    Permission::FarmOwner,
];

const PREGNANCY_LISTING: EmptyListing = EmptyListing {
    no_matches: "No Pregnancy record(s) found matching the provided filters.",
    nothing_yet: "No Pregnancy records found.",
};

const HEAT_LISTING: EmptyListing = EmptyListing {
    no_matches: "No heat records found matching the provided filters.",
    nothing_yet: "No heat records found in the farm yet.",
};

/// Pregnancies, calvings and heat observations
pub struct ReproductionCoordinator {
    connections: DatabaseConnections,
    db: DatabaseConnection,
    cow_store: Arc<CowStore>,
    pregnancy_store: Arc<PregnancyStore>,
    lactation_store: Arc<LactationStore>,
    heat_store: Arc<HeatStore>,
    permission_provider: Arc<PermissionProvider>,
    production_validator: Arc<ProductionValidatorProvider>,
    reproduction_validator: Arc<ReproductionValidatorProvider>,
}

impl ReproductionCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            connections: app_data.connections.clone(),
            db: app_data.db.clone(),
            cow_store: app_data.cow_store.clone(),
            pregnancy_store: app_data.pregnancy_store.clone(),
            lactation_store: app_data.lactation_store.clone(),
            heat_store: app_data.heat_store.clone(),
            permission_provider: app_data.permission_provider.clone(),
            production_validator: app_data.production_validator.clone(),
            reproduction_validator: app_data.reproduction_validator.clone(),
        }
    }

    pub async fn list_pregnancies(
        &self,
        ctx: &RequestContext,
        filter: PregnancyFilter,
    ) -> Result<PregnancyListResponse, InternalError> {
        self.permission_provider.require_any(ctx, READERS)?;
        let today = Utc::now().date_naive();
        let pregnancies = self.pregnancy_store.list(&self.db, &filter).await?;
        let results = pregnancies
            .into_iter()
            .map(|pregnancy| PregnancyResponse::new(pregnancy, today))
            .collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), PREGNANCY_LISTING)?;
        Ok(PregnancyListResponse::new(results, detail))
    }

    pub async fn get_pregnancy(&self, ctx: &RequestContext, id: i32) -> Result<PregnancyResponse, InternalError> {
        self.permission_provider.require_any(ctx, READERS)?;
        let pregnancy = self.find_pregnancy(id).await?;
        Ok(PregnancyResponse::new(pregnancy, Utc::now().date_naive()))
    }

    pub async fn create_pregnancy(
        &self,
        ctx: &RequestContext,
        request: CreatePregnancyRequest,
    ) -> Result<PregnancyResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();

        let fields = PregnancyFields {
            start_date: request.start_date,
            date_of_calving: request.date_of_calving,
            pregnancy_status: parse_status(request.pregnancy_status.as_deref())?,
            pregnancy_scan_date: request.pregnancy_scan_date,
            pregnancy_failed_date: request.pregnancy_failed_date,
            pregnancy_outcome: parse_outcome(request.pregnancy_outcome.as_deref())?,
        };
        let cow = self.find_cow(request.cow_id).await?;
        self.reproduction_validator
            .validate_pregnancy(&cow, &fields, true, today)?;

        let txn = self.connections.begin_transaction().await?;
        let pregnancy = self
            .pregnancy_store
            .insert(
                &txn,
                NewPregnancy {
                    cow_id: cow.id,
                    start_date: fields.start_date,
                    date_of_calving: fields.date_of_calving,
                    pregnancy_status: fields.pregnancy_status.to_string(),
                    pregnancy_notes: request.pregnancy_notes,
                    calving_notes: request.calving_notes,
                    pregnancy_scan_date: fields.pregnancy_scan_date,
                    pregnancy_failed_date: fields.pregnancy_failed_date,
                    pregnancy_outcome: fields.pregnancy_outcome.map(|o| o.to_string()),
                },
            )
            .await?;
        if let Some(calving) = pregnancy.date_of_calving {
            self.record_calving(&txn, cow, &pregnancy, calving, today).await?;
        }
        DatabaseConnections::commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            cow_id = pregnancy.cow_id,
            pregnancy_id = pregnancy.id,
            "Pregnancy recorded"
        );
        Ok(PregnancyResponse::new(pregnancy, today))
    }

    /// Apply changes to a pregnancy; omitted fields keep their value
    ///
    /// Recording a calving date for the first time starts the next lactation.
    pub async fn update_pregnancy(
        &self,
        ctx: &RequestContext,
        id: i32,
        request: UpdatePregnancyRequest,
    ) -> Result<PregnancyResponse, InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        let today = Utc::now().date_naive();

        let existing = self.find_pregnancy(id).await?;
        let had_calving = existing.date_of_calving.is_some();
        let mut pregnancy = existing;

        if let Some(start_date) = request.start_date {
            pregnancy.start_date = start_date;
        }
        if request.date_of_calving.is_some() {
            pregnancy.date_of_calving = request.date_of_calving;
        }
        if let Some(status) = request.pregnancy_status {
            pregnancy.pregnancy_status = status;
        }
        if request.pregnancy_notes.is_some() {
            pregnancy.pregnancy_notes = request.pregnancy_notes;
        }
        if request.calving_notes.is_some() {
            pregnancy.calving_notes = request.calving_notes;
        }
        if request.pregnancy_scan_date.is_some() {
            pregnancy.pregnancy_scan_date = request.pregnancy_scan_date;
        }
        if request.pregnancy_failed_date.is_some() {
            pregnancy.pregnancy_failed_date = request.pregnancy_failed_date;
        }
        if request.pregnancy_outcome.is_some() {
            pregnancy.pregnancy_outcome = request.pregnancy_outcome;
        }

        let fields = PregnancyFields {
            start_date: pregnancy.start_date,
            date_of_calving: pregnancy.date_of_calving,
            pregnancy_status: parse_status(Some(&pregnancy.pregnancy_status))?,
            pregnancy_scan_date: pregnancy.pregnancy_scan_date,
            pregnancy_failed_date: pregnancy.pregnancy_failed_date,
            pregnancy_outcome: parse_outcome(pregnancy.pregnancy_outcome.as_deref())?,
        };
        let cow = self.find_cow(pregnancy.cow_id).await?;
        self.reproduction_validator
            .validate_pregnancy(&cow, &fields, false, today)?;

        let txn = self.connections.begin_transaction().await?;
        let pregnancy = self.pregnancy_store.update(&txn, pregnancy).await?;
        if let (false, Some(calving)) = (had_calving, pregnancy.date_of_calving) {
            self.record_calving(&txn, cow, &pregnancy, calving, today).await?;
        }
        DatabaseConnections::commit_transaction(txn).await?;

        Ok(PregnancyResponse::new(pregnancy, today))
    }

    pub async fn delete_pregnancy(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, MANAGEMENT)?;
        if !self.pregnancy_store.delete(&self.db, id).await? {
            return Err(InternalError::not_found("Pregnancy", id));
        }
        Ok(())
    }

    /// Mark the cow Calved and roll its lactations over to the new calving
    ///
    /// The latest lactation ends the day before calving when still open. The
    /// new lactation goes through the same checks as a manual entry, so a
    /// rejected lactation rolls back the whole pregnancy save.
    async fn record_calving(
        &self,
        conn: &impl ConnectionTrait,
        cow: cow::Model,
        pregnancy: &pregnancy::Model,
        calving: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), InternalError> {
        let (cow, breed) = self
            .cow_store
            .find_with_breed(conn, cow.id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", cow.id))?;
        let previous = self.lactation_store.latest_for_cow(conn, cow.id).await?;

        let lactation_number = match &previous {
            Some(previous) => previous.lactation_number.checked_add(1).ok_or_else(|| {
                ValidationError::new("invalid_lactation_number", "Invalid lactation number.")
            })?,
            None => 1,
        };
        let fields = LactationFields {
            start_date: calving,
            actual_end_date: None,
            lactation_number,
            pregnancy_id: Some(pregnancy.id),
        };
        self.production_validator
            .validate_lactation(&cow, &breed.name, &fields, today)?;

        let cow = self
            .cow_store
            .set_statuses(conn, cow, Some(CowPregnancyStatus::Calved), None)
            .await?;
        if let Some(previous) = previous.filter(|p| p.actual_end_date.is_none()) {
            self.lactation_store
                .set_end_date(conn, previous, calving - Duration::days(1))
                .await?;
        }

        self.lactation_store
            .insert(
                conn,
                NewLactation {
                    cow_id: cow.id,
                    start_date: fields.start_date,
                    lactation_number,
                    pregnancy_id: fields.pregnancy_id,
                    actual_end_date: None,
                },
            )
            .await?;

        tracing::info!(cow_id = cow.id, pregnancy_id = pregnancy.id, "Calving on {}, lactation {} started", calving, lactation_number);
        Ok(())
    }

    async fn find_pregnancy(&self, id: i32) -> Result<pregnancy::Model, InternalError> {
        self.pregnancy_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Pregnancy", id))
    }

    pub async fn list_heats(&self, ctx: &RequestContext, filter: HeatFilter) -> Result<HeatListResponse, InternalError> {
        self.permission_provider.require_any(ctx, READERS)?;
        let heats = self.heat_store.list(&self.db, &filter).await?;
        let results = heats.into_iter().map(HeatResponse::from).collect();
        let (results, detail) = finish_listing(results, !filter.is_empty(), HEAT_LISTING)?;
        Ok(HeatListResponse::new(results, detail))
    }

    pub async fn get_heat(&self, ctx: &RequestContext, id: i32) -> Result<HeatResponse, InternalError> {
        self.permission_provider.require_any(ctx, READERS)?;
        self.heat_store
            .find_by_id(&self.db, id)
            .await?
            .map(HeatResponse::from)
            .ok_or_else(|| InternalError::not_found("Heat", id))
    }

    /// Record a heat observation, defaulting to now
    pub async fn create_heat(&self, ctx: &RequestContext, request: CreateHeatRequest) -> Result<HeatResponse, InternalError> {
        self.permission_provider.require_any(ctx, ALL_STAFF)?;
        let now = Utc::now().naive_utc();
        let observed = request.observation_time.unwrap_or(now);

        let cow = self.find_cow(request.cow_id).await?;
        let history = HeatHistory {
            heat_in_past_day: self
                .heat_store
                .exists_between(&self.db, cow.id, observed - Duration::days(1), observed)
                .await?,
            heat_in_previous_21_days: self
                .heat_store
                .exists_between(&self.db, cow.id, observed - Duration::days(21), observed)
                .await?,
            latest_calving: self
                .pregnancy_store
                .latest_calving(&self.db, cow.id)
                .await?
                .and_then(|pregnancy| pregnancy.date_of_calving),
        };
        self.reproduction_validator
            .validate_heat(&cow, observed, &history, now)?;

        let heat = self.heat_store.insert(&self.db, cow.id, observed).await?;
        tracing::debug!(request_id = %ctx.request_id, cow_id = cow.id, "Heat observed");
        Ok(heat.into())
    }

    async fn find_cow(&self, id: i32) -> Result<cow::Model, InternalError> {
        self.cow_store
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Cow", id))
    }
}

fn parse_status(value: Option<&str>) -> Result<PregnancyStatus, InternalError> {
    match value {
        Some(label) => Ok(parse_choice("pregnancy_status", label)?),
        None => Ok(PregnancyStatus::Unconfirmed),
    }
}

fn parse_outcome(value: Option<&str>) -> Result<Option<PregnancyOutcome>, InternalError> {
    value
        .map(|label| parse_choice("pregnancy_outcome", label))
        .transpose()
        .map_err(InternalError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::PermissionError;
    use crate::stores::LactationFilter;
    use crate::test::utils::{claims_for, date, insert_cow, setup_test_app_data};
    use crate::types::internal::auth::{FarmRole, RoleFlags};

    fn ctx_with(role: FarmRole) -> RequestContext {
        let mut roles = RoleFlags::default();
        roles.assign(role);
        RequestContext::anonymous().with_auth(claims_for(1, roles))
    }

    fn days_ago(days: i64) -> NaiveDate {
        Utc::now().date_naive() - Duration::days(days)
    }

    fn pregnancy_request(cow_id: i32, start: NaiveDate) -> CreatePregnancyRequest {
        CreatePregnancyRequest {
            cow_id,
            start_date: start,
            date_of_calving: None,
            pregnancy_status: None,
            pregnancy_notes: None,
            calving_notes: None,
            pregnancy_scan_date: None,
            pregnancy_failed_date: None,
            pregnancy_outcome: None,
        }
    }

    #[tokio::test]
    async fn test_new_pregnancy_defaults_to_unconfirmed() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data);

        let pregnancy = coordinator
            .create_pregnancy(&ctx_with(FarmRole::FarmManager), pregnancy_request(cow.id, days_ago(10)))
            .await
            .unwrap();

        assert_eq!(pregnancy.pregnancy_status, "Unconfirmed");
        assert_eq!(pregnancy.pregnancy_duration, "10");
        assert_eq!(pregnancy.due_date, (days_ago(10) + Duration::days(285)).to_string());
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data);

        let err = coordinator
            .create_pregnancy(
                &ctx_with(FarmRole::FarmOwner),
                CreatePregnancyRequest {
                    pregnancy_status: Some("Maybe".to_string()),
                    ..pregnancy_request(cow.id, days_ago(10))
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "invalid_pregnancy_status"));
    }

    #[tokio::test]
    async fn test_first_calving_starts_lactation() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data.clone());
        let ctx = ctx_with(FarmRole::FarmManager);

        let pregnancy = coordinator
            .create_pregnancy(
                &ctx,
                CreatePregnancyRequest {
                    pregnancy_status: Some("Confirmed".to_string()),
                    ..pregnancy_request(cow.id, days_ago(300))
                },
            )
            .await
            .unwrap();

        let calving = days_ago(20);
        let updated = coordinator
            .update_pregnancy(
                &ctx,
                pregnancy.id,
                UpdatePregnancyRequest {
                    date_of_calving: Some(calving),
                    pregnancy_outcome: Some("Live".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.pregnancy_duration, "Ended");
        assert_eq!(updated.due_date, "Ended");

        let stored = app_data.cow_store.find_by_id(&app_data.db, cow.id).await.unwrap().unwrap();
        assert_eq!(stored.current_pregnancy_status, "Calved");

        let lactations = app_data
            .lactation_store
            .list(&app_data.db, &LactationFilter::default())
            .await
            .unwrap();
        assert_eq!(lactations.len(), 1);
        assert_eq!(lactations[0].lactation_number, 1);
        assert_eq!(lactations[0].start_date, calving);
        assert_eq!(lactations[0].pregnancy_id, Some(pregnancy.id));

        // Saving again with the calving date already set starts nothing new
        coordinator
            .update_pregnancy(
                &ctx,
                pregnancy.id,
                UpdatePregnancyRequest {
                    calving_notes: Some("Easy birth".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let lactations = app_data
            .lactation_store
            .list(&app_data.db, &LactationFilter::default())
            .await
            .unwrap();
        assert_eq!(lactations.len(), 1);
    }

    #[tokio::test]
    async fn test_calving_closes_open_lactation() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2018, 1, 1)).await;
        app_data
            .lactation_store
            .insert(
                &app_data.db,
                NewLactation {
                    cow_id: cow.id,
                    start_date: days_ago(700),
                    lactation_number: 1,
                    pregnancy_id: None,
                    actual_end_date: None,
                },
            )
            .await
            .unwrap();
        let coordinator = ReproductionCoordinator::new(app_data.clone());

        let calving = days_ago(5);
        coordinator
            .create_pregnancy(
                &ctx_with(FarmRole::FarmOwner),
                CreatePregnancyRequest {
                    date_of_calving: Some(calving),
                    pregnancy_status: Some("Confirmed".to_string()),
                    pregnancy_outcome: Some("Live".to_string()),
                    ..pregnancy_request(cow.id, calving - Duration::days(280))
                },
            )
            .await
            .unwrap();

        let lactations = app_data
            .lactation_store
            .list(&app_data.db, &LactationFilter::default())
            .await
            .unwrap();
        assert_eq!(lactations.len(), 2);
        assert_eq!(lactations[0].actual_end_date, Some(calving - Duration::days(1)));
        assert_eq!(lactations[1].lactation_number, 2);
        assert_eq!(lactations[1].start_date, calving);
    }

    #[tokio::test]
    async fn test_calving_on_bought_cow_is_rolled_back() {
        let app_data = setup_test_app_data().await;
        let today = Utc::now().date_naive();
        let mut cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", today - Duration::days(4 * 365)).await;
        cow.is_bought = true;
        let cow = app_data.cow_store.update(&app_data.db, cow).await.unwrap();
        let coordinator = ReproductionCoordinator::new(app_data.clone());

        let calving = days_ago(5);
        let err = coordinator
            .create_pregnancy(
                &ctx_with(FarmRole::FarmManager),
                CreatePregnancyRequest {
                    date_of_calving: Some(calving),
                    pregnancy_status: Some("Confirmed".to_string()),
                    pregnancy_outcome: Some("Live".to_string()),
                    ..pregnancy_request(cow.id, calving - Duration::days(280))
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Validation(v) if v.code == "pregnancy_should_be_null"));

        let pregnancies = app_data
            .pregnancy_store
            .list(&app_data.db, &PregnancyFilter::default())
            .await
            .unwrap();
        assert!(pregnancies.is_empty());
        let lactations = app_data
            .lactation_store
            .list(&app_data.db, &LactationFilter::default())
            .await
            .unwrap();
        assert!(lactations.is_empty());
        let stored = app_data.cow_store.find_by_id(&app_data.db, cow.id).await.unwrap().unwrap();
        assert_eq!(stored.current_pregnancy_status, "Open");
    }

    #[tokio::test]
    async fn test_calving_after_highest_lactation_number_is_rejected() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2018, 1, 1)).await;
        app_data
            .lactation_store
            .insert(
                &app_data.db,
                NewLactation {
                    cow_id: cow.id,
                    start_date: days_ago(400),
                    lactation_number: i16::MAX,
                    pregnancy_id: None,
                    actual_end_date: None,
                },
            )
            .await
            .unwrap();
        let coordinator = ReproductionCoordinator::new(app_data.clone());

        let calving = days_ago(5);
        let err = coordinator
            .create_pregnancy(
                &ctx_with(FarmRole::FarmOwner),
                CreatePregnancyRequest {
                    date_of_calving: Some(calving),
                    pregnancy_status: Some("Confirmed".to_string()),
                    pregnancy_outcome: Some("Live".to_string()),
                    ..pregnancy_request(cow.id, calving - Duration::days(280))
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "invalid_lactation_number"));
        let lactations = app_data
            .lactation_store
            .list(&app_data.db, &LactationFilter::default())
            .await
            .unwrap();
        assert_eq!(lactations.len(), 1);
        assert_eq!(lactations[0].actual_end_date, None);
    }

    #[tokio::test]
    async fn test_worker_reads_but_cannot_write_pregnancies() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data);
        let worker = ctx_with(FarmRole::FarmWorker);

        let listing = coordinator
            .list_pregnancies(&worker, PregnancyFilter::default())
            .await
            .unwrap();
        assert_eq!(listing.detail.as_deref(), Some("No Pregnancy records found."));

        let err = coordinator
            .create_pregnancy(&worker, pregnancy_request(cow.id, days_ago(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Permission(PermissionError::Denied(_))));
    }

    #[tokio::test]
    async fn test_heat_twice_in_a_day() {
        let app_data = setup_test_app_data().await;
        let cow = insert_cow(&app_data.db, "Daisy", "Jersey", "Female", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data);
        let ctx = ctx_with(FarmRole::FarmWorker);
        let earlier = Utc::now().naive_utc() - Duration::hours(6);

        coordinator
            .create_heat(
                &ctx,
                CreateHeatRequest {
                    cow_id: cow.id,
                    observation_time: Some(earlier),
                },
            )
            .await
            .unwrap();

        let err = coordinator
            .create_heat(
                &ctx,
                CreateHeatRequest {
                    cow_id: cow.id,
                    observation_time: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Validation(v) if v.code == "already_in_heat"));
    }

    #[tokio::test]
    async fn test_heat_rejected_for_bull() {
        let app_data = setup_test_app_data().await;
        let bull = insert_cow(&app_data.db, "Duke", "Friesian", "Male", date(2020, 1, 1)).await;
        let coordinator = ReproductionCoordinator::new(app_data);

        let err = coordinator
            .create_heat(
                &ctx_with(FarmRole::FarmManager),
                CreateHeatRequest {
                    cow_id: bull.id,
                    observation_time: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(v) if v.code == "invalid_gender"));
    }

    #[tokio::test]
    async fn test_filtered_heat_listing_without_match() {
        let app_data = setup_test_app_data().await;
        let coordinator = ReproductionCoordinator::new(app_data);

        let err = coordinator
            .list_heats(
                &ctx_with(FarmRole::TeamLeader),
                HeatFilter {
                    cow_id: Some(42),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No heat records found matching the provided filters.");
    }
}
