use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::request_context;
use crate::app_data::AppData;
use crate::coordinators::ReproductionCoordinator;
use crate::errors::FarmError;
use crate::stores::{HeatFilter, PregnancyFilter};
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::reproduction::{
    CreateHeatRequest, CreatePregnancyRequest, HeatApiResponse, HeatListResponse,
    PregnancyApiResponse, PregnancyListResponse, UpdatePregnancyRequest,
};

/// Pregnancies and heat observations
pub struct ReproductionApi {
    app_data: Arc<AppData>,
    reproduction_coordinator: ReproductionCoordinator,
}

impl ReproductionApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            reproduction_coordinator: ReproductionCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn update_pregnancy(
        &self,
        req: &Request,
        id: i32,
        body: UpdatePregnancyRequest,
    ) -> Result<PregnancyApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let pregnancy = self.reproduction_coordinator.update_pregnancy(&ctx, id, body).await?;
        Ok(PregnancyApiResponse::Ok(Json(pregnancy)))
    }
}

#[derive(Tags)]
enum ReproductionTags {
    /// Pregnancies and calvings
    Pregnancies,
    /// Heat observations
    Heats,
}

#[OpenApi(prefix_path = "/reproduction")]
impl ReproductionApi {
    /// List pregnancies
    ///
    /// `cow` matches part of the cow's name.
    #[oai(path = "/pregnancy-records", method = "get", tag = "ReproductionTags::Pregnancies")]
    async fn list_pregnancies(
        &self,
        req: &Request,
        cow: Query<Option<String>>,
        year: Query<Option<i32>>,
        month: Query<Option<i32>>,
        pregnancy_outcome: Query<Option<String>>,
        pregnancy_status: Query<Option<String>>,
    ) -> Result<Json<PregnancyListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = PregnancyFilter {
            cow: cow.0,
            year: year.0,
            month: month.0,
            pregnancy_outcome: pregnancy_outcome.0,
            pregnancy_status: pregnancy_status.0,
        };
        Ok(Json(self.reproduction_coordinator.list_pregnancies(&ctx, filter).await?))
    }

    #[oai(path = "/pregnancy-records", method = "post", tag = "ReproductionTags::Pregnancies")]
    async fn create_pregnancy(
        &self,
        req: &Request,
        body: Json<CreatePregnancyRequest>,
    ) -> Result<PregnancyApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let pregnancy = self.reproduction_coordinator.create_pregnancy(&ctx, body.0).await?;
        Ok(PregnancyApiResponse::Created(Json(pregnancy)))
    }

    #[oai(path = "/pregnancy-records/:id", method = "get", tag = "ReproductionTags::Pregnancies")]
    async fn get_pregnancy(&self, req: &Request, id: Path<i32>) -> Result<PregnancyApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let pregnancy = self.reproduction_coordinator.get_pregnancy(&ctx, id.0).await?;
        Ok(PregnancyApiResponse::Ok(Json(pregnancy)))
    }

    /// Update a pregnancy; recording the calving date starts a new lactation
    #[oai(path = "/pregnancy-records/:id", method = "put", tag = "ReproductionTags::Pregnancies")]
    async fn put_pregnancy(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdatePregnancyRequest>,
    ) -> Result<PregnancyApiResponse, FarmError> {
        self.update_pregnancy(req, id.0, body.0).await
    }

    #[oai(path = "/pregnancy-records/:id", method = "patch", tag = "ReproductionTags::Pregnancies")]
    async fn patch_pregnancy(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdatePregnancyRequest>,
    ) -> Result<PregnancyApiResponse, FarmError> {
        self.update_pregnancy(req, id.0, body.0).await
    }

    #[oai(path = "/pregnancy-records/:id", method = "delete", tag = "ReproductionTags::Pregnancies")]
    async fn delete_pregnancy(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        self.reproduction_coordinator.delete_pregnancy(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    #[oai(path = "/heat-records", method = "get", tag = "ReproductionTags::Heats")]
    async fn list_heats(
        &self,
        req: &Request,
        cow: Query<Option<i32>>,
        year: Query<Option<i32>>,
        month: Query<Option<i32>>,
    ) -> Result<Json<HeatListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = HeatFilter {
            cow_id: cow.0,
            year: year.0,
            month: month.0,
        };
        Ok(Json(self.reproduction_coordinator.list_heats(&ctx, filter).await?))
    }

    /// Record a heat observation; the time defaults to now
    #[oai(path = "/heat-records", method = "post", tag = "ReproductionTags::Heats")]
    async fn create_heat(&self, req: &Request, body: Json<CreateHeatRequest>) -> Result<HeatApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let heat = self.reproduction_coordinator.create_heat(&ctx, body.0).await?;
        Ok(HeatApiResponse::Created(Json(heat)))
    }

    #[oai(path = "/heat-records/:id", method = "get", tag = "ReproductionTags::Heats")]
    async fn get_heat(&self, req: &Request, id: Path<i32>) -> Result<HeatApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let heat = self.reproduction_coordinator.get_heat(&ctx, id.0).await?;
        Ok(HeatApiResponse::Ok(Json(heat)))
    }

    /// Heat observations are permanent
    #[oai(path = "/heat-records/:id", method = "put", tag = "ReproductionTags::Heats")]
    async fn put_heat(&self, _id: Path<i32>) -> Result<HeatApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PUT"))
    }

    /// Heat observations are permanent
    #[oai(path = "/heat-records/:id", method = "patch", tag = "ReproductionTags::Heats")]
    async fn patch_heat(&self, _id: Path<i32>) -> Result<HeatApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PATCH"))
    }

    /// Heat observations are permanent
    #[oai(path = "/heat-records/:id", method = "delete", tag = "ReproductionTags::Heats")]
    async fn delete_heat(&self, _id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("DELETE"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_heat_records_are_permanent() {
        let app_data = setup_test_app_data().await;
        let api = ReproductionApi::new(app_data);

        let err = api.delete_heat(Path(3)).await.unwrap_err();

        assert_eq!(err.status_code(), 405);
        assert_eq!(err.message(), "Method \"DELETE\" not allowed.");
    }
}
