use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::request_context;
use crate::app_data::AppData;
use crate::coordinators::HealthCoordinator;
use crate::errors::FarmError;
use crate::stores::{CullingRecordFilter, WeightRecordFilter};
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::health::{
    CreateCullingRecordRequest, CreateWeightRecordRequest, CullingRecordApiResponse,
    CullingRecordListResponse, UpdateWeightRecordRequest, WeightRecordApiResponse,
    WeightRecordListResponse,
};

/// Weighing and culling
pub struct HealthRecordsApi {
    app_data: Arc<AppData>,
    health_coordinator: HealthCoordinator,
}

impl HealthRecordsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            health_coordinator: HealthCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn update_weight_record(
        &self,
        req: &Request,
        id: i32,
        body: UpdateWeightRecordRequest,
    ) -> Result<WeightRecordApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let record = self.health_coordinator.update_weight_record(&ctx, id, body).await?;
        Ok(WeightRecordApiResponse::Ok(Json(record)))
    }
}

#[derive(Tags)]
enum HealthTags {
    /// Body weight records
    WeightRecords,
    /// Cows removed from the herd
    CullingRecords,
}

#[OpenApi(prefix_path = "/health")]
impl HealthRecordsApi {
    #[oai(path = "/weight-records", method = "get", tag = "HealthTags::WeightRecords")]
    async fn list_weight_records(
        &self,
        req: &Request,
        cow: Query<Option<i32>>,
        day_of_weighing: Query<Option<i32>>,
        month_of_weighing: Query<Option<i32>>,
        year_of_weighing: Query<Option<i32>>,
    ) -> Result<Json<WeightRecordListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = WeightRecordFilter {
            cow_id: cow.0,
            day_of_weighing: day_of_weighing.0,
            month_of_weighing: month_of_weighing.0,
            year_of_weighing: year_of_weighing.0,
        };
        Ok(Json(self.health_coordinator.list_weight_records(&ctx, filter).await?))
    }

    /// Weigh a cow; the record is dated today
    #[oai(path = "/weight-records", method = "post", tag = "HealthTags::WeightRecords")]
    async fn create_weight_record(
        &self,
        req: &Request,
        body: Json<CreateWeightRecordRequest>,
    ) -> Result<WeightRecordApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let record = self.health_coordinator.create_weight_record(&ctx, body.0).await?;
        Ok(WeightRecordApiResponse::Created(Json(record)))
    }

    #[oai(path = "/weight-records/:id", method = "get", tag = "HealthTags::WeightRecords")]
    async fn get_weight_record(&self, req: &Request, id: Path<i32>) -> Result<WeightRecordApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let record = self.health_coordinator.get_weight_record(&ctx, id.0).await?;
        Ok(WeightRecordApiResponse::Ok(Json(record)))
    }

    #[oai(path = "/weight-records/:id", method = "put", tag = "HealthTags::WeightRecords")]
    async fn put_weight_record(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateWeightRecordRequest>,
    ) -> Result<WeightRecordApiResponse, FarmError> {
        self.update_weight_record(req, id.0, body.0).await
    }

    #[oai(path = "/weight-records/:id", method = "patch", tag = "HealthTags::WeightRecords")]
    async fn patch_weight_record(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateWeightRecordRequest>,
    ) -> Result<WeightRecordApiResponse, FarmError> {
        self.update_weight_record(req, id.0, body.0).await
    }

    #[oai(path = "/weight-records/:id", method = "delete", tag = "HealthTags::WeightRecords")]
    async fn delete_weight_record(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        self.health_coordinator.delete_weight_record(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    #[oai(path = "/culling-records", method = "get", tag = "HealthTags::CullingRecords")]
    async fn list_culling_records(
        &self,
        req: &Request,
        reason: Query<Option<String>>,
        year: Query<Option<i32>>,
        month: Query<Option<i32>>,
    ) -> Result<Json<CullingRecordListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = CullingRecordFilter {
            reason: reason.0,
            year: year.0,
            month: month.0,
        };
        Ok(Json(self.health_coordinator.list_culling_records(&ctx, filter).await?))
    }

    /// Cull a cow; it is marked Culled and Unavailable
    #[oai(path = "/culling-records", method = "post", tag = "HealthTags::CullingRecords")]
    async fn create_culling_record(
        &self,
        req: &Request,
        body: Json<CreateCullingRecordRequest>,
    ) -> Result<CullingRecordApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let record = self.health_coordinator.create_culling_record(&ctx, body.0).await?;
        Ok(CullingRecordApiResponse::Created(Json(record)))
    }

    #[oai(path = "/culling-records/:id", method = "get", tag = "HealthTags::CullingRecords")]
    async fn get_culling_record(&self, req: &Request, id: Path<i32>) -> Result<CullingRecordApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let record = self.health_coordinator.get_culling_record(&ctx, id.0).await?;
        Ok(CullingRecordApiResponse::Ok(Json(record)))
    }

    /// Culling records cannot be edited
    #[oai(path = "/culling-records/:id", method = "put", tag = "HealthTags::CullingRecords")]
    async fn put_culling_record(&self, _id: Path<i32>) -> Result<CullingRecordApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PUT"))
    }

    /// Culling records cannot be edited
    #[oai(path = "/culling-records/:id", method = "patch", tag = "HealthTags::CullingRecords")]
    async fn patch_culling_record(&self, _id: Path<i32>) -> Result<CullingRecordApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PATCH"))
    }

    #[oai(path = "/culling-records/:id", method = "delete", tag = "HealthTags::CullingRecords")]
    async fn delete_culling_record(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        self.health_coordinator.delete_culling_record(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
