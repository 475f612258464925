use std::sync::Arc;

use chrono::NaiveDate;
use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::request_context;
use crate::app_data::AppData;
use crate::coordinators::ProductionCoordinator;
use crate::errors::FarmError;
use crate::stores::{LactationFilter, MilkFilter};
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::production::{
    CreateLactationRequest, CreateMilkRequest, LactationApiResponse, LactationListResponse,
    MilkApiResponse, MilkListResponse, UpdateMilkRequest,
};

/// Lactations and milk yields
pub struct ProductionApi {
    app_data: Arc<AppData>,
    production_coordinator: ProductionCoordinator,
}

impl ProductionApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            production_coordinator: ProductionCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn update_milk(&self, req: &Request, id: i32, body: UpdateMilkRequest) -> Result<MilkApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let milk = self.production_coordinator.update_milk(&ctx, id, body).await?;
        Ok(MilkApiResponse::Ok(Json(milk)))
    }
}

#[derive(Tags)]
enum ProductionTags {
    /// Lactation periods
    Lactations,
    /// Milk yields
    Milk,
}

#[OpenApi(prefix_path = "/production")]
impl ProductionApi {
    #[oai(path = "/lactation-records", method = "get", tag = "ProductionTags::Lactations")]
    async fn list_lactations(
        &self,
        req: &Request,
        start_date: Query<Option<NaiveDate>>,
        year: Query<Option<i32>>,
        month: Query<Option<i32>>,
        lactation_number: Query<Option<i16>>,
    ) -> Result<Json<LactationListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = LactationFilter {
            start_date: start_date.0,
            year: year.0,
            month: month.0,
            lactation_number: lactation_number.0,
        };
        Ok(Json(self.production_coordinator.list_lactations(&ctx, filter).await?))
    }

    /// Record a lactation for a cow bought in milk
    #[oai(path = "/lactation-records", method = "post", tag = "ProductionTags::Lactations")]
    async fn create_lactation(
        &self,
        req: &Request,
        body: Json<CreateLactationRequest>,
    ) -> Result<LactationApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let lactation = self.production_coordinator.create_lactation(&ctx, body.0).await?;
        Ok(LactationApiResponse::Created(Json(lactation)))
    }

    #[oai(path = "/lactation-records/:id", method = "get", tag = "ProductionTags::Lactations")]
    async fn get_lactation(&self, req: &Request, id: Path<i32>) -> Result<LactationApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let lactation = self.production_coordinator.get_lactation(&ctx, id.0).await?;
        Ok(LactationApiResponse::Ok(Json(lactation)))
    }

    /// Lactations cannot be edited
    #[oai(path = "/lactation-records/:id", method = "put", tag = "ProductionTags::Lactations")]
    async fn put_lactation(&self, _id: Path<i32>) -> Result<LactationApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PUT"))
    }

    /// Lactations cannot be edited
    #[oai(path = "/lactation-records/:id", method = "patch", tag = "ProductionTags::Lactations")]
    async fn patch_lactation(&self, _id: Path<i32>) -> Result<LactationApiResponse, FarmError> {
        Err(FarmError::method_not_allowed("PATCH"))
    }

    /// Delete a lactation not tied to a pregnancy
    #[oai(path = "/lactation-records/:id", method = "delete", tag = "ProductionTags::Lactations")]
    async fn delete_lactation(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        self.production_coordinator.delete_lactation(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    #[oai(path = "/milk-records", method = "get", tag = "ProductionTags::Milk")]
    async fn list_milk(
        &self,
        req: &Request,
        cow: Query<Option<i32>>,
        year: Query<Option<i32>>,
        month: Query<Option<i32>>,
        day: Query<Option<i32>>,
    ) -> Result<Json<MilkListResponse>, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let filter = MilkFilter {
            cow_id: cow.0,
            year: year.0,
            month: month.0,
            day: day.0,
        };
        Ok(Json(self.production_coordinator.list_milk(&ctx, filter).await?))
    }

    /// Record a milking; it joins the cow's latest lactation
    #[oai(path = "/milk-records", method = "post", tag = "ProductionTags::Milk")]
    async fn create_milk(&self, req: &Request, body: Json<CreateMilkRequest>) -> Result<MilkApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let milk = self.production_coordinator.create_milk(&ctx, body.0).await?;
        Ok(MilkApiResponse::Created(Json(milk)))
    }

    #[oai(path = "/milk-records/:id", method = "get", tag = "ProductionTags::Milk")]
    async fn get_milk(&self, req: &Request, id: Path<i32>) -> Result<MilkApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        let milk = self.production_coordinator.get_milk(&ctx, id.0).await?;
        Ok(MilkApiResponse::Ok(Json(milk)))
    }

    #[oai(path = "/milk-records/:id", method = "put", tag = "ProductionTags::Milk")]
    async fn put_milk(&self, req: &Request, id: Path<i32>, body: Json<UpdateMilkRequest>) -> Result<MilkApiResponse, FarmError> {
        self.update_milk(req, id.0, body.0).await
    }

    #[oai(path = "/milk-records/:id", method = "patch", tag = "ProductionTags::Milk")]
    async fn patch_milk(&self, req: &Request, id: Path<i32>, body: Json<UpdateMilkRequest>) -> Result<MilkApiResponse, FarmError> {
        self.update_milk(req, id.0, body.0).await
    }

    #[oai(path = "/milk-records/:id", method = "delete", tag = "ProductionTags::Milk")]
    async fn delete_milk(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = request_context(&self.app_data, req).await;
        self.production_coordinator.delete_milk(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
