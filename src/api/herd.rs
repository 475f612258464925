use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::{parse_flag, request_context};
use crate::app_data::AppData;
use crate::coordinators::HerdCoordinator;
use crate::errors::FarmError;
use crate::stores::{CowFilter, CowGroup};
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::herd::{
    CowApiResponse, CowBreedApiResponse, CowBreedListResponse, CowBreedRequest, CowListResponse,
    CreateCowRequest, InseminatorApiResponse, InseminatorListResponse, InseminatorRequest,
    UpdateCowRequest, UpdateInseminatorRequest,
};
use crate::types::internal::context::RequestContext;

/// Breeds, cows and inseminators
pub struct HerdApi {
    app_data: Arc<AppData>,
    herd_coordinator: HerdCoordinator,
}

impl HerdApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            herd_coordinator: HerdCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn context(&self, req: &Request) -> RequestContext {
        request_context(&self.app_data, req).await
    }

    async fn update_breed(&self, req: &Request, id: i32, body: CowBreedRequest) -> Result<CowBreedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let breed = self.herd_coordinator.update_breed(&ctx, id, body).await?;
        Ok(CowBreedApiResponse::Ok(Json(breed)))
    }

    async fn update_cow(&self, req: &Request, id: i32, body: UpdateCowRequest) -> Result<CowApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let cow = self.herd_coordinator.update_cow(&ctx, id, body).await?;
        Ok(CowApiResponse::Ok(Json(cow)))
    }

    async fn update_inseminator(
        &self,
        req: &Request,
        id: i32,
        body: UpdateInseminatorRequest,
    ) -> Result<InseminatorApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let inseminator = self.herd_coordinator.update_inseminator(&ctx, id, body).await?;
        Ok(InseminatorApiResponse::Ok(Json(inseminator)))
    }

    async fn cow_group(&self, req: &Request, group: CowGroup) -> Result<Json<CowListResponse>, FarmError> {
        let ctx = self.context(req).await;
        Ok(Json(self.herd_coordinator.list_cow_group(&ctx, group).await?))
    }
}

#[derive(Tags)]
enum HerdTags {
    /// Cow breeds
    CowBreeds,
    /// The herd
    Cows,
    /// Inseminators serving the farm
    Inseminators,
}

#[OpenApi(prefix_path = "/core")]
impl HerdApi {
    /// List breeds, optionally filtered by name
    #[oai(path = "/cow-breed", method = "get", tag = "HerdTags::CowBreeds")]
    async fn list_breeds(&self, req: &Request, name: Query<Option<String>>) -> Result<Json<CowBreedListResponse>, FarmError> {
        let ctx = self.context(req).await;
        Ok(Json(self.herd_coordinator.list_breeds(&ctx, name.0).await?))
    }

    #[oai(path = "/cow-breed", method = "post", tag = "HerdTags::CowBreeds")]
    async fn create_breed(&self, req: &Request, body: Json<CowBreedRequest>) -> Result<CowBreedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let breed = self.herd_coordinator.create_breed(&ctx, body.0).await?;
        Ok(CowBreedApiResponse::Created(Json(breed)))
    }

    #[oai(path = "/cow-breed/:id", method = "get", tag = "HerdTags::CowBreeds")]
    async fn get_breed(&self, req: &Request, id: Path<i32>) -> Result<CowBreedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let breed = self.herd_coordinator.get_breed(&ctx, id.0).await?;
        Ok(CowBreedApiResponse::Ok(Json(breed)))
    }

    #[oai(path = "/cow-breed/:id", method = "put", tag = "HerdTags::CowBreeds")]
    async fn put_breed(&self, req: &Request, id: Path<i32>, body: Json<CowBreedRequest>) -> Result<CowBreedApiResponse, FarmError> {
        self.update_breed(req, id.0, body.0).await
    }

    #[oai(path = "/cow-breed/:id", method = "patch", tag = "HerdTags::CowBreeds")]
    async fn patch_breed(&self, req: &Request, id: Path<i32>, body: Json<CowBreedRequest>) -> Result<CowBreedApiResponse, FarmError> {
        self.update_breed(req, id.0, body.0).await
    }

    /// Delete a breed no cow belongs to
    #[oai(path = "/cow-breed/:id", method = "delete", tag = "HerdTags::CowBreeds")]
    async fn delete_breed(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        self.herd_coordinator.delete_breed(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    /// List cows
    ///
    /// `breed` and `name` match case-insensitive substrings. Choice filters
    /// such as `gender` must equal the label exactly. `is_bought` accepts
    /// true/T/t/1 and false/F/f/0.
    #[allow(clippy::too_many_arguments)]
    #[oai(path = "/cows", method = "get", tag = "HerdTags::Cows")]
    async fn list_cows(
        &self,
        req: &Request,
        breed: Query<Option<String>>,
        is_bought: Query<Option<String>>,
        gender: Query<Option<String>>,
        year_of_birth: Query<Option<i32>>,
        month_of_birth: Query<Option<i32>>,
        availability_status: Query<Option<String>>,
        current_pregnancy_status: Query<Option<String>>,
        category: Query<Option<String>>,
        current_production_status: Query<Option<String>>,
        name: Query<Option<String>>,
    ) -> Result<Json<CowListResponse>, FarmError> {
        let filter = CowFilter {
            breed: breed.0,
            is_bought: parse_flag("is_bought", is_bought.0)?,
            gender: gender.0,
            year_of_birth: year_of_birth.0,
            month_of_birth: month_of_birth.0,
            availability_status: availability_status.0,
            current_pregnancy_status: current_pregnancy_status.0,
            category: category.0,
            current_production_status: current_production_status.0,
            name: name.0,
        };
        let ctx = self.context(req).await;
        Ok(Json(self.herd_coordinator.list_cows(&ctx, filter).await?))
    }

    #[oai(path = "/cows", method = "post", tag = "HerdTags::Cows")]
    async fn create_cow(&self, req: &Request, body: Json<CreateCowRequest>) -> Result<CowApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let cow = self.herd_coordinator.create_cow(&ctx, body.0).await?;
        Ok(CowApiResponse::Created(Json(cow)))
    }

    /// Cows that are alive
    #[oai(path = "/cows/available", method = "get", tag = "HerdTags::Cows")]
    async fn available_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Available).await
    }

    #[oai(path = "/cows/pregnant", method = "get", tag = "HerdTags::Cows")]
    async fn pregnant_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Pregnant).await
    }

    /// Living bulls
    #[oai(path = "/cows/male", method = "get", tag = "HerdTags::Cows")]
    async fn male_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Male).await
    }

    #[oai(path = "/cows/female", method = "get", tag = "HerdTags::Cows")]
    async fn female_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Female).await
    }

    #[oai(path = "/cows/sold", method = "get", tag = "HerdTags::Cows")]
    async fn sold_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Sold).await
    }

    #[oai(path = "/cows/dead", method = "get", tag = "HerdTags::Cows")]
    async fn dead_cows(&self, req: &Request) -> Result<Json<CowListResponse>, FarmError> {
        self.cow_group(req, CowGroup::Dead).await
    }

    #[oai(path = "/cows/:id", method = "get", tag = "HerdTags::Cows")]
    async fn get_cow(&self, req: &Request, id: Path<i32>) -> Result<CowApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let cow = self.herd_coordinator.get_cow(&ctx, id.0).await?;
        Ok(CowApiResponse::Ok(Json(cow)))
    }

    /// Calves whose dam is this cow
    #[oai(path = "/cows/:id/calves", method = "get", tag = "HerdTags::Cows")]
    async fn calves(&self, req: &Request, id: Path<i32>) -> Result<Json<CowListResponse>, FarmError> {
        let ctx = self.context(req).await;
        Ok(Json(self.herd_coordinator.list_calves(&ctx, id.0).await?))
    }

    #[oai(path = "/cows/:id", method = "put", tag = "HerdTags::Cows")]
    async fn put_cow(&self, req: &Request, id: Path<i32>, body: Json<UpdateCowRequest>) -> Result<CowApiResponse, FarmError> {
        self.update_cow(req, id.0, body.0).await
    }

    #[oai(path = "/cows/:id", method = "patch", tag = "HerdTags::Cows")]
    async fn patch_cow(&self, req: &Request, id: Path<i32>, body: Json<UpdateCowRequest>) -> Result<CowApiResponse, FarmError> {
        self.update_cow(req, id.0, body.0).await
    }

    #[oai(path = "/cows/:id", method = "delete", tag = "HerdTags::Cows")]
    async fn delete_cow(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        self.herd_coordinator.delete_cow(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    #[oai(path = "/inseminators", method = "get", tag = "HerdTags::Inseminators")]
    async fn list_inseminators(&self, req: &Request) -> Result<Json<InseminatorListResponse>, FarmError> {
        let ctx = self.context(req).await;
        Ok(Json(self.herd_coordinator.list_inseminators(&ctx).await?))
    }

    #[oai(path = "/inseminators", method = "post", tag = "HerdTags::Inseminators")]
    async fn create_inseminator(
        &self,
        req: &Request,
        body: Json<InseminatorRequest>,
    ) -> Result<InseminatorApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let inseminator = self.herd_coordinator.create_inseminator(&ctx, body.0).await?;
        Ok(InseminatorApiResponse::Created(Json(inseminator)))
    }

    #[oai(path = "/inseminators/:id", method = "get", tag = "HerdTags::Inseminators")]
    async fn get_inseminator(&self, req: &Request, id: Path<i32>) -> Result<InseminatorApiResponse, FarmError> {
        let ctx = self.context(req).await;
        let inseminator = self.herd_coordinator.get_inseminator(&ctx, id.0).await?;
        Ok(InseminatorApiResponse::Ok(Json(inseminator)))
    }

    #[oai(path = "/inseminators/:id", method = "put", tag = "HerdTags::Inseminators")]
    async fn put_inseminator(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateInseminatorRequest>,
    ) -> Result<InseminatorApiResponse, FarmError> {
        self.update_inseminator(req, id.0, body.0).await
    }

    #[oai(path = "/inseminators/:id", method = "patch", tag = "HerdTags::Inseminators")]
    async fn patch_inseminator(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateInseminatorRequest>,
    ) -> Result<InseminatorApiResponse, FarmError> {
        self.update_inseminator(req, id.0, body.0).await
    }

    #[oai(path = "/inseminators/:id", method = "delete", tag = "HerdTags::Inseminators")]
    async fn delete_inseminator(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, FarmError> {
        let ctx = self.context(req).await;
        self.herd_coordinator.delete_inseminator(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
