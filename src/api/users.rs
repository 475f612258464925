use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::request_context;
use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::coordinators::user_coordinator::RoleChange;
use crate::errors::AdminError;
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::user::{
    RoleActionRequest, RoleActionResponse, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::types::internal::auth::FarmRole;

/// User management and role assignment endpoints
pub struct UsersApi {
    app_data: Arc<AppData>,
    user_coordinator: UserCoordinator,
}

impl UsersApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_coordinator: UserCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn update(&self, req: &Request, id: i32, body: UpdateUserRequest) -> Result<Json<UserResponse>, AdminError> {
        let ctx = request_context(&self.app_data, req).await;
        let user = self.user_coordinator.update_user(&ctx, id, body).await?;
        Ok(Json(user))
    }

    async fn change_roles(
        &self,
        req: &Request,
        change: RoleChange,
        role: FarmRole,
        body: RoleActionRequest,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        let ctx = request_context(&self.app_data, req).await;
        let outcome = self
            .user_coordinator
            .change_roles(&ctx, change, role, &body.user_ids)
            .await?;
        Ok(Json(outcome))
    }
}

#[derive(Tags)]
enum UserTags {
    /// Farm staff accounts
    Users,
    /// Assigning and dismissing farm roles
    Roles,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List every user except the caller
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(&self, req: &Request) -> Result<Json<UserListResponse>, AdminError> {
        let ctx = request_context(&self.app_data, req).await;
        Ok(Json(self.user_coordinator.list_users(&ctx).await?))
    }

    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(&self, req: &Request, id: Path<i32>) -> Result<Json<UserResponse>, AdminError> {
        let ctx = request_context(&self.app_data, req).await;
        Ok(Json(self.user_coordinator.get_user(&ctx, id.0).await?))
    }

    /// Update your own profile
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn put_user(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        self.update(req, id.0, body.0).await
    }

    /// Update part of your own profile
    #[oai(path = "/:id", method = "patch", tag = "UserTags::Users")]
    async fn patch_user(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        self.update(req, id.0, body.0).await
    }

    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(&self, req: &Request, id: Path<i32>) -> Result<DeletedApiResponse, AdminError> {
        let ctx = request_context(&self.app_data, req).await;
        self.user_coordinator.delete_user(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }

    #[oai(path = "/assign_farm_owner", method = "post", tag = "UserTags::Roles")]
    async fn assign_farm_owner(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Assign, FarmRole::FarmOwner, body.0).await
    }

    #[oai(path = "/assign_farm_manager", method = "post", tag = "UserTags::Roles")]
    async fn assign_farm_manager(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Assign, FarmRole::FarmManager, body.0).await
    }

    #[oai(path = "/assign_assistant_farm_manager", method = "post", tag = "UserTags::Roles")]
    async fn assign_assistant_farm_manager(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Assign, FarmRole::AssistantFarmManager, body.0)
            .await
    }

    #[oai(path = "/assign_team_leader", method = "post", tag = "UserTags::Roles")]
    async fn assign_team_leader(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Assign, FarmRole::TeamLeader, body.0).await
    }

    #[oai(path = "/assign_farm_worker", method = "post", tag = "UserTags::Roles")]
    async fn assign_farm_worker(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Assign, FarmRole::FarmWorker, body.0).await
    }

    #[oai(path = "/dismiss_farm_manager", method = "post", tag = "UserTags::Roles")]
    async fn dismiss_farm_manager(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Dismiss, FarmRole::FarmManager, body.0).await
    }

    #[oai(path = "/dismiss_assistant_farm_manager", method = "post", tag = "UserTags::Roles")]
    async fn dismiss_assistant_farm_manager(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Dismiss, FarmRole::AssistantFarmManager, body.0)
            .await
    }

    #[oai(path = "/dismiss_team_leader", method = "post", tag = "UserTags::Roles")]
    async fn dismiss_team_leader(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Dismiss, FarmRole::TeamLeader, body.0).await
    }

    #[oai(path = "/dismiss_farm_worker", method = "post", tag = "UserTags::Roles")]
    async fn dismiss_farm_worker(
        &self,
        req: &Request,
        body: Json<RoleActionRequest>,
    ) -> Result<Json<RoleActionResponse>, AdminError> {
        self.change_roles(req, RoleChange::Dismiss, FarmRole::FarmWorker, body.0).await
    }
}
