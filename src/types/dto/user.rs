use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::dto::common::list_response;
use crate::types::internal::auth::RoleFlags;

/// Request model for account registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// `Male` or `Female`
    pub sex: String,
    pub password: String,
}

/// Profile changes; omitted fields keep their value
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub sex: Option<String>,
}

/// A user account as returned by the API
#[derive(Object, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[oai(skip_serializing_if_is_none)]
    pub phone_number: Option<String>,
    pub sex: String,
    /// Highest role held, if any
    #[oai(skip_serializing_if_is_none)]
    pub role: Option<String>,
    pub is_farm_owner: bool,
    pub is_farm_manager: bool,
    pub is_assistant_farm_manager: bool,
    pub is_team_leader: bool,
    pub is_farm_worker: bool,
}

impl From<&user::Model> for UserResponse {
    fn from(user: &user::Model) -> Self {
        let roles = RoleFlags::from(user);
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: format!("{} {}", user.first_name, user.last_name),
            phone_number: user.phone_number.clone(),
            sex: user.sex.clone(),
            role: roles.role().map(|role| role.as_str().to_string()),
            is_farm_owner: user.is_farm_owner,
            is_farm_manager: user.is_farm_manager,
            is_assistant_farm_manager: user.is_assistant_farm_manager,
            is_team_leader: user.is_team_leader,
            is_farm_worker: user.is_farm_worker,
        }
    }
}

list_response!(
    /// Users visible to the caller
    UserListResponse,
    UserResponse
);

/// Bulk role change request
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RoleActionRequest {
    /// Target user ids; entries that are not numbers are reported as invalid
    pub user_ids: Vec<String>,
}

/// Outcome of a bulk role change
#[derive(Object, Debug, Clone, Default, PartialEq)]
pub struct RoleActionResponse {
    /// Users that were changed
    #[oai(skip_serializing_if_is_none)]
    pub message: Option<String>,

    /// Ids that do not exist
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,

    /// Entries that are not ids
    #[oai(skip_serializing_if_is_none)]
    pub invalid: Option<String>,
}

/// API response for single-user endpoints
#[derive(ApiResponse)]
pub enum UserApiResponse {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    /// Account created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
