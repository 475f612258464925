use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::auth::RoleFlags;

/// Fields needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub sex: String,
    pub password_hash: String,
    pub roles: RoleFlags,
}

/// Unique user attributes checked before insert or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueUserField {
    Username,
    Email,
    PhoneNumber,
}

pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            phone_number: Set(new_user.phone_number),
            sex: Set(new_user.sex),
            password_hash: Set(new_user.password_hash),
            is_farm_owner: Set(new_user.roles.is_farm_owner),
            is_farm_manager: Set(new_user.roles.is_farm_manager),
            is_assistant_farm_manager: Set(new_user.roles.is_assistant_farm_manager),
            is_team_leader: Set(new_user.roles.is_team_leader),
            is_farm_worker: Set(new_user.roles.is_farm_worker),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_user", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// True when another user already holds `value` for `field`
    ///
    /// `exclude_id` skips the user being updated.
    pub async fn value_in_use(
        &self,
        conn: &impl ConnectionTrait,
        field: UniqueUserField,
        value: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let column = match field {
            UniqueUserField::Username => user::Column::Username,
            UniqueUserField::Email => user::Column::Email,
            UniqueUserField::PhoneNumber => user::Column::PhoneNumber,
        };

        let mut query = User::find().filter(column.eq(value));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }

        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_unique_user_field", e))?;
        Ok(existing.is_some())
    }

    /// All users except `exclude_id`, oldest first
    pub async fn list_excluding(
        &self,
        conn: &impl ConnectionTrait,
        exclude_id: i32,
    ) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Id.ne(exclude_id))
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Persist every field of `model` and bump `updated_at`
    pub async fn update(&self, conn: &impl ConnectionTrait, model: user::Model) -> Result<user::Model, InternalError> {
        let mut active: ActiveModel = model.into();
        active = active.reset_all();
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    pub async fn set_roles(
        &self,
        conn: &impl ConnectionTrait,
        model: user::Model,
        roles: RoleFlags,
    ) -> Result<user::Model, InternalError> {
        let mut active: ActiveModel = model.into();
        active.is_farm_owner = Set(roles.is_farm_owner);
        active.is_farm_manager = Set(roles.is_farm_manager);
        active.is_assistant_farm_manager = Set(roles.is_assistant_farm_manager);
        active.is_team_leader = Set(roles.is_team_leader);
        active.is_farm_worker = Set(roles.is_farm_worker);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_roles", e))
    }

    /// Returns false when no row matched
    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = User::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
