use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::DatabaseConnections;
use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::providers::user_validator_provider::ProfileFields;
use crate::providers::{CryptoProvider, Permission, PermissionProvider, UserValidatorProvider};
use crate::stores::{NewUser, SessionStore, UniqueUserField, UserStore};
use crate::types::db::user;
use crate::types::dto::user::{
    RegisterRequest, RoleActionResponse, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::types::internal::auth::{FarmRole, RoleFlags};
use crate::types::internal::context::RequestContext;

const USER_MANAGERS: &[Permission] = &[Permission::FarmOwner, Permission::FarmManager];

/// Direction of a bulk role change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Assign,
    Dismiss,
}

impl RoleChange {
    /// Who may perform this change for `role`
    fn required_permissions(&self, role: FarmRole) -> &'static [Permission] {
        match (self, role) {
            (_, FarmRole::FarmWorker) => &[Permission::FarmManager, Permission::FarmOwner],
            (_, FarmRole::TeamLeader) => &[
                Permission::FarmManager,
                Permission::FarmOwner,
                Permission::AssistantFarmManager,
            ],
            _ => &[Permission::FarmOwner],
        }
    }

    fn self_change_message(&self) -> &'static str {
        match self {
            RoleChange::Assign => "Cannot assign roles to yourself.",
            RoleChange::Dismiss => "Cannot dismiss yourself.",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            RoleChange::Assign => "assigned",
            RoleChange::Dismiss => "dismissed",
        }
    }

    fn apply(&self, roles: &mut RoleFlags, role: FarmRole) {
        match self {
            RoleChange::Assign => roles.assign(role),
            RoleChange::Dismiss => roles.dismiss(role),
        }
    }
}

/// Account lifecycle: registration, profiles and role management
pub struct UserCoordinator {
    connections: DatabaseConnections,
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    crypto_provider: Arc<CryptoProvider>,
    permission_provider: Arc<PermissionProvider>,
    user_validator: Arc<UserValidatorProvider>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            connections: app_data.connections.clone(),
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            session_store: app_data.session_store.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            permission_provider: app_data.permission_provider.clone(),
            user_validator: app_data.user_validator.clone(),
        }
    }

    /// Create an account with no farm roles
    pub async fn register(&self, ctx: &RequestContext, request: RegisterRequest) -> Result<UserResponse, InternalError> {
        self.create_user(ctx, request, RoleFlags::default()).await
    }

    /// Create an account holding `roles`; used by registration and the CLI
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        request: RegisterRequest,
        roles: RoleFlags,
    ) -> Result<UserResponse, InternalError> {
        let sex = self.user_validator.validate_profile(&ProfileFields {
            username: &request.username,
            email: request.email.as_deref(),
            first_name: &request.first_name,
            last_name: &request.last_name,
            phone_number: request.phone_number.as_deref(),
            sex: &request.sex,
        })?;
        self.user_validator.validate_password(&request.password)?;
        self.check_unique(&request.username, request.email.as_deref(), request.phone_number.as_deref(), None)
            .await?;

        let password_hash = self.crypto_provider.hash_password(&request.password).await?;
        let user = self
            .user_store
            .insert(
                &self.db,
                NewUser {
                    username: request.username,
                    email: request.email,
                    first_name: request.first_name,
                    last_name: request.last_name,
                    phone_number: request.phone_number,
                    sex: sex.as_str().to_string(),
                    password_hash,
                    roles,
                },
            )
            .await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, user_id = user.id, "User registered");
        Ok(UserResponse::from(&user))
    }

    /// The logged-in user's own account
    pub async fn me(&self, ctx: &RequestContext) -> Result<UserResponse, InternalError> {
        self.permission_provider.require_authenticated(ctx)?;
        let user_id = ctx.user_id().ok_or_else(|| InternalError::parse("user_id", "token subject is not an id"))?;
        let user = self.find_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Every user except the caller
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<UserListResponse, InternalError> {
        let claims = self.permission_provider.require_any(ctx, USER_MANAGERS)?;
        let caller = claims.user_id().unwrap_or_default();

        let users = self.user_store.list_excluding(&self.db, caller).await?;
        Ok(UserListResponse::new(users.iter().map(UserResponse::from).collect(), None))
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: i32) -> Result<UserResponse, InternalError> {
        self.permission_provider.require_any(ctx, USER_MANAGERS)?;
        let user = self.find_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i32) -> Result<(), InternalError> {
        self.permission_provider.require_any(ctx, USER_MANAGERS)?;
        if !self.user_store.delete(&self.db, user_id).await? {
            return Err(InternalError::not_found("User", user_id));
        }
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, user_id, "User deleted");
        Ok(())
    }

    /// Change profile fields of the caller's own account. Roles are untouched.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, InternalError> {
        self.permission_provider.require_self(ctx, user_id)?;
        let mut user = self.find_user(user_id).await?;

        if let Some(username) = request.username {
            user.username = username;
        }
        if let Some(email) = request.email {
            user.email = Some(email);
        }
        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = request.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(sex) = request.sex {
            user.sex = sex;
        }

        let sex = self.user_validator.validate_profile(&ProfileFields {
            username: &user.username,
            email: user.email.as_deref(),
            first_name: &user.first_name,
            last_name: &user.last_name,
            phone_number: user.phone_number.as_deref(),
            sex: &user.sex,
        })?;
        self.check_unique(&user.username, user.email.as_deref(), user.phone_number.as_deref(), Some(user.id))
            .await?;
        user.sex = sex.as_str().to_string();

        let user = self.user_store.update(&self.db, user).await?;
        tracing::info!(request_id = %ctx.request_id, user_id, "User profile updated");
        Ok(UserResponse::from(&user))
    }

    /// Assign or dismiss `role` for every id in `user_ids`
    ///
    /// Ids that are numbers but match no user, and entries that are not ids at
    /// all, are reported back rather than failing the whole request. Each
    /// changed user's sessions are revoked so new tokens carry the new roles.
    pub async fn change_roles(
        &self,
        ctx: &RequestContext,
        change: RoleChange,
        role: FarmRole,
        user_ids: &[String],
    ) -> Result<RoleActionResponse, InternalError> {
        let claims = self
            .permission_provider
            .require_any(ctx, change.required_permissions(role))?;
        let caller = claims.user_id();

        if user_ids
            .iter()
            .any(|id| parse_user_id(id).is_some_and(|id| Some(id) == caller))
        {
            return Err(ValidationError::new("self_role_change", change.self_change_message()).into());
        }

        let mut changed = Vec::new();
        let mut not_found = Vec::new();
        let mut invalid = Vec::new();

        for raw_id in user_ids {
            let Some(user_id) = parse_user_id(raw_id) else {
                invalid.push(raw_id.clone());
                continue;
            };
            let Some(user) = self.user_store.find_by_id(&self.db, user_id).await? else {
                not_found.push(raw_id.clone());
                continue;
            };

            let mut roles = RoleFlags::from(&user);
            change.apply(&mut roles, role);
            let txn = self.connections.begin_transaction().await?;
            let user = self.user_store.set_roles(&txn, user, roles).await?;
            let revoked = self.session_store.delete_for_user(&txn, user.id).await?;
            DatabaseConnections::commit_transaction(txn).await?;

            tracing::info!(
                request_id = %ctx.request_id,
                actor = %ctx.actor_id,
                user_id = user.id,
                sessions_revoked = revoked,
                "User {} as {}",
                change.verb(),
                role.as_str()
            );
            changed.push(user.username);
        }

        Ok(role_change_summary(change, role, &changed, &not_found, &invalid))
    }

    async fn find_user(&self, user_id: i32) -> Result<user::Model, InternalError> {
        self.user_store
            .find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found("User", user_id))
    }

    async fn check_unique(
        &self,
        username: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<(), InternalError> {
        let checks = [
            (UniqueUserField::Username, Some(username), "duplicate_username", "A user with that username already exists."),
            (UniqueUserField::Email, email, "duplicate_email", "A user with that email already exists."),
            (
                UniqueUserField::PhoneNumber,
                phone_number,
                "duplicate_phone_number",
                "A user with that phone number already exists.",
            ),
        ];

        for (field, value, code, message) in checks {
            if let Some(value) = value {
                if self.user_store.value_in_use(&self.db, field, value, exclude_id).await? {
                    return Err(ValidationError::new(code, message).into());
                }
            }
        }
        Ok(())
    }
}

/// A user id given as plain decimal digits
fn parse_user_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn role_change_summary(
    change: RoleChange,
    role: FarmRole,
    changed: &[String],
    not_found: &[String],
    invalid: &[String],
) -> RoleActionResponse {
    let noun = role.noun();
    let message = match changed {
        [] => None,
        [username] => Some(format!(
            "User {} has been {} as {} {}.",
            username,
            change.verb(),
            article(&noun),
            noun
        )),
        many => Some(format!(
            "Users {} have been {} as {}s.",
            many.join(", "),
            change.verb(),
            noun
        )),
    };
    let error = match not_found {
        [] => None,
        [id] => Some(format!("User with ID {} was not found.", id)),
        many => Some(format!("Users with the following IDs were not found: {}.", many.join(", "))),
    };
    let invalid = match invalid {
        [] => None,
        [id] => Some(format!("The ID {} is invalid.", id)),
        many => Some(format!("The following IDs are invalid: {}.", many.join(", "))),
    };

    RoleActionResponse { message, error, invalid }
}
