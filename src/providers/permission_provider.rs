use crate::errors::InternalError;
use crate::errors::internal::PermissionError;
use crate::types::internal::auth::{Claims, RoleFlags};
use crate::types::internal::context::RequestContext;

/// A role requirement an endpoint can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    FarmOwner,
    FarmManager,
    AssistantFarmManager,
    TeamLeader,
    FarmWorker,
}

impl Permission {
    /// Whether a user holding `roles` satisfies this requirement
    pub fn allows(&self, roles: &RoleFlags) -> bool {
        match self {
            Permission::FarmOwner => roles.is_farm_owner,
            Permission::FarmManager => roles.is_farm_manager || roles.is_farm_owner,
            Permission::AssistantFarmManager => {
                roles.is_assistant_farm_manager || roles.is_farm_manager || roles.is_farm_owner
            }
            Permission::TeamLeader => {
                roles.is_team_leader
                    || roles.is_assistant_farm_manager
                    || roles.is_farm_manager
                    || roles.is_farm_owner
            }
            Permission::FarmWorker => {
                roles.is_farm_owner
                    || roles.is_farm_worker
                    || roles.is_farm_manager
                    || roles.is_assistant_farm_manager
            }
        }
    }

    pub fn denial_message(&self) -> &'static str {
        match self {
            Permission::FarmOwner => "Only farm owners have permission to perform this action.",
            Permission::FarmManager => {
                "Only farm owners and managers have permission to perform this action."
            }
            Permission::AssistantFarmManager => {
                "Only farm owners, managers, and assistants have permission to perform this action."
            }
            Permission::TeamLeader => "Only team leaders have permission to perform this action.",
            Permission::FarmWorker => {
                "Only farm staff and workers have permission to perform this action."
            }
        }
    }
}

/// Read access for farm records: every staff role
pub const ALL_STAFF: &[Permission] = &[
    Permission::FarmWorker,
    Permission::AssistantFarmManager,
    Permission::FarmManager,
    Permission::FarmOwner,
];

/// Write access for most farm records
pub const MANAGEMENT: &[Permission] = &[Permission::FarmManager, Permission::FarmOwner];

/// Checks the caller in a `RequestContext` against role requirements
#[derive(Debug, Default)]
pub struct PermissionProvider {}

impl PermissionProvider {
    pub fn new() -> Self {
        Self {}
    }

    /// Claims of the logged-in caller, or 401
    pub fn require_authenticated<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, InternalError> {
        match (&ctx.claims, ctx.authenticated) {
            (Some(claims), true) => Ok(claims),
            _ => Err(PermissionError::NotAuthenticated.into()),
        }
    }

    /// Pass when any one of `permissions` holds
    ///
    /// A denial carries the message of the first permission listed.
    pub fn require_any<'a>(
        &self,
        ctx: &'a RequestContext,
        permissions: &[Permission],
    ) -> Result<&'a Claims, InternalError> {
        let claims = self.require_authenticated(ctx)?;
        let roles = RoleFlags::from(claims);

        if permissions.iter().any(|permission| permission.allows(&roles)) {
            return Ok(claims);
        }

        let message = permissions
            .first()
            .map(Permission::denial_message)
            .unwrap_or("You do not have permission to perform this action.");
        tracing::debug!(actor = %ctx.actor_id, "Permission denied: {}", message);
        Err(PermissionError::Denied(message.to_string()).into())
    }

    /// Pass only when the caller is acting on their own profile
    pub fn require_self<'a>(&self, ctx: &'a RequestContext, target_user_id: i32) -> Result<&'a Claims, InternalError> {
        let claims = self.require_authenticated(ctx)?;
        if claims.user_id() == Some(target_user_id) {
            Ok(claims)
        } else {
            Err(PermissionError::Denied(
                "You do not have permission to perform this action on another user's profile.".to_string(),
            )
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::claims_for;

    fn ctx_with(roles: RoleFlags) -> RequestContext {
        RequestContext::anonymous().with_auth(claims_for(5, roles))
    }

    fn denial(result: Result<&Claims, InternalError>) -> String {
        match result {
            Err(InternalError::Permission(PermissionError::Denied(message))) => message,
            other => panic!("expected denial, got {:?}", other.map(|c| c.sub.clone())),
        }
    }

    #[test]
    fn test_anonymous_caller_is_not_authenticated() {
        let provider = PermissionProvider::new();
        let anon = RequestContext::anonymous();
        let result = provider.require_any(&anon, ALL_STAFF);

        assert!(matches!(result, Err(InternalError::Permission(PermissionError::NotAuthenticated))));
    }

    #[test]
    fn test_hierarchy() {
        let owner = RoleFlags { is_farm_owner: true, ..Default::default() };
        let assistant = RoleFlags { is_assistant_farm_manager: true, ..Default::default() };
        let leader = RoleFlags { is_team_leader: true, is_farm_worker: true, ..Default::default() };

        assert!(Permission::TeamLeader.allows(&owner));
        assert!(Permission::AssistantFarmManager.allows(&assistant));
        assert!(!Permission::FarmManager.allows(&assistant));
        assert!(Permission::FarmWorker.allows(&leader));
        assert!(!Permission::AssistantFarmManager.allows(&leader));
        // Team leaders without the worker flag are not counted as staff
        assert!(!Permission::FarmWorker.allows(&RoleFlags { is_team_leader: true, ..Default::default() }));
    }

    #[test]
    fn test_denial_uses_first_permission_message() {
        let provider = PermissionProvider::new();
        let worker = ctx_with(RoleFlags { is_farm_worker: true, ..Default::default() });

        let message = denial(provider.require_any(&worker, MANAGEMENT));
        assert_eq!(message, "Only farm owners and managers have permission to perform this action.");

        let message = denial(provider.require_any(&worker, &[Permission::FarmOwner, Permission::FarmManager]));
        assert_eq!(message, "Only farm owners have permission to perform this action.");
    }

    #[test]
    fn test_require_any_passes_on_any_member() {
        let provider = PermissionProvider::new();
        let manager = ctx_with(RoleFlags { is_farm_manager: true, ..Default::default() });

        assert!(provider.require_any(&manager, &[Permission::FarmOwner, Permission::FarmManager]).is_ok());
        assert!(provider.require_any(&manager, ALL_STAFF).is_ok());
    }

    #[test]
    fn test_require_self() {
        let provider = PermissionProvider::new();
        let ctx = ctx_with(RoleFlags::default());

        assert!(provider.require_self(&ctx, 5).is_ok());
        assert_eq!(
            denial(provider.require_self(&ctx, 6)),
            "You do not have permission to perform this action on another user's profile."
        );
    }
}
