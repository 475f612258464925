use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Session id. The session row must still exist for the token to be accepted.
    pub jti: String,

    // Role flags, snapshotted at login
    pub is_farm_owner: bool,
    pub is_farm_manager: bool,
    pub is_assistant_farm_manager: bool,
    pub is_team_leader: bool,
    pub is_farm_worker: bool,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Role flags carried by a user row and copied into the JWT
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_farm_owner: bool,
    pub is_farm_manager: bool,
    pub is_assistant_farm_manager: bool,
    pub is_team_leader: bool,
    pub is_farm_worker: bool,
}

impl From<&Claims> for RoleFlags {
    fn from(claims: &Claims) -> Self {
        Self {
            is_farm_owner: claims.is_farm_owner,
            is_farm_manager: claims.is_farm_manager,
            is_assistant_farm_manager: claims.is_assistant_farm_manager,
            is_team_leader: claims.is_team_leader,
            is_farm_worker: claims.is_farm_worker,
        }
    }
}

impl From<&crate::types::db::user::Model> for RoleFlags {
    fn from(user: &crate::types::db::user::Model) -> Self {
        Self {
            is_farm_owner: user.is_farm_owner,
            is_farm_manager: user.is_farm_manager,
            is_assistant_farm_manager: user.is_assistant_farm_manager,
            is_team_leader: user.is_team_leader,
            is_farm_worker: user.is_farm_worker,
        }
    }
}

/// A farm responsibility level, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmRole {
    FarmOwner,
    FarmManager,
    AssistantFarmManager,
    TeamLeader,
    FarmWorker,
}

impl FarmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmRole::FarmOwner => "Farm Owner",
            FarmRole::FarmManager => "Farm Manager",
            FarmRole::AssistantFarmManager => "Assistant Farm Manager",
            FarmRole::TeamLeader => "Team Leader",
            FarmRole::FarmWorker => "Farm Worker",
        }
    }

    /// Lower-case singular name used in bulk role messages ("farm owner")
    pub fn noun(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl RoleFlags {
    /// Give the user `role`. Leadership roles are exclusive; a team leader
    /// keeps the worker flag as well.
    pub fn assign(&mut self, role: FarmRole) {
        *self = RoleFlags::default();
        match role {
            FarmRole::FarmOwner => self.is_farm_owner = true,
            FarmRole::FarmManager => self.is_farm_manager = true,
            FarmRole::AssistantFarmManager => self.is_assistant_farm_manager = true,
            FarmRole::TeamLeader => {
                self.is_team_leader = true;
                self.is_farm_worker = true;
            }
            FarmRole::FarmWorker => self.is_farm_worker = true,
        }
    }

    /// Take `role` away. Dismissing a worker also ends any team leadership.
    pub fn dismiss(&mut self, role: FarmRole) {
        match role {
            FarmRole::FarmOwner => self.is_farm_owner = false,
            FarmRole::FarmManager => self.is_farm_manager = false,
            FarmRole::AssistantFarmManager => self.is_assistant_farm_manager = false,
            FarmRole::TeamLeader => self.is_team_leader = false,
            FarmRole::FarmWorker => {
                self.is_farm_worker = false;
                self.is_team_leader = false;
            }
        }
    }

    /// Highest role held, if any
    pub fn role(&self) -> Option<FarmRole> {
        if self.is_farm_owner {
            Some(FarmRole::FarmOwner)
        } else if self.is_farm_manager {
            Some(FarmRole::FarmManager)
        } else if self.is_assistant_farm_manager {
            Some(FarmRole::AssistantFarmManager)
        } else if self.is_team_leader {
            Some(FarmRole::TeamLeader)
        } else if self.is_farm_worker {
            Some(FarmRole::FarmWorker)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_leadership_role_clears_others() {
        let mut flags = RoleFlags {
            is_farm_worker: true,
            is_team_leader: true,
            ..Default::default()
        };
        flags.assign(FarmRole::FarmManager);

        assert!(flags.is_farm_manager);
        assert!(!flags.is_farm_worker);
        assert!(!flags.is_team_leader);
        assert_eq!(flags.role(), Some(FarmRole::FarmManager));
    }

    #[test]
    fn test_team_leader_is_also_worker() {
        let mut flags = RoleFlags::default();
        flags.assign(FarmRole::TeamLeader);

        assert!(flags.is_team_leader);
        assert!(flags.is_farm_worker);
        assert_eq!(flags.role(), Some(FarmRole::TeamLeader));
    }

    #[test]
    fn test_dismiss_worker_ends_team_leadership() {
        let mut flags = RoleFlags::default();
        flags.assign(FarmRole::TeamLeader);
        flags.dismiss(FarmRole::FarmWorker);

        assert_eq!(flags, RoleFlags::default());
        assert_eq!(flags.role(), None);
    }

    #[test]
    fn test_dismiss_team_leader_keeps_worker() {
        let mut flags = RoleFlags::default();
        flags.assign(FarmRole::TeamLeader);
        flags.dismiss(FarmRole::TeamLeader);

        assert!(flags.is_farm_worker);
        assert_eq!(flags.role(), Some(FarmRole::FarmWorker));
    }

    #[test]
    fn test_role_precedence() {
        let flags = RoleFlags {
            is_farm_owner: true,
            is_farm_worker: true,
            ..Default::default()
        };
        assert_eq!(flags.role(), Some(FarmRole::FarmOwner));
        assert_eq!(FarmRole::AssistantFarmManager.noun(), "assistant farm manager");
    }
}
