//! Authorization for moderator commands.

use crate::model::role::RoleRef;

/// Reply when a member without the moderator role runs a moderator command.
pub const NO_PERMISSION_MESSAGE: &str = "You do not have permission to do this.";

/// The invoking member, as far as authorization is concerned.
#[derive(Debug, Clone, Default)]
pub struct MemberAccess {
    /// Whether the member holds the Administrator permission in the guild.
    pub is_admin: bool,
    /// IDs of the roles the member holds.
    pub role_ids: Vec<u64>,
}

/// Decides whether a member may run moderator commands.
///
/// Administrators always may. Otherwise the member must hold the configured
/// moderator role; the guild's `@everyone` role (whose ID equals the guild ID) is
/// held by every member. Without a configured role only administrators pass.
///
/// # Arguments
/// - `member` - Permissions and roles of the invoking member
/// - `guild_id` - Guild the command was invoked in
/// - `role` - Currently configured moderator role, if any
pub fn can_moderate(member: &MemberAccess, guild_id: u64, role: Option<&RoleRef>) -> bool {
    if member.is_admin {
        return true;
    }

    match role {
        Some(role) if role.id == guild_id => true,
        Some(role) => member.role_ids.contains(&role.id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUILD: u64 = 1000;

    fn member(role_ids: &[u64]) -> MemberAccess {
        MemberAccess {
            is_admin: false,
            role_ids: role_ids.to_vec(),
        }
    }

    fn role(id: u64) -> RoleRef {
        RoleRef {
            id,
            name: "Moderators".to_string(),
        }
    }

    /// Tests moderator access for administrators.
    ///
    /// Expected: allowed with or without a configured role
    #[test]
    fn administrator_always_passes() {
        let admin = MemberAccess {
            is_admin: true,
            role_ids: vec![],
        };
        assert!(can_moderate(&admin, GUILD, None));
        assert!(can_moderate(&admin, GUILD, Some(&role(5))));
    }

    /// Tests moderator access through the configured role.
    ///
    /// Expected: allowed only for members holding that role
    #[test]
    fn configured_role_grants_access() {
        assert!(can_moderate(&member(&[5, 6]), GUILD, Some(&role(5))));
        assert!(!can_moderate(&member(&[6]), GUILD, Some(&role(5))));
    }

    /// Tests a configured `@everyone` role.
    ///
    /// Expected: every member is allowed
    #[test]
    fn everyone_role_is_always_held() {
        assert!(can_moderate(&member(&[]), GUILD, Some(&role(GUILD))));
    }

    /// Tests moderator access without a configured role.
    ///
    /// Expected: members without Administrator are denied
    #[test]
    fn no_role_configured_denies_members() {
        assert!(!can_moderate(&member(&[5]), GUILD, None));
    }
}
