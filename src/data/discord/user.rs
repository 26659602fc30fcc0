use serenity::all::{Emoji, Member, Role, User};

use crate::{
    model::{avatar::UserAvatar, emoji::EmojiRef, role::RoleRef},
    service::auth::MemberAccess,
};

pub fn user_avatar(user: &User) -> UserAvatar {
    UserAvatar {
        id: user.id.get(),
        username: user.name.clone(),
        avatar_hash: user.avatar.map(|hash| hash.to_string()),
    }
}

/// Permissions and roles of an interaction's member.
///
/// Interaction payloads carry the member's resolved permissions in the channel.
pub fn member_access(member: &Member) -> MemberAccess {
    MemberAccess {
        is_admin: member.permissions.is_some_and(|p| p.administrator()),
        role_ids: member.roles.iter().map(|r| r.get()).collect(),
    }
}

pub fn guild_emoji_ref(emoji: &Emoji) -> EmojiRef {
    EmojiRef::Custom {
        id: emoji.id.get(),
        name: emoji.name.clone(),
        animated: emoji.animated,
    }
}

pub fn role_ref(role: &Role) -> RoleRef {
    RoleRef {
        id: role.id.get(),
        name: role.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::serenity::{role::create_test_role, user::create_test_user};

    /// Tests converting users into avatar models.
    ///
    /// Expected: no hash without an avatar, `a_` hashes marked animated
    #[test]
    fn converts_users_with_and_without_avatar() {
        let plain = user_avatar(&create_test_user(3, "bo", None));
        assert_eq!(plain.avatar_hash, None);

        let animated = user_avatar(&create_test_user(4, "cy", Some("a_0123456789abcdef0123456789abcdef")));
        assert_eq!(animated.username, "cy");
        assert_eq!(
            animated.avatar_hash.as_deref(),
            Some("a_0123456789abcdef0123456789abcdef")
        );
        assert!(animated.is_animated());
    }

    /// Tests converting a guild role.
    ///
    /// Expected: ID and name kept, rendered as a role mention
    #[test]
    fn converts_roles() {
        let role = role_ref(&create_test_role(900, "Judges", 0));
        assert_eq!(
            role,
            RoleRef {
                id: 900,
                name: "Judges".to_string(),
            }
        );
        assert_eq!(role.to_string(), "<@&900>");
    }
}
