//! Test factory for Serenity `Role` objects.

use serenity::all::Role;

/// Creates a guild role with the given permission bits.
///
/// # Arguments
/// - `role_id` - Discord role ID (equal to the guild ID for `@everyone`)
/// - `name` - Role name
/// - `permissions` - Permission bit set, e.g. `8` for Administrator
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role
pub fn create_test_role(role_id: u64, name: &str, permissions: u64) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": 1,
        "permissions": permissions.to_string(),
        "managed": false,
        "mentionable": true,
        "flags": 0,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}
