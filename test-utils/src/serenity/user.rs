//! Test factory for Serenity `User` objects.

use serenity::all::User;

/// Creates a test Serenity User.
///
/// # Arguments
/// - `user_id` - Discord user ID (snowflake)
/// - `username` - Unique username
/// - `avatar_hash` - Optional avatar hash; padded with zeros to Discord's 32 hex
///   characters (34 for animated hashes starting with `a_`)
///
/// # Panics
/// - If the JSON cannot be deserialized into a User (indicates invalid test data)
pub fn create_test_user(user_id: u64, username: &str, avatar_hash: Option<&str>) -> User {
    let avatar = avatar_hash.map(|hash| {
        let width = if hash.starts_with("a_") { 34 } else { 32 };
        format!("{:0<width$}", hash, width = width)
    });

    serde_json::from_value(serde_json::json!({
        "id": user_id.to_string(),
        "username": username,
        "discriminator": "0",
        "global_name": null,
        "avatar": avatar,
        "bot": false,
        "public_flags": 0,
    }))
    .expect("Failed to create test user - invalid JSON structure")
}
