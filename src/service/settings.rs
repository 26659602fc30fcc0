//! Marker emoji and moderator role settings.

use crate::{
    data::settings::SettingStore,
    error::{command::CommandError, AppError},
    model::{emoji::EmojiRef, role::RoleRef},
};

/// Inputs of `/set-emoji` that clear the marker emoji.
const CLEAR_WORDS: [&str; 4] = ["null", "clear", "empty", "nothing"];

/// What `/set-emoji` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiChoice {
    Clear,
    Set(EmojiRef),
}

/// Interprets the text typed into `/set-emoji`.
///
/// Accepted forms, in order:
/// - one of `null`, `clear`, `empty`, `nothing` (or blank): clear the emoji
/// - custom emoji markup `<:name:id>` / `<a:name:id>`
/// - `:name:` or `name` of one of the guild's custom emojis
/// - a Unicode emoji
///
/// Custom emojis must belong to the guild; they are returned as the guild knows
/// them, so a stale name in the markup is corrected.
///
/// # Arguments
/// - `input` - Raw option value
/// - `guild_emojis` - Custom emojis of the invoking guild
///
/// # Returns
/// - `Ok(EmojiChoice)` - The resolved choice
/// - `Err(CommandError::User)` - The input is not an emoji usable in this guild
pub fn resolve_emoji_input(input: &str, guild_emojis: &[EmojiRef]) -> Result<EmojiChoice, CommandError> {
    let trimmed = input.trim();

    if trimmed.is_empty() || CLEAR_WORDS.contains(&trimmed) {
        return Ok(EmojiChoice::Clear);
    }

    if let Some((_, id)) = parse_custom_markup(trimmed) {
        return guild_emojis
            .iter()
            .find(|e| e.id() == Some(id))
            .cloned()
            .map(EmojiChoice::Set)
            .ok_or_else(|| CommandError::User(format!("Emoji {} is not available...", trimmed)));
    }

    let name = trimmed.trim_matches(':');
    if let Some(emoji) = guild_emojis.iter().find(|e| e.id().is_some() && e.name() == name) {
        return Ok(EmojiChoice::Set(emoji.clone()));
    }

    if looks_like_unicode_emoji(trimmed) {
        return Ok(EmojiChoice::Set(EmojiRef::unicode(trimmed)));
    }

    Err(CommandError::User(format!("Could not set emoji `{}`", trimmed)))
}

/// Splits `<:name:id>` / `<a:name:id>` into name and ID.
fn parse_custom_markup(value: &str) -> Option<(&str, u64)> {
    let inner = value.strip_prefix('<')?.strip_suffix('>')?;
    let inner = inner.strip_prefix('a').unwrap_or(inner);
    let inner = inner.strip_prefix(':')?;
    let (name, id) = inner.split_once(':')?;

    if name.is_empty() {
        return None;
    }

    id.parse().ok().map(|id| (name, id))
}

/// Heuristic for a single Unicode emoji (including ZWJ sequences and keycaps).
fn looks_like_unicode_emoji(value: &str) -> bool {
    let has_symbol = value.chars().any(|c| !c.is_ascii());
    let has_text = value
        .chars()
        .any(|c| c.is_whitespace() || c.is_ascii_alphabetic() || matches!(c, ':' | '<' | '>'));

    has_symbol && !has_text && value.chars().count() <= 16
}

/// Reads and updates the persisted settings.
pub struct SettingsService<'a> {
    emoji: &'a SettingStore<EmojiRef>,
    role: &'a SettingStore<RoleRef>,
}

impl<'a> SettingsService<'a> {
    pub fn new(emoji: &'a SettingStore<EmojiRef>, role: &'a SettingStore<RoleRef>) -> Self {
        Self { emoji, role }
    }

    /// Applies a `/set-emoji` choice and returns the reply text.
    pub async fn apply_emoji(&self, choice: EmojiChoice) -> Result<String, AppError> {
        match choice {
            EmojiChoice::Clear => {
                self.emoji.set(None).await?;
                tracing::info!("Cleared marker emoji");
                Ok("Cleared emoji. Remember to `/set-emoji` it to something again before using `/select`!".to_string())
            }
            EmojiChoice::Set(emoji) => {
                let message = format!("Set emoji to {}", emoji);
                self.emoji.set(Some(emoji)).await?;
                tracing::info!("{}", message);
                Ok(message)
            }
        }
    }

    /// Reply text of `/emoji`.
    pub async fn describe_emoji(&self) -> String {
        match self.emoji.get().await {
            Some(emoji) => format!("Emoji is set to {}", emoji),
            None => "Emoji has not been set!".to_string(),
        }
    }

    /// Stores the moderator role and returns the reply text.
    pub async fn apply_role(&self, role: RoleRef) -> Result<String, AppError> {
        let message = format!("Role set to {}", role);
        self.role.set(Some(role)).await?;
        tracing::info!("{}", message);
        Ok(message)
    }
}
