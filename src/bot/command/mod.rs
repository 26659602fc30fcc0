//! Slash commands.
//!
//! Each module exposes its command name, a `register` function returning the
//! command definition and a `run` function called by the interaction dispatcher.
//! `run` returns `CommandError::User` for problems the user can fix; the
//! dispatcher shows those verbatim and logs everything else.

use serenity::all::{
    CommandDataOptionValue, CommandInteraction, Context, CreateCommand,
    CreateInteractionResponse, CreateInteractionResponseMessage, RoleId,
};

use crate::{
    data::discord::user::member_access,
    error::command::CommandError,
    service::auth::{can_moderate, MemberAccess, NO_PERMISSION_MESSAGE},
    state::AppState,
};

pub mod emoji;
pub mod pfps;
pub mod role;
pub mod select;
pub mod showcase;
pub mod sticky;
pub mod typst;

const GUILD_ONLY_MESSAGE: &str = "This command can only be used in a server.";

/// Definitions of every slash command, for global registration.
pub fn all() -> Vec<CreateCommand> {
    vec![
        select::register(),
        showcase::register(),
        emoji::register_set(),
        emoji::register_get(),
        role::register(),
        pfps::register(),
        typst::register(),
        sticky::register(),
    ]
}

/// Acknowledges the interaction with an ephemeral "thinking" state.
pub async fn defer(ctx: &Context, command: &CommandInteraction) -> Result<(), CommandError> {
    command.defer_ephemeral(&ctx.http).await?;
    Ok(())
}

/// Sends a short ephemeral response to a not yet acknowledged interaction.
pub async fn respond(
    ctx: &Context,
    command: &CommandInteraction,
    content: impl Into<String>,
) -> Result<(), CommandError> {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    command.create_response(&ctx.http, response).await?;
    Ok(())
}

fn option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a CommandDataOptionValue> {
    command
        .data
        .options
        .iter()
        .find(|o| o.name == name)
        .map(|o| &o.value)
}

pub fn string_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    option(command, name).and_then(|v| v.as_str())
}

pub fn bool_option(command: &CommandInteraction, name: &str) -> Option<bool> {
    option(command, name).and_then(|v| v.as_bool())
}

pub fn role_option(command: &CommandInteraction, name: &str) -> Option<RoleId> {
    option(command, name).and_then(|v| v.as_role_id())
}

fn invoking_member(command: &CommandInteraction) -> Result<(u64, MemberAccess), CommandError> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| CommandError::user(GUILD_ONLY_MESSAGE))?;
    let member = command
        .member
        .as_deref()
        .ok_or_else(|| CommandError::user(GUILD_ONLY_MESSAGE))?;

    Ok((guild_id.get(), member_access(member)))
}

/// Fails unless the invoking member is an administrator or holds the moderator role.
pub async fn require_moderator(state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    let (guild_id, access) = invoking_member(command)?;
    let role = state.role.get().await;

    if can_moderate(&access, guild_id, role.as_ref()) {
        Ok(())
    } else {
        Err(CommandError::user(NO_PERMISSION_MESSAGE))
    }
}

/// Fails unless the invoking member is an administrator.
pub fn require_admin(command: &CommandInteraction) -> Result<(), CommandError> {
    let (_, access) = invoking_member(command)?;

    if access.is_admin {
        Ok(())
    } else {
        Err(CommandError::user(NO_PERMISSION_MESSAGE))
    }
}
