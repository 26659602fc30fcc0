use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions,
};

use crate::{
    data::discord::user::guild_emoji_ref,
    error::command::CommandError,
    model::emoji::EmojiRef,
    service::settings::{resolve_emoji_input, SettingsService},
    state::AppState,
};

use super::{require_moderator, respond, string_option};

pub const SET_NAME: &str = "set-emoji";
pub const GET_NAME: &str = "emoji";

pub fn register_set() -> CreateCommand {
    CreateCommand::new(SET_NAME)
        .description("Set the emoji that will mark something as a submission")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "emoji",
                "The emoji itself, its :name:, or `clear` to unset it",
            )
            .required(true),
        )
}

pub fn register_get() -> CreateCommand {
    CreateCommand::new(GET_NAME)
        .description("Which emoji do I need to use to mark something as a submission?")
}

pub async fn run_set(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_moderator(state, command).await?;

    let input = string_option(command, "emoji").unwrap_or_default();

    let guild_emojis: Vec<EmojiRef> = match command.guild_id {
        Some(guild_id) => guild_id
            .emojis(&ctx.http)
            .await?
            .iter()
            .map(guild_emoji_ref)
            .collect(),
        None => Vec::new(),
    };

    let choice = resolve_emoji_input(input, &guild_emojis)?;
    let message = SettingsService::new(&state.emoji, &state.role)
        .apply_emoji(choice)
        .await?;

    respond(ctx, command, message).await
}

pub async fn run_get(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    let message = SettingsService::new(&state.emoji, &state.role)
        .describe_emoji()
        .await;

    respond(ctx, command, message).await
}
