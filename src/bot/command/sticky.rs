use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions,
};

use crate::{
    data::discord::SerenityChannelPoster, error::command::CommandError, state::AppState,
};

use super::{require_admin, respond, string_option};

pub const NAME: &str = "sticky";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Sets a sticky message for this channel")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "message",
            "Set the message, omit to disable",
        ))
}

pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_admin(command)?;

    let channel_id = command.channel_id.get();
    let poster = SerenityChannelPoster::new(ctx.http.clone());

    match string_option(command, "message").filter(|m| !m.trim().is_empty()) {
        Some(message) => {
            if state.sticky.content(channel_id).await.is_some() {
                tracing::debug!("Replacing sticky message in channel {}", channel_id);
            }
            respond(ctx, command, "Sticky Message enabled for this channel.").await?;
            state.sticky.enable(&poster, channel_id, message).await?;
            tracing::info!("Enabled sticky message in channel {}", channel_id);
        }
        None => {
            state.sticky.disable(&poster, channel_id).await?;
            respond(ctx, command, "Sticky Message disabled for this channel.").await?;
            tracing::info!("Disabled sticky message in channel {}", channel_id);
        }
    }

    Ok(())
}
