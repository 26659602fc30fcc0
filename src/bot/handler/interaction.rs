use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Interaction,
};

use crate::{bot::command, error::command::CommandError, state::AppState};

/// Shown when a command fails for a reason the user cannot fix.
const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while running this command. The error has been logged.";

/// Dispatches slash commands to their modules and reports failures.
pub async fn handle_interaction(state: &AppState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    tracing::info!(
        "/{} invoked by {} ({}) in channel {}",
        command.data.name,
        command.user.name,
        command.user.id,
        command.channel_id
    );

    let result = match command.data.name.as_str() {
        command::select::NAME => command::select::run(&ctx, state, &command).await,
        command::showcase::NAME => command::showcase::run(&ctx, state, &command).await,
        command::emoji::SET_NAME => command::emoji::run_set(&ctx, state, &command).await,
        command::emoji::GET_NAME => command::emoji::run_get(&ctx, state, &command).await,
        command::role::NAME => command::role::run(&ctx, state, &command).await,
        command::pfps::NAME => command::pfps::run(&ctx, state, &command).await,
        command::typst::NAME => command::typst::run(&ctx, state, &command).await,
        command::sticky::NAME => command::sticky::run(&ctx, state, &command).await,
        other => {
            tracing::warn!("Received unknown command /{}", other);
            return;
        }
    };

    match result {
        Ok(()) => tracing::debug!("/{} completed", command.data.name),
        Err(e) => report_error(&ctx, &command, e).await,
    }
}

/// Shows a command error to the invoking user.
///
/// Errors before the interaction was acknowledged become an ephemeral response;
/// after a deferral the deferred response is edited instead.
async fn report_error(ctx: &Context, command: &CommandInteraction, error: CommandError) {
    let message = match error {
        CommandError::User(message) => {
            tracing::info!("/{} rejected: {}", command.data.name, message);
            message
        }
        CommandError::Fatal(e) => {
            tracing::error!("/{} failed: {}", command.data.name, e);
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(&message)
            .ephemeral(true),
    );

    if command.create_response(&ctx.http, response).await.is_ok() {
        return;
    }

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(message))
        .await
    {
        tracing::error!("Failed to report error for /{}: {}", command.data.name, e);
    }
}
