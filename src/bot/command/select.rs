use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions,
};

use crate::{
    data::discord::{InteractionResponder, SerenityMessageSource},
    error::command::CommandError,
    model::selection::SelectionLayout,
    service::{
        response::ResponseAssembler,
        selection::{archive_selection, SelectionPipeline},
    },
    state::AppState,
};

use super::{defer, require_moderator, string_option};

pub const NAME: &str = "select";

/// Name of the text file that carries long submission listings.
const LISTING_FILE_NAME: &str = "submissions.txt";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Select messages to look through for submissions")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "start",
                "ID of the first message of the range",
            )
            .required(true),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "end",
            "ID of the last message of the range; omit to select up to the newest message",
        ))
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "layout",
                "How to lay out the files in the archive",
            )
            .add_string_choice("Flat", "flat")
            .add_string_choice("Raw", "raw"),
        )
}

/// Collects the self-marked submissions in a message range into an archive.
///
/// Validation runs before the interaction is deferred, so input errors are shown
/// as a direct ephemeral response.
pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_moderator(state, command).await?;

    let start = string_option(command, "start").unwrap_or_default();
    let end = string_option(command, "end");
    let layout = string_option(command, "layout")
        .and_then(SelectionLayout::from_choice)
        .unwrap_or_default();

    let channel_id = command.channel_id.get();
    let source = SerenityMessageSource::new(ctx.http.clone());
    let pipeline = SelectionPipeline::new(&source, &state.http);

    let selection = pipeline
        .validate(state.emoji.get().await, channel_id, start, end)
        .await?;

    defer(ctx, command).await?;

    let work_dir = state
        .paths
        .selections
        .join(channel_id.to_string())
        .join(command.id.to_string());

    let collected = pipeline.collect(channel_id, &selection, &work_dir, layout).await?;
    let archive = archive_selection(&collected, &work_dir, layout).await?;

    let responder = InteractionResponder::new(ctx.http.clone(), command.clone());
    let outcome = ResponseAssembler::new(LISTING_FILE_NAME)
        .send(&responder, &collected.stats(), collected.listing(), archive.as_deref())
        .await;

    tracing::info!("/select in channel {} finished: {:?}", channel_id, outcome);
    Ok(())
}
