use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions,
};

use crate::{
    data::discord::{InteractionResponder, SerenityMessageSource},
    error::command::CommandError,
    service::{
        response::ResponseAssembler,
        selection::SelectionPipeline,
        showcase::ShowcaseService,
        typst::TypstInstaller,
    },
    state::AppState,
};

use super::{defer, require_moderator, string_option};

pub const NAME: &str = "showcase";

const OUTPUT_FILE_NAME: &str = "typst-output.txt";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Render the showcase document of the submissions in a message range")
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
}

pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_moderator(state, command).await?;

    let start = string_option(command, "start").unwrap_or_default();
    let end = string_option(command, "end");

    let channel_id = command.channel_id.get();
    let source = SerenityMessageSource::new(ctx.http.clone());
    let pipeline = SelectionPipeline::new(&source, &state.http);

    let selection = pipeline
        .validate(state.emoji.get().await, channel_id, start, end)
        .await?;

    defer(ctx, command).await?;

    let responder = InteractionResponder::new(ctx.http.clone(), command.clone());
    let installer = TypstInstaller::new(&state.http, &state.paths, &state.typst_gate);
    let work_dir = state.paths.showcase.join(command.id.to_string());

    let outcome = ShowcaseService::new(pipeline, installer, &state.paths.root)
        .run(&responder, channel_id, &selection, &work_dir)
        .await?;

    let sent = ResponseAssembler::new(OUTPUT_FILE_NAME)
        .send(&responder, &outcome.stats, &outcome.output, outcome.document.as_deref())
        .await;

    tracing::info!("/showcase in channel {} finished: {:?}", channel_id, sent);
    Ok(())
}
