use serenity::all::{CommandInteraction, Context, CreateCommand};
use std::ffi::OsString;

use crate::{
    data::discord::InteractionResponder,
    error::command::CommandError,
    model::reply::Reply,
    service::{
        response::Responder,
        typst::{run_typst, TypstInstaller},
    },
    state::AppState,
};

use super::defer;

pub const NAME: &str = "typst";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME).description("Does a Typst thing!")
}

/// Compiles the weekly challenge script and shows the compiler output.
pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    defer(ctx, command).await?;

    let responder = InteractionResponder::new(ctx.http.clone(), command.clone());
    let install = TypstInstaller::new(&state.http, &state.paths, &state.typst_gate)
        .ensure_installed(&responder)
        .await?;

    let args: Vec<OsString> = vec!["compile".into(), install.script.into()];
    let output = run_typst(&install.exe, &args).await?;

    if let Err(e) = responder.edit(Reply::text(output.code_block())).await {
        tracing::error!("Failed to send Typst output: {}", e);
    }

    Ok(())
}
