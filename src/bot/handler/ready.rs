//! Ready event handler for bot initialization.
//!
//! `ready` fires after every (re)connection to the gateway. Slash commands are
//! registered each time, which Discord treats as an idempotent overwrite; the
//! presence rotation is started only once per process.

use serenity::all::{Command, Context, Ready};
use std::sync::atomic::Ordering;

use crate::{bot::command, scheduler::status, state::AppState};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared application state
/// - `ctx` - Discord context for registering commands and setting the presence
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    match Command::set_global_commands(&ctx.http, command::all()).await {
        Ok(commands) => tracing::info!("Registered {} slash commands", commands.len()),
        Err(e) => tracing::error!("Failed to register slash commands: {}", e),
    }

    if state
        .status_started
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        if let Err(e) = status::start_status_rotation(ctx, &state.status_rotation_cron).await {
            tracing::error!("Failed to start status rotation: {}", e);
        }
    }
}
