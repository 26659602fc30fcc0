use serenity::all::{Context, Message};

use crate::{data::discord::SerenityChannelPoster, state::AppState};

/// Reposts the channel's sticky message, if it has one.
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    // Only guild channels can have sticky messages
    if message.guild_id.is_none() {
        return;
    }

    let bot_id = ctx.cache.current_user().id.get();
    let poster = SerenityChannelPoster::new(ctx.http.clone());

    if let Err(e) = state
        .sticky
        .on_message(
            &poster,
            message.channel_id.get(),
            message.author.id.get(),
            bot_id,
        )
        .await
    {
        tracing::error!(
            "Failed to repost sticky message in channel {}: {}",
            message.channel_id,
            e
        );
    }
}
