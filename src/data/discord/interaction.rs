use serenity::all::{CommandInteraction, CreateAttachment, EditInteractionResponse};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{
    error::{send::SendError, AppError},
    model::reply::{Reply, ReplyAttachment},
    service::response::Responder,
};

/// Edits the deferred response of one slash command interaction.
pub struct InteractionResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

impl InteractionResponder {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn edit(&self, reply: Reply) -> Result<(), SendError> {
        let builder = edit_builder(reply)
            .await
            .map_err(SendError::Other)?;

        self.interaction.edit_response(&self.http, builder).await?;
        Ok(())
    }
}

/// Builds the edit request, reading file attachments from disk.
async fn edit_builder(reply: Reply) -> Result<EditInteractionResponse, AppError> {
    let mut builder = EditInteractionResponse::new().content(reply.content);

    for attachment in reply.attachments {
        let attachment = match attachment {
            ReplyAttachment::Bytes { filename, data } => CreateAttachment::bytes(data, filename),
            ReplyAttachment::File(path) => CreateAttachment::path(&path).await?,
        };
        builder = builder.new_attachment(attachment);
    }

    Ok(builder)
}
