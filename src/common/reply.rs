use std::sync::atomic::Ordering;

use serenity::{
    all::{CommandInteraction, Message},
    builder::{
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
};
use tracing::error;

use crate::models::{
    command::{
        CommandContext, CommandContextReply, FailedCommandContext, InteractionContext,
        InteractionContextReply,
    },
    response::{Response, ResponseError, ResponseResult},
};

const ERROR_COLOR: u32 = 0xf54029;

/// Embed used for every user-facing rejection.
pub fn error_embed(title: &str, hint: Option<String>) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(title.to_string()).color(ERROR_COLOR);
    if let Some(hint) = hint {
        embed = embed.description(hint);
    }
    embed
}

fn build_initial_response(response: Response) -> CreateInteractionResponseMessage {
    let mut reply = CreateInteractionResponseMessage::new();
    if let Some(content) = response.content {
        reply = reply.content(content);
    }
    if let Some(embeds) = response.embeds {
        reply = reply.embeds(embeds);
    }
    if let Some(components) = response.components {
        reply = reply.components(components);
    }
    if let Some(file) = response.file {
        reply = reply.add_file(file);
    }
    if response.ephemeral {
        reply = reply.ephemeral(true);
    }
    reply
}

fn build_edit_response(response: Response) -> EditInteractionResponse {
    let mut edit = EditInteractionResponse::new();
    if let Some(content) = response.content {
        edit = edit.content(content);
    }
    if let Some(embeds) = response.embeds {
        edit = edit.embeds(embeds);
    }
    if let Some(components) = response.components {
        edit = edit.components(components);
    }
    if let Some(file) = response.file {
        edit = edit.new_attachment(file);
    }
    edit
}

#[async_trait::async_trait]
impl CommandContextReply for CommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        let message = if self.has_responsed.load(Ordering::Relaxed) {
            match cmd
                .edit_response(&self.ctx.http, build_edit_response(response))
                .await
            {
                Ok(message) => message,
                Err(err) => {
                    error!("Attempted to edit a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        } else {
            match cmd
                .create_response(
                    &self.ctx.http,
                    CreateInteractionResponse::Message(build_initial_response(response)),
                )
                .await
            {
                Ok(()) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                    match cmd.get_response(&self.ctx.http).await {
                        Ok(message) => message,
                        Err(err) => {
                            error!(
                                "A message was sent, but failed to fetch, failed with error: {err}"
                            );
                            return Err(ResponseError::Serenity(err));
                        }
                    }
                }
                Err(err) => {
                    error!("Attempted to create a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        };
        Ok(message)
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CommandContextReply for FailedCommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        match cmd
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Message(build_initial_response(response)),
            )
            .await
        {
            Ok(()) => match cmd.get_response(&self.ctx.http).await {
                Ok(message) => Ok(message),
                Err(err) => {
                    error!("A message was sent, but failed to fetch, failed with error: {err}");
                    Err(ResponseError::Serenity(err))
                }
            },
            Err(err) => {
                error!("Attempted to create a response to a command, failed with error: {err}");
                Err(ResponseError::Serenity(err))
            }
        }
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl InteractionContextReply for InteractionContext {
    async fn reply(&self, response: Response) -> ResponseResult {
        if self.has_responsed.load(Ordering::Relaxed) {
            if let Err(err) = self
                .interaction
                .edit_response(&self.ctx.http, build_edit_response(response))
                .await
            {
                error!("Attempted to edit an interaction response, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        } else {
            match self
                .interaction
                .create_response(
                    &self.ctx.http,
                    CreateInteractionResponse::Message(build_initial_response(response)),
                )
                .await
            {
                Ok(()) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                }
                Err(err) => {
                    error!(
                        "Attempted to create a response to an interaction, failed with error: {err}"
                    );
                    return Err(ResponseError::Serenity(err));
                }
            }
        }
        Ok(())
    }

    async fn defer(&self) -> ResponseResult {
        if self.has_responsed.load(Ordering::Relaxed) {
            return Ok(());
        }
        match self
            .interaction
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Defer(
                    CreateInteractionResponseMessage::new().ephemeral(true),
                ),
            )
            .await
        {
            Ok(()) => {
                self.has_responsed.store(true, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                error!("Attempted to defer an interaction, failed with error: {err}");
                Err(ResponseError::Serenity(err))
            }
        }
    }
}
