use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, ComponentInteraction, Message, PartialGuild},
    builder::CreateCommand,
    prelude::Context as IncomingContext,
};

use super::{
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

/// Context for a slash-command invocation. `has_responsed` tracks whether the
/// interaction has been acknowledged, switching replies to response edits.
pub struct CommandContext {
    pub ctx: IncomingContext,
    pub has_responsed: AtomicBool,
    pub guild: PartialGuild,
}

/// Fallback context used when a full `CommandContext` could not be built
/// (e.g. the command arrived outside of a guild).
pub struct FailedCommandContext {
    pub ctx: IncomingContext,
}

/// Context for a button press.
pub struct InteractionContext {
    pub ctx: IncomingContext,
    pub interaction: ComponentInteraction,
    pub has_responsed: AtomicBool,
}

impl InteractionContext {
    pub fn new(ctx: IncomingContext, interaction: ComponentInteraction) -> Self {
        InteractionContext {
            ctx,
            interaction,
            has_responsed: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
pub trait CommandContextReply {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError>;
    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult;
}

#[async_trait::async_trait]
pub trait InteractionContextReply {
    async fn reply(&self, response: Response) -> ResponseResult;
    /// Acknowledges the interaction ephemerally so a slow handler can keep
    /// working past the platform's response deadline.
    async fn defer(&self) -> ResponseResult;
}

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self) -> CreateCommand;
    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult;
}
