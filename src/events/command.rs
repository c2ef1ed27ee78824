use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, PartialGuild},
    prelude::Context as IncomingContext,
};
use tracing::error;

use crate::{
    commands::get_command_list,
    common::reply::error_embed,
    models::{
        command::{Command as _, CommandContext, CommandContextReply, FailedCommandContext},
        handler::Handler,
        response::{Response, ResponseError},
    },
};

impl Handler {
    pub async fn on_command(&self, ctx: IncomingContext, command: CommandInteraction) {
        let Some(guild_id) = command.guild_id else {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .reply(
                    &command,
                    Response::new()
                        .content("Floh cannot be used outside of servers".to_string())
                        .ephemeral(true),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        };

        let cached_guild = guild_id
            .to_guild_cached(&ctx.cache)
            .map(|guild| PartialGuild::from(guild.clone()));
        let guild = match cached_guild {
            Some(guild) => guild,
            None => match guild_id.to_partial_guild(&ctx.http).await {
                Ok(guild) => guild,
                Err(_) => {
                    let fail_context = FailedCommandContext { ctx: ctx.clone() };
                    if let Err(err) = fail_context
                        .reply(
                            &command,
                            Response::new()
                                .content("Floh could not obtain the server".to_string())
                                .ephemeral(true),
                        )
                        .await
                    {
                        error!("Failed to reply to command: {:?}", err);
                    }
                    return;
                }
            },
        };

        let command_context = CommandContext {
            ctx,
            has_responsed: AtomicBool::new(false),
            guild,
        };

        for existing_command in get_command_list() {
            if existing_command.name() != command.data.name {
                continue;
            }
            if let Err(err) = existing_command
                .router(self, &command_context, &command)
                .await
            {
                let response = match err {
                    ResponseError::Execution(title, hint) => {
                        Response::new().embed(error_embed(title, hint)).ephemeral(true)
                    }
                    ResponseError::Serenity(err) => {
                        error!(
                            "Failed to handle command {}: {:?}",
                            command.data.name, err
                        );
                        Response::new()
                            .embed(error_embed(
                                "Something went wrong",
                                Some("Please try again later.".to_string()),
                            ))
                            .ephemeral(true)
                    }
                };
                if let Err(err) = command_context.reply(&command, response).await {
                    error!("Failed to report a command failure: {:?}", err);
                }
            }
        }
    }
}
