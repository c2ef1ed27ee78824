use serenity::{
    all::{
        ChannelType, PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId,
    },
    builder::{CreateChannel, CreateMessage},
};
use tracing::error;

use crate::models::{
    command::{InteractionContext, InteractionContextReply},
    response::{Response, ResponseError, ResponseResult},
    ticket::{TicketKind, TICKET_CATEGORY_NAME},
};

use super::close_components;

/// Provisions a fresh ticket channel for the pressing user: visible to them
/// and the bot, hidden from everyone else, filed under the ticket category.
pub async fn open_ticket(ctx: &InteractionContext, kind: TicketKind) -> ResponseResult {
    let Some(guild_id) = ctx.interaction.guild_id else {
        return Err(ResponseError::Execution(
            "Tickets can only be created in a server",
            None,
        ));
    };
    let user = &ctx.interaction.user;

    let channels = match guild_id.channels(&ctx.ctx.http).await {
        Ok(channels) => channels,
        Err(err) => {
            error!("Could not list guild channels, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };

    let category_id = match channels
        .values()
        .find(|channel| {
            channel.kind == ChannelType::Category && channel.name == TICKET_CATEGORY_NAME
        })
        .map(|channel| channel.id)
    {
        Some(id) => id,
        None => match guild_id
            .create_channel(
                &ctx.ctx.http,
                CreateChannel::new(TICKET_CATEGORY_NAME).kind(ChannelType::Category),
            )
            .await
        {
            Ok(category) => category.id,
            Err(err) => {
                error!("Could not create the ticket category, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        },
    };

    let bot_id = ctx.ctx.cache.current_user().id;
    let overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId::new(guild_id.get())),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(user.id),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(bot_id),
        },
    ];

    let channel_name = format!("{kind}-{}", user.name).replace(' ', "-");
    let channel = match guild_id
        .create_channel(
            &ctx.ctx.http,
            CreateChannel::new(channel_name)
                .kind(ChannelType::Text)
                .category(category_id)
                .permissions(overwrites),
        )
        .await
    {
        Ok(channel) => channel,
        Err(err) => {
            error!("Could not create a ticket channel, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };

    let mention = format!("<@{}>", user.id);
    if let Err(err) = channel
        .send_message(
            &ctx.ctx.http,
            CreateMessage::new()
                .content(kind.greeting(&mention))
                .components(close_components()),
        )
        .await
    {
        error!("Could not send the ticket greeting, failed with error: {err}");
        return Err(ResponseError::Serenity(err));
    }

    ctx.reply(
        Response::new()
            .content(format!(
                "{mention}, your **{} Ticket** has been created: <#{}>",
                kind.label(),
                channel.id
            ))
            .ephemeral(true),
    )
    .await
}
