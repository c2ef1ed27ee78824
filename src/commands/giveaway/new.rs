use std::time::Duration;

use pretty_duration::pretty_duration;
use serenity::{
    all::{ButtonStyle, CommandInteraction},
    builder::{
        CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter, CreateMessage,
    },
};
use time::OffsetDateTime;
use tracing::error;

use crate::models::{
    command::{CommandContext, CommandContextReply},
    giveaway::{Giveaway, ID_FOOTER_PREFIX},
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};
use crate::common::options::Options;

use super::{end::expire_giveaway, ACTIVE_COLOR};

pub fn announcement_embed(giveaway: &Giveaway) -> CreateEmbed {
    let status = format!(
        "Winners: {}\nEntries: {}\n\nGiveaway ends at <t:{}:F>",
        giveaway.winner_count,
        giveaway.participants.len(),
        giveaway.end_time.unix_timestamp()
    );
    CreateEmbed::new()
        .title(format!("{} giveaway", giveaway.title))
        .description(match &giveaway.description {
            Some(description) => format!("{description}\n\n{status}"),
            None => status,
        })
        .color(ACTIVE_COLOR)
        .footer(CreateEmbedFooter::new(format!(
            "{ID_FOOTER_PREFIX}{}",
            giveaway.id
        )))
}

pub fn entry_components(giveaway_id: &str) -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![CreateButton::new(format!(
        "enter_giveaway_{giveaway_id}"
    ))
    .label("\u{1f389} Enter")
    .style(ButtonStyle::Primary)])]
}

pub async fn new(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(prize) = options.get_string("prize").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway prize",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let Some(duration_minutes) = options.get_integer("duration") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway duration",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let description = options.get_string("description").into_owned();
    let winner_count = options.get_integer("winners").unwrap_or(1);

    let giveaway = match handler.giveaways.create(
        ctx.guild.id,
        cmd.channel_id,
        cmd.user.id,
        prize,
        description,
        duration_minutes,
        winner_count,
        OffsetDateTime::now_utc(),
    ) {
        Ok(giveaway) => giveaway,
        Err(err) => return Err(ResponseError::Execution(err.message(), None)),
    };

    let message = match cmd
        .channel_id
        .send_message(
            &ctx.ctx.http,
            CreateMessage::new()
                .embed(announcement_embed(&giveaway))
                .components(entry_components(&giveaway.id)),
        )
        .await
    {
        Ok(message) => message,
        Err(err) => {
            error!(
                "Could not post announcement for giveaway {}, failed with error: {err}",
                giveaway.id
            );
            handler.giveaways.discard(&giveaway.id);
            return Err(ResponseError::Serenity(err));
        }
    };
    handler.giveaways.bind_message(&giveaway.id, message.id);

    // Fire-and-forget expiry. The abort handle is kept by the store; there is
    // no early-end path today, and a restart loses the timer with the rest of
    // the giveaway state.
    let task_handler = handler.clone();
    let task_ctx = ctx.ctx.clone();
    let giveaway_id = giveaway.id.clone();
    let sleep = Duration::from_secs(duration_minutes as u64 * 60);
    let task = tokio::spawn(async move {
        tokio::time::sleep(sleep).await;
        expire_giveaway(&task_handler, &task_ctx, &giveaway_id).await;
    });
    handler
        .giveaways
        .retain_expiry(&giveaway.id, task.abort_handle());

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Giveaway started")
                    .description(format!(
                        "**{}** is running for {} and ends <t:{}:R>.",
                        giveaway.title,
                        pretty_duration(&sleep, None),
                        giveaway.end_time.unix_timestamp()
                    ))
                    .color(ACTIVE_COLOR),
            )
            .ephemeral(true),
    )
    .await
}
