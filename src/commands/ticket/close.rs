use std::time::Duration;

use serenity::{
    all::{ChannelId, ChannelType, GuildId, Message, MessageId, Timestamp},
    builder::{CreateAttachment, CreateChannel, CreateEmbed, CreateMessage, GetMessages},
};
use tracing::{error, info};

use crate::common::transcript::{render_transcript, TranscriptEntry};
use crate::models::{
    command::{InteractionContext, InteractionContextReply},
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
    ticket::LOG_CHANNEL_NAME,
};

use super::EMBED_COLOR;

/// Grace period between the countdown notice and the channel delete.
const DELETE_GRACE: Duration = Duration::from_secs(5);

const HISTORY_PAGE: u8 = 100;

/// Closes a ticket: archives its transcript to the log channel, then deletes
/// the channel after the grace delay. The closing guard makes a second press
/// a rejection instead of a duplicate archival or a delete race, and any
/// failure before the transcript is posted leaves the channel in place.
pub async fn close_ticket(handler: &Handler, ctx: &InteractionContext) -> ResponseResult {
    let channel_id = ctx.interaction.channel_id;
    let Some(guild_id) = ctx.interaction.guild_id else {
        return Err(ResponseError::Execution(
            "Tickets can only be closed in a server",
            None,
        ));
    };

    if !handler.closing_tickets.begin(channel_id) {
        return Err(ResponseError::Execution(
            "This ticket is already being closed",
            None,
        ));
    }

    let result = archive_and_delete(ctx, guild_id, channel_id).await;
    handler.closing_tickets.finish(channel_id);
    result
}

async fn archive_and_delete(
    ctx: &InteractionContext,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> ResponseResult {
    // Reading a long history can outlast the interaction response deadline.
    ctx.defer().await?;

    let history = fetch_full_history(ctx, channel_id).await?;
    let entries = history
        .iter()
        .map(|message| TranscriptEntry {
            sent_at: *message.timestamp,
            author: message.author.tag(),
            content: message.content.clone(),
        })
        .collect::<Vec<_>>();
    let transcript = render_transcript(&entries);

    let channels = match guild_id.channels(&ctx.ctx.http).await {
        Ok(channels) => channels,
        Err(err) => {
            error!("Could not list guild channels, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };
    let channel_name = channels
        .get(&channel_id)
        .map_or_else(|| channel_id.to_string(), |channel| channel.name.clone());

    let log_channel_id = match channels
        .values()
        .find(|channel| channel.kind == ChannelType::Text && channel.name == LOG_CHANNEL_NAME)
        .map(|channel| channel.id)
    {
        Some(id) => id,
        None => match guild_id
            .create_channel(
                &ctx.ctx.http,
                CreateChannel::new(LOG_CHANNEL_NAME).kind(ChannelType::Text),
            )
            .await
        {
            Ok(channel) => channel.id,
            Err(err) => {
                error!("Could not create the ticket log channel, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        },
    };

    // The channel must never be deleted without the transcript having been
    // posted; everything up to here aborts the close on failure.
    if let Err(err) = log_channel_id
        .send_message(
            &ctx.ctx.http,
            CreateMessage::new()
                .embed(
                    CreateEmbed::new()
                        .title("\u{1f3ab} Ticket archived")
                        .description(format!(
                            "Ticket **#{channel_name}** was closed by <@{}>.",
                            ctx.interaction.user.id
                        ))
                        .color(EMBED_COLOR)
                        .timestamp(Timestamp::now()),
                )
                .add_file(CreateAttachment::bytes(
                    transcript.into_bytes(),
                    format!("transcript-{channel_name}.txt"),
                )),
        )
        .await
    {
        error!("Could not post the ticket transcript, failed with error: {err}");
        return Err(ResponseError::Serenity(err));
    }

    ctx.reply(
        Response::new()
            .content("\u{1f512} Closing ticket in 5 seconds...".to_string())
            .ephemeral(true),
    )
    .await?;
    if let Err(err) = channel_id
        .say(&ctx.ctx.http, "This ticket will be deleted in **5 seconds**...")
        .await
    {
        // The transcript is archived; a missing countdown does not stop the close.
        error!("Could not post the close countdown, failed with error: {err}");
    }

    tokio::time::sleep(DELETE_GRACE).await;
    if let Err(err) = channel_id.delete(&ctx.ctx.http).await {
        // The channel may already be gone by the time the delay elapses.
        info!("Ticket channel {channel_id} could not be deleted after the grace delay: {err}");
    }

    Ok(())
}

/// Pulls the channel's entire message history, oldest first.
async fn fetch_full_history(
    ctx: &InteractionContext,
    channel_id: ChannelId,
) -> Result<Vec<Message>, ResponseError> {
    let mut history: Vec<Message> = vec![];
    let mut before: Option<MessageId> = None;

    loop {
        let mut request = GetMessages::new().limit(HISTORY_PAGE);
        if let Some(before_id) = before {
            request = request.before(before_id);
        }
        let batch = match channel_id.messages(&ctx.ctx.http, request).await {
            Ok(batch) => batch,
            Err(err) => {
                error!("Could not read the ticket history, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        };

        // Batches arrive newest first; the last entry anchors the next page.
        let Some(oldest) = batch.last() else {
            break;
        };
        before = Some(oldest.id);
        let is_final_page = batch.len() < usize::from(HISTORY_PAGE);
        history.extend(batch);
        if is_final_page {
            break;
        }
    }

    history.reverse();
    Ok(history)
}
