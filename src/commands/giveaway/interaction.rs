use serenity::builder::{CreateEmbed, EditMessage};
use time::OffsetDateTime;
use tracing::error;

use crate::common::reply::error_embed;
use crate::models::{
    command::{InteractionContext, InteractionContextReply},
    handler::Handler,
    response::{Response, ResponseResult},
};

use super::new::{announcement_embed, entry_components};

const ENTERED_COLOR: u32 = 0x00ff00;

/// Handles a press of the announcement's entry button. Every outcome is
/// answered ephemerally; a rejected entry is information for the presser, not
/// a failure.
pub async fn enter_giveaway(
    handler: &Handler,
    ctx: &InteractionContext,
    giveaway_id: &str,
) -> ResponseResult {
    let giveaway = match handler.giveaways.enter(
        giveaway_id,
        ctx.interaction.user.id,
        OffsetDateTime::now_utc(),
    ) {
        Ok(giveaway) => giveaway,
        Err(err) => {
            return ctx
                .reply(
                    Response::new()
                        .embed(error_embed(err.message(), None))
                        .ephemeral(true),
                )
                .await;
        }
    };

    ctx.reply(
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("You're in the running!")
                    .description("You've entered this giveaway. Good luck!")
                    .color(ENTERED_COLOR),
            )
            .ephemeral(true),
    )
    .await?;

    // Refresh the announcement's entry count. The entry already counts even
    // if this render fails, so the failure is only logged.
    let Some(message_id) = giveaway.message_id else {
        return Ok(());
    };
    match ctx
        .ctx
        .http
        .get_message(giveaway.channel_id, message_id)
        .await
    {
        Ok(mut message) => {
            if let Err(err) = message
                .edit(
                    &ctx.ctx.http,
                    EditMessage::new()
                        .embed(announcement_embed(&giveaway))
                        .components(entry_components(&giveaway.id)),
                )
                .await
            {
                error!(
                    "Could not update announcement for giveaway {}, failed with error: {err}",
                    giveaway.id
                );
            }
        }
        Err(err) => {
            error!(
                "Could not get announcement for giveaway {}, failed with error: {err}",
                giveaway.id
            );
        }
    }

    Ok(())
}
