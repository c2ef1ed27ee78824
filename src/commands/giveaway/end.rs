use serenity::{
    all::UserId,
    builder::{CreateEmbed, CreateEmbedFooter, EditMessage},
    prelude::Context,
};
use tracing::{error, warn};

use crate::models::{
    giveaway::{draw_winners, Giveaway, ENDED_TITLE_SUFFIX, ID_FOOTER_PREFIX},
    handler::Handler,
};

use super::ENDED_COLOR;

pub fn mention_list(winners: &[UserId]) -> String {
    winners
        .iter()
        .map(|winner| format!("<@{winner}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ended_embed(giveaway: &Giveaway, winners: &[UserId]) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("{} giveaway {ENDED_TITLE_SUFFIX}", giveaway.title))
        .description(if winners.is_empty() {
            "No one entered the giveaway.".to_string()
        } else {
            format!(
                "The giveaway is over, congratulations to the winners!\n\nWinners: {}\nEntries: {}",
                mention_list(winners),
                giveaway.participants.len()
            )
        })
        .color(ENDED_COLOR)
        .footer(CreateEmbedFooter::new(format!(
            "{ID_FOOTER_PREFIX}{}",
            giveaway.id
        )))
}

/// Invoked by the scheduled expiry task, never by a user action. Taking the
/// giveaway out of the active set happens before any platform call, so a
/// duplicate firing, or an entry racing the timer, finds nothing to act on.
pub async fn expire_giveaway(handler: &Handler, ctx: &Context, giveaway_id: &str) {
    let Some(giveaway) = handler.giveaways.take_expired(giveaway_id) else {
        return;
    };

    let winners = draw_winners(&giveaway.participants, giveaway.winner_count);
    handler.giveaways.archive_ended(&giveaway);

    let Some(message_id) = giveaway.message_id else {
        warn!("Giveaway {giveaway_id} expired without an announcement message");
        return;
    };
    let mut message = match ctx.http.get_message(giveaway.channel_id, message_id).await {
        Ok(message) => message,
        Err(err) => {
            error!("Could not get message for giveaway {giveaway_id}, failed with error: {err}");
            return;
        }
    };

    if let Err(err) = message
        .edit(
            &ctx.http,
            EditMessage::new()
                .embed(ended_embed(&giveaway, &winners))
                .components(vec![]),
        )
        .await
    {
        error!(
            "Could not update giveaway message to end giveaway {giveaway_id}, failed with error: {err}"
        );
        return;
    }

    if !winners.is_empty() {
        if let Err(err) = message
            .reply(
                &ctx.http,
                format!(
                    "Congratulations to {} for winning **{}**!",
                    mention_list(&winners),
                    giveaway.title
                ),
            )
            .await
        {
            error!(
                "Could not send winner message for giveaway {giveaway_id}, failed with error: {err}"
            );
        }
    }
}
