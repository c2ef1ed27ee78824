use std::collections::HashSet;

use serenity::{
    all::{CommandInteraction, Message, ReactionType, UserId},
    builder::{CreateEmbed, CreateEmbedFooter, EditMessage, GetMessages},
};
use tracing::error;

use crate::common::options::Options;
use crate::models::{
    command::{CommandContext, CommandContextReply},
    giveaway::{
        draw_winners, footer_id, is_ended_title, GiveawayError, ENDED_TITLE_SUFFIX,
        ID_FOOTER_PREFIX, REROLLED_TITLE_SUFFIX,
    },
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

use super::{end::mention_list, ENDED_COLOR};

/// How far back the channel is scanned for the ended announcement.
const SCAN_WINDOW: u8 = 100;

fn rerolled_title(rendered_title: &str) -> String {
    match rendered_title.strip_suffix(ENDED_TITLE_SUFFIX) {
        Some(base) => format!("{base}{REROLLED_TITLE_SUFFIX}"),
        None => rendered_title.to_string(),
    }
}

fn matches_giveaway(message: &Message, giveaway_id: &str) -> bool {
    message
        .embeds
        .first()
        .and_then(|embed| embed.footer.as_ref())
        .and_then(|footer| footer_id(&footer.text))
        .is_some_and(|id| id == giveaway_id)
}

/// Entrant reconstruction for announcements whose ended record is gone, e.g.
/// after a restart. Button-only entries leave no reactions, so this can
/// legitimately come up empty for a giveaway that had many participants.
async fn reaction_entrants(
    ctx: &CommandContext,
    message: &Message,
) -> Result<HashSet<UserId>, ResponseError> {
    let users = match message
        .reaction_users(
            &ctx.ctx.http,
            ReactionType::Unicode("\u{1f389}".to_string()),
            Some(SCAN_WINDOW),
            None,
        )
        .await
    {
        Ok(users) => users,
        Err(err) => {
            error!("Could not enumerate giveaway reactions, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };
    Ok(users
        .into_iter()
        .filter(|user| !user.bot)
        .map(|user| user.id)
        .collect())
}

/// Rerolls an ended giveaway from its rendered announcement. The live record
/// is gone by the time this runs; identification goes through the embed
/// footer and the ended marker in the title.
pub async fn reroll(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(giveaway_id) = options.get_string("id").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway ID",
            Some("Please use the ID shown in the giveaway's footer".to_string()),
        ));
    };

    let recent = match cmd
        .channel_id
        .messages(&ctx.ctx.http, GetMessages::new().limit(SCAN_WINDOW))
        .await
    {
        Ok(messages) => messages,
        Err(err) => {
            error!("Could not scan channel history for a reroll, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };

    let Some(mut message) = recent
        .into_iter()
        .find(|message| matches_giveaway(message, &giveaway_id))
    else {
        return Err(ResponseError::Execution(
            GiveawayError::NotFound.message(),
            Some("Rerolls only find giveaways announced in this channel recently".to_string()),
        ));
    };

    let rendered_title = message
        .embeds
        .first()
        .and_then(|embed| embed.title.clone())
        .unwrap_or_default();
    if !is_ended_title(&rendered_title) {
        return Err(ResponseError::Execution(
            GiveawayError::NotEnded.message(),
            None,
        ));
    }

    let record = handler.giveaways.ended_record(&giveaway_id);
    let participants = match &record {
        Some(record) if !record.participants.is_empty() => record.participants.clone(),
        _ => reaction_entrants(ctx, &message).await?,
    };
    if participants.is_empty() {
        return Err(ResponseError::Execution(
            GiveawayError::NoParticipants.message(),
            None,
        ));
    }

    let winner_count = match options.get_integer("winners") {
        Some(count) => count,
        None => record.map_or(1, |record| i64::from(record.winner_count)),
    };
    if winner_count < 1 {
        return Err(ResponseError::Execution(
            GiveawayError::InvalidWinnerCount.message(),
            None,
        ));
    }
    let winners = draw_winners(&participants, u32::try_from(winner_count).unwrap_or(u32::MAX));
    let mentions = mention_list(&winners);

    let embed = CreateEmbed::new()
        .title(rerolled_title(&rendered_title))
        .description(format!(
            "Rerolled by <@{}>.\n\nWinners: {mentions}\nEntries: {}",
            cmd.user.id,
            participants.len()
        ))
        .color(ENDED_COLOR)
        .footer(CreateEmbedFooter::new(format!(
            "{ID_FOOTER_PREFIX}{giveaway_id}"
        )));
    if let Err(err) = message
        .edit(&ctx.ctx.http, EditMessage::new().embed(embed))
        .await
    {
        error!("Could not update announcement for reroll {giveaway_id}, failed with error: {err}");
        return Err(ResponseError::Serenity(err));
    }

    if let Err(err) = message
        .reply(
            &ctx.ctx.http,
            format!("\u{1f3b2} The giveaway was rerolled! Congratulations to {mentions}!"),
        )
        .await
    {
        error!("Could not announce reroll winners for {giveaway_id}, failed with error: {err}");
        return Err(ResponseError::Serenity(err));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(CreateEmbed::new().title("Successfully rerolled giveaway"))
            .ephemeral(true),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerolled_title_swaps_the_ended_marker() {
        assert_eq!(
            rerolled_title("Nitro giveaway (ended)"),
            "Nitro giveaway (rerolled)"
        );
        assert_eq!(
            rerolled_title("Nitro giveaway (rerolled)"),
            "Nitro giveaway (rerolled)"
        );
    }
}
