use serenity::{
    all::{GuildId, Member},
    builder::{CreateEmbed, CreateMessage},
    prelude::Context,
};
use tracing::error;

use crate::common::template::{render_template, TemplateContext};
use crate::database::settings::WelcomerDirection;
use crate::models::handler::Handler;

const WELCOME_COLOR: u32 = 0x78b159;
const LEAVE_COLOR: u32 = 0xdd2e44;

fn default_template(direction: WelcomerDirection) -> (&'static str, &'static str) {
    match direction {
        WelcomerDirection::Welcome => (
            "\u{1f44b} Welcome to {server}!",
            "{user} Welcome to **{server}**! You are member #{member_count}.",
        ),
        WelcomerDirection::Leave => (
            "\u{1f44b} Goodbye",
            "**{user_name}** has left **{server}**.",
        ),
    }
}

impl Handler {
    pub async fn on_member_join(&self, ctx: Context, member: Member) {
        let mention = format!("<@{}>", member.user.id);
        self.send_announcement(
            &ctx,
            member.guild_id,
            WelcomerDirection::Welcome,
            &mention,
            &member.user.name,
        )
        .await;
    }

    /// Renders the configured (or default) announcement for one direction
    /// into the configured channel. An unset channel is a silent no-op.
    pub(super) async fn send_announcement(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        direction: WelcomerDirection,
        mention: &str,
        user_name: &str,
    ) {
        let Some(channel_id) = self.settings.channel(guild_id, direction) else {
            return;
        };

        let cached = {
            ctx.cache
                .guild(guild_id)
                .map(|guild| (guild.name.clone(), guild.member_count))
        };
        let (server, member_count) = match cached {
            Some(counts) => counts,
            None => match guild_id.to_partial_guild(&ctx.http).await {
                Ok(guild) => (guild.name, guild.approximate_member_count.unwrap_or_default()),
                Err(err) => {
                    error!("Could not resolve guild {guild_id}, failed with error: {err}");
                    return;
                }
            },
        };

        let template_context = TemplateContext {
            mention,
            user_name,
            server: &server,
            member_count,
        };

        let custom = self.settings.custom_message(guild_id, direction);
        let (title, description, image) = match &custom {
            Some(message) => (
                message.title.as_str(),
                message.description.as_str(),
                message.image.clone(),
            ),
            None => {
                let (title, description) = default_template(direction);
                (title, description, None)
            }
        };

        let mut embed = CreateEmbed::new()
            .title(render_template(title, &template_context))
            .description(render_template(description, &template_context))
            .color(match direction {
                WelcomerDirection::Welcome => WELCOME_COLOR,
                WelcomerDirection::Leave => LEAVE_COLOR,
            });
        // A bad image URL would fail the whole send; skip it instead.
        if let Some(image) = image.filter(|url| url.starts_with("http")) {
            embed = embed.image(image);
        }

        if let Err(err) = channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed))
            .await
        {
            error!(
                "Could not send a {direction} announcement in guild {guild_id}, failed with error: {err}"
            );
        }
    }
}
