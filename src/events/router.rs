use serenity::{
    all::{GuildId, Interaction, Member, User},
    model::prelude::Ready,
    prelude::{Context, EventHandler},
};

use crate::models::handler::Handler;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.on_ready(ctx, ready).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.on_command(ctx, command).await,
            Interaction::Component(component) => self.on_component(ctx, component).await,
            _ => {}
        }
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        self.on_member_join(ctx, member).await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.on_member_leave(ctx, guild_id, user).await;
    }
}
