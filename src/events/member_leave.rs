use serenity::{
    all::{GuildId, User},
    prelude::Context,
};

use crate::database::settings::WelcomerDirection;
use crate::models::handler::Handler;

impl Handler {
    pub async fn on_member_leave(&self, ctx: Context, guild_id: GuildId, user: User) {
        let mention = format!("<@{}>", user.id);
        self.send_announcement(&ctx, guild_id, WelcomerDirection::Leave, &mention, &user.name)
            .await;
    }
}
