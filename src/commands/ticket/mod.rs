use serenity::{
    all::{ButtonStyle, CommandInteraction, Permissions},
    builder::{CreateActionRow, CreateButton, CreateCommand, CreateEmbed},
};

use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    handler::Handler,
    response::{Response, ResponseResult},
};

pub mod close;
pub mod open;

pub const EMBED_COLOR: u32 = 0x5865f2;

pub fn close_components() -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![CreateButton::new(
        "close_ticket",
    )
    .label("\u{1f512} Close Ticket")
    .style(ButtonStyle::Secondary)])]
}

pub struct TicketPanelCommand;

#[async_trait::async_trait]
impl Command for TicketPanelCommand {
    fn name(&self) -> &'static str {
        "ticketpanel"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("ticketpanel")
            .description("Send the ticket creation panel")
            .default_member_permissions(Permissions::MANAGE_CHANNELS)
    }

    async fn router(
        &self,
        _handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult {
        ctx.reply(
            command,
            Response::new()
                .embed(
                    CreateEmbed::new()
                        .title("\u{1f3ab} Floh Official Ticket Hub")
                        .description(
                            "Need assistance or looking to make a purchase?\n\n\
                             \u{1f4d5} **Support Ticket** - For bot issues, bugs, questions.\n\
                             \u{1f6d2} **Purchase Ticket** - For purchases, pricing, or custom items.\n\n\
                             Click a button below to create your ticket.",
                        )
                        .color(EMBED_COLOR),
                )
                .components(vec![CreateActionRow::Buttons(vec![
                    CreateButton::new("support")
                        .label("\u{1f4d5} Support")
                        .style(ButtonStyle::Danger),
                    CreateButton::new("purchase")
                        .label("\u{1f6d2} Purchase")
                        .style(ButtonStyle::Success),
                ])]),
        )
        .await
    }
}
