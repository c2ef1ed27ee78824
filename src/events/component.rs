use std::str::FromStr;

use serenity::{all::ComponentInteraction, prelude::Context};
use tracing::error;

use crate::commands::{giveaway::interaction::enter_giveaway, ticket};
use crate::common::reply::error_embed;
use crate::models::{
    command::{InteractionContext, InteractionContextReply},
    handler::Handler,
    response::{Response, ResponseError},
    ticket::TicketKind,
};

/// What a button's custom-id resolves to. Identifiers that match nothing are
/// ignored outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    OpenTicket(TicketKind),
    CloseTicket,
    EnterGiveaway(String),
}

pub fn parse_custom_id(custom_id: &str) -> Option<ComponentAction> {
    if let Ok(kind) = TicketKind::from_str(custom_id) {
        return Some(ComponentAction::OpenTicket(kind));
    }
    if custom_id == "close_ticket" {
        return Some(ComponentAction::CloseTicket);
    }
    custom_id
        .strip_prefix("enter_giveaway_")
        .map(|id| ComponentAction::EnterGiveaway(id.to_string()))
}

impl Handler {
    pub async fn on_component(&self, ctx: Context, interaction: ComponentInteraction) {
        let Some(action) = parse_custom_id(&interaction.data.custom_id) else {
            return;
        };
        let interaction_context = InteractionContext::new(ctx, interaction);

        let result = match action {
            ComponentAction::OpenTicket(kind) => {
                ticket::open::open_ticket(&interaction_context, kind).await
            }
            ComponentAction::CloseTicket => {
                ticket::close::close_ticket(self, &interaction_context).await
            }
            ComponentAction::EnterGiveaway(giveaway_id) => {
                enter_giveaway(self, &interaction_context, &giveaway_id).await
            }
        };

        if let Err(err) = result {
            let response = match err {
                ResponseError::Execution(title, hint) => {
                    Response::new().embed(error_embed(title, hint)).ephemeral(true)
                }
                ResponseError::Serenity(err) => {
                    error!(
                        "Failed to handle component {}: {:?}",
                        interaction_context.interaction.data.custom_id, err
                    );
                    Response::new()
                        .embed(error_embed(
                            "Something went wrong",
                            Some("Please try again later.".to_string()),
                        ))
                        .ephemeral(true)
                }
            };
            if let Err(err) = interaction_context.reply(response).await {
                error!("Failed to report a component failure: {:?}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_ticket_buttons() {
        assert_eq!(
            parse_custom_id("support"),
            Some(ComponentAction::OpenTicket(TicketKind::Support))
        );
        assert_eq!(
            parse_custom_id("purchase"),
            Some(ComponentAction::OpenTicket(TicketKind::Purchase))
        );
        assert_eq!(
            parse_custom_id("close_ticket"),
            Some(ComponentAction::CloseTicket)
        );
    }

    #[test]
    fn routes_entry_buttons_by_prefix() {
        assert_eq!(
            parse_custom_id("enter_giveaway_2a-657b0e80"),
            Some(ComponentAction::EnterGiveaway("2a-657b0e80".to_string()))
        );
    }

    #[test]
    fn ignores_unknown_identifiers() {
        assert_eq!(parse_custom_id("unrelated_button"), None);
        assert_eq!(parse_custom_id(""), None);
    }
}
