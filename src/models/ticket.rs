use std::collections::HashSet;
use std::sync::Mutex;

use serenity::all::ChannelId;
use strum::{Display, EnumString};

/// Category that ticket channels are created under, made on first use.
pub const TICKET_CATEGORY_NAME: &str = "TICKETS";
/// Channel that archived transcripts are posted to, made on first use.
pub const LOG_CHANNEL_NAME: &str = "ticket-logs";

/// The two ticket flavours. The string form doubles as the panel button
/// custom-id and the created channel's name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TicketKind {
    Support,
    Purchase,
}

impl TicketKind {
    pub fn label(&self) -> &'static str {
        match self {
            TicketKind::Support => "Support",
            TicketKind::Purchase => "Purchase",
        }
    }

    pub fn greeting(&self, mention: &str) -> String {
        match self {
            TicketKind::Support => format!(
                "{mention} \u{1f3ab} Support Ticket has been created! An admin will assist you shortly."
            ),
            TicketKind::Purchase => format!(
                "{mention} \u{1f6d2} Purchase Ticket has been created! Please describe what you'd like to buy."
            ),
        }
    }
}

/// Tracks channels that are mid-close so a second close press cannot start a
/// duplicate archival or race the delete.
#[derive(Default)]
pub struct ClosingGuard {
    closing: Mutex<HashSet<ChannelId>>,
}

impl ClosingGuard {
    /// Marks the channel as closing. Returns false when it already was.
    pub fn begin(&self, channel_id: ChannelId) -> bool {
        self.closing.lock().unwrap().insert(channel_id)
    }

    pub fn finish(&self, channel_id: ChannelId) {
        self.closing.lock().unwrap().remove(&channel_id);
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn kind_string_forms_match_button_ids() {
        assert_eq!(TicketKind::Support.to_string(), "support");
        assert_eq!(TicketKind::Purchase.to_string(), "purchase");
        assert_eq!(TicketKind::from_str("support").unwrap(), TicketKind::Support);
        assert_eq!(
            TicketKind::from_str("purchase").unwrap(),
            TicketKind::Purchase
        );
        assert!(TicketKind::from_str("close_ticket").is_err());
    }

    #[test]
    fn closing_guard_rejects_double_close() {
        let guard = ClosingGuard::default();
        let channel = ChannelId::new(1);

        assert!(guard.begin(channel));
        assert!(!guard.begin(channel));

        guard.finish(channel);
        assert!(guard.begin(channel));
    }
}
