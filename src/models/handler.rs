use std::sync::Arc;

use crate::database::settings::SettingsStore;

use super::{giveaway::GiveawayStore, ticket::ClosingGuard};

/// Process-wide bot state, shared with every event handler and spawned task.
#[derive(Clone)]
pub struct Handler {
    pub giveaways: Arc<GiveawayStore>,
    pub settings: Arc<SettingsStore>,
    pub closing_tickets: Arc<ClosingGuard>,
}
