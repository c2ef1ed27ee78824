use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use rand::prelude::SliceRandom;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};
use time::OffsetDateTime;
use tokio::task::AbortHandle;

/// Marker rendered into every giveaway embed footer so a giveaway can be
/// identified from its message alone, even after the live record is gone.
pub const ID_FOOTER_PREFIX: &str = "Giveaway ID: ";
pub const ENDED_TITLE_SUFFIX: &str = "(ended)";
pub const REROLLED_TITLE_SUFFIX: &str = "(rerolled)";

/// Ended giveaways kept around for rerolls. Oldest records are evicted first.
const ENDED_ARCHIVE_CAP: usize = 50;

#[derive(Debug, Clone)]
pub struct Giveaway {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub winner_count: u32,
    pub end_time: OffsetDateTime,
    pub participants: HashSet<UserId>,
    pub channel_id: ChannelId,
    pub message_id: Option<MessageId>,
    pub host_id: UserId,
}

#[derive(Debug, Clone)]
pub struct EndedGiveaway {
    pub winner_count: u32,
    pub participants: HashSet<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawayError {
    InvalidWinnerCount,
    InvalidDuration,
    NotFound,
    Expired,
    AlreadyEntered,
    NotEnded,
    NoParticipants,
}

impl GiveawayError {
    pub fn message(&self) -> &'static str {
        match self {
            GiveawayError::InvalidWinnerCount => "A giveaway needs at least one winner",
            GiveawayError::InvalidDuration => "A giveaway must run for at least one minute",
            GiveawayError::NotFound => "This giveaway could not be found",
            GiveawayError::Expired => "This giveaway has already ended",
            GiveawayError::AlreadyEntered => "You've already entered this giveaway",
            GiveawayError::NotEnded => "This giveaway has not ended yet",
            GiveawayError::NoParticipants => {
                "No participants could be recovered for this giveaway"
            }
        }
    }
}

/// Owns every live giveaway in the process. State lives behind mutexes that
/// are only held for synchronous map access; callers render from the
/// snapshots these methods return. Nothing here survives a restart, and a
/// restart also drops the scheduled expiry tasks — a persistence layer would
/// have to rebuild them on load.
#[derive(Default)]
pub struct GiveawayStore {
    active: Mutex<HashMap<String, Giveaway>>,
    ended: Mutex<Vec<(String, EndedGiveaway)>>,
    expiry_tasks: Mutex<HashMap<String, AbortHandle>>,
}

impl GiveawayStore {
    pub fn create(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        host_id: UserId,
        title: String,
        description: Option<String>,
        duration_minutes: i64,
        winner_count: i64,
        now: OffsetDateTime,
    ) -> Result<Giveaway, GiveawayError> {
        if winner_count < 1 {
            return Err(GiveawayError::InvalidWinnerCount);
        }
        if duration_minutes < 1 {
            return Err(GiveawayError::InvalidDuration);
        }

        let mut active = self.active.lock().unwrap();

        // Ids are keyed on guild and creation instant; bump the instant when
        // two giveaways land on the same second.
        let mut stamp = now.unix_timestamp();
        let mut id = format!("{:x}-{:x}", guild_id.get(), stamp);
        while active.contains_key(&id) {
            stamp += 1;
            id = format!("{:x}-{:x}", guild_id.get(), stamp);
        }

        let giveaway = Giveaway {
            id: id.clone(),
            title,
            description,
            winner_count: u32::try_from(winner_count).unwrap_or(u32::MAX),
            end_time: now + time::Duration::minutes(duration_minutes),
            participants: HashSet::new(),
            channel_id,
            message_id: None,
            host_id,
        };
        active.insert(id, giveaway.clone());
        Ok(giveaway)
    }

    /// The announcement message id only exists once the message has been
    /// posted, so it is attached in a second step.
    pub fn bind_message(&self, id: &str, message_id: MessageId) {
        if let Some(giveaway) = self.active.lock().unwrap().get_mut(id) {
            giveaway.message_id = Some(message_id);
        }
    }

    /// Discards a giveaway whose announcement could not be posted.
    pub fn discard(&self, id: &str) {
        self.active.lock().unwrap().remove(id);
    }

    /// Keeps the expiry task's abort handle so a future "end early" operation
    /// has a cancellation path. Nothing calls abort today.
    pub fn retain_expiry(&self, id: &str, handle: AbortHandle) {
        self.expiry_tasks
            .lock()
            .unwrap()
            .insert(id.to_string(), handle);
    }

    pub fn enter(
        &self,
        id: &str,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<Giveaway, GiveawayError> {
        let mut active = self.active.lock().unwrap();
        let Some(giveaway) = active.get_mut(id) else {
            return Err(GiveawayError::NotFound);
        };
        // Entries can race the expiry timer; anything at or past the end time
        // is rejected even when the timer has not fired yet.
        if now >= giveaway.end_time {
            return Err(GiveawayError::Expired);
        }
        if !giveaway.participants.insert(user_id) {
            return Err(GiveawayError::AlreadyEntered);
        }
        Ok(giveaway.clone())
    }

    /// Removes the giveaway from the active set and returns it for the
    /// terminal render. Returns `None` when the id is already gone, which
    /// makes a duplicate timer firing a no-op.
    pub fn take_expired(&self, id: &str) -> Option<Giveaway> {
        let giveaway = self.active.lock().unwrap().remove(id)?;
        self.expiry_tasks.lock().unwrap().remove(id);
        Some(giveaway)
    }

    /// Records the final participant set of an ended giveaway so rerolls draw
    /// from the exact entrants instead of reconstructing from reactions.
    pub fn archive_ended(&self, giveaway: &Giveaway) {
        let mut ended = self.ended.lock().unwrap();
        ended.push((
            giveaway.id.clone(),
            EndedGiveaway {
                winner_count: giveaway.winner_count,
                participants: giveaway.participants.clone(),
            },
        ));
        if ended.len() > ENDED_ARCHIVE_CAP {
            ended.remove(0);
        }
    }

    pub fn ended_record(&self, id: &str) -> Option<EndedGiveaway> {
        self.ended
            .lock()
            .unwrap()
            .iter()
            .find(|(ended_id, _)| ended_id == id)
            .map(|(_, record)| record.clone())
    }
}

/// Uniform sample without replacement, clamped to the participant count.
pub fn draw_winners(participants: &HashSet<UserId>, winner_count: u32) -> Vec<UserId> {
    let pool = participants.iter().copied().collect::<Vec<_>>();
    let count = pool.len().min(winner_count as usize);
    pool.choose_multiple(&mut rand::thread_rng(), count)
        .copied()
        .collect()
}

pub fn footer_id(footer_text: &str) -> Option<&str> {
    footer_text.strip_prefix(ID_FOOTER_PREFIX)
}

pub fn is_ended_title(title: &str) -> bool {
    title.ends_with(ENDED_TITLE_SUFFIX) || title.ends_with(REROLLED_TITLE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(unix: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(unix).unwrap()
    }

    fn create_at(store: &GiveawayStore, now: OffsetDateTime) -> Giveaway {
        store
            .create(
                GuildId::new(1),
                ChannelId::new(2),
                UserId::new(3),
                "Nitro".to_string(),
                None,
                10,
                2,
                now,
            )
            .unwrap()
    }

    #[test]
    fn create_rejects_invalid_arguments() {
        let store = GiveawayStore::default();
        let result = store.create(
            GuildId::new(1),
            ChannelId::new(2),
            UserId::new(3),
            "Nitro".to_string(),
            None,
            10,
            0,
            instant(1_000),
        );
        assert_eq!(result.unwrap_err(), GiveawayError::InvalidWinnerCount);

        let result = store.create(
            GuildId::new(1),
            ChannelId::new(2),
            UserId::new(3),
            "Nitro".to_string(),
            None,
            0,
            1,
            instant(1_000),
        );
        assert_eq!(result.unwrap_err(), GiveawayError::InvalidDuration);
    }

    #[test]
    fn same_second_creations_get_distinct_ids() {
        let store = GiveawayStore::default();
        let first = create_at(&store, instant(1_000));
        let second = create_at(&store, instant(1_000));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn entry_is_idempotent() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        let user = UserId::new(42);

        let snapshot = store.enter(&giveaway.id, user, instant(1_010)).unwrap();
        assert_eq!(snapshot.participants.len(), 1);

        let result = store.enter(&giveaway.id, user, instant(1_020));
        assert_eq!(result.unwrap_err(), GiveawayError::AlreadyEntered);

        let taken = store.take_expired(&giveaway.id).unwrap();
        assert_eq!(taken.participants.len(), 1);
    }

    #[test]
    fn entry_after_end_time_is_rejected_without_mutation() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        let past_end = giveaway.end_time + time::Duration::seconds(1);

        let result = store.enter(&giveaway.id, UserId::new(42), past_end);
        assert_eq!(result.unwrap_err(), GiveawayError::Expired);

        let taken = store.take_expired(&giveaway.id).unwrap();
        assert!(taken.participants.is_empty());
    }

    #[test]
    fn entry_after_expiry_is_not_found() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        store.take_expired(&giveaway.id).unwrap();

        let result = store.enter(&giveaway.id, UserId::new(42), instant(1_010));
        assert_eq!(result.unwrap_err(), GiveawayError::NotFound);
    }

    #[test]
    fn duplicate_expiry_is_a_noop() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        assert!(store.take_expired(&giveaway.id).is_some());
        assert!(store.take_expired(&giveaway.id).is_none());
        assert!(store.take_expired("missing").is_none());
    }

    #[test]
    fn draw_clamps_to_participant_count() {
        let participants = (1..=5).map(UserId::new).collect::<HashSet<_>>();

        let winners = draw_winners(&participants, 2);
        assert_eq!(winners.len(), 2);
        assert!(winners.iter().all(|winner| participants.contains(winner)));

        let winners = draw_winners(&participants, 10);
        assert_eq!(winners.len(), 5);

        let mut distinct = winners.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), winners.len());
    }

    #[test]
    fn draw_with_no_participants_is_empty() {
        assert!(draw_winners(&HashSet::new(), 2).is_empty());
    }

    #[test]
    fn single_winner_comes_from_the_entrants() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        let a = UserId::new(10);
        let b = UserId::new(11);
        store.enter(&giveaway.id, a, instant(1_010)).unwrap();
        store.enter(&giveaway.id, b, instant(1_020)).unwrap();

        let taken = store.take_expired(&giveaway.id).unwrap();
        let winners = draw_winners(&taken.participants, 1);
        assert_eq!(winners.len(), 1);
        assert!(winners[0] == a || winners[0] == b);
    }

    #[test]
    fn ended_archive_round_trips_participants() {
        let store = GiveawayStore::default();
        let giveaway = create_at(&store, instant(1_000));
        store
            .enter(&giveaway.id, UserId::new(42), instant(1_010))
            .unwrap();

        let taken = store.take_expired(&giveaway.id).unwrap();
        store.archive_ended(&taken);

        let record = store.ended_record(&giveaway.id).unwrap();
        assert_eq!(record.participants, taken.participants);
        assert_eq!(record.winner_count, 2);
        assert!(store.ended_record("missing").is_none());
    }

    #[test]
    fn footer_markers_parse_back_out() {
        let footer = format!("{ID_FOOTER_PREFIX}abc-123");
        assert_eq!(footer_id(&footer), Some("abc-123"));
        assert_eq!(footer_id("unrelated footer"), None);

        assert!(is_ended_title("Nitro giveaway (ended)"));
        assert!(is_ended_title("Nitro giveaway (rerolled)"));
        assert!(!is_ended_title("Nitro giveaway"));
    }
}
