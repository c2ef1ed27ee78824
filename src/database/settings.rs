use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, io};

use serde_derive::{Deserialize, Serialize};
use serenity::all::{ChannelId, GuildId};
use strum::{Display, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WelcomerDirection {
    Welcome,
    Leave,
}

/// Per-guild override for one direction's announcement embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomMessage {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WelcomerSettings {
    #[serde(default)]
    welcome_channels: HashMap<u64, u64>,
    #[serde(default)]
    leave_channels: HashMap<u64, u64>,
    #[serde(default)]
    custom_messages: HashMap<u64, HashMap<WelcomerDirection, CustomMessage>>,
}

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Serde(err)
    }
}

/// Welcomer configuration persisted as a single JSON document. The document
/// is read once at startup and rewritten in full on every mutation; there are
/// no partial writes and no durability guarantees beyond the write itself.
pub struct SettingsStore {
    path: PathBuf,
    data: Mutex<WelcomerSettings>,
}

impl SettingsStore {
    /// Loads the document at `path`. A missing file is the empty document; a
    /// file that exists but does not parse is an error.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No settings document at {}, starting empty", path.display());
                WelcomerSettings::default()
            }
            Err(err) => return Err(SettingsError::Io(err)),
        };
        Ok(SettingsStore {
            path,
            data: Mutex::new(data),
        })
    }

    fn save(&self, data: &WelcomerSettings) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    pub fn channel(&self, guild_id: GuildId, direction: WelcomerDirection) -> Option<ChannelId> {
        let data = self.data.lock().unwrap();
        let channels = match direction {
            WelcomerDirection::Welcome => &data.welcome_channels,
            WelcomerDirection::Leave => &data.leave_channels,
        };
        channels.get(&guild_id.get()).map(|id| ChannelId::new(*id))
    }

    pub fn set_channel(
        &self,
        guild_id: GuildId,
        direction: WelcomerDirection,
        channel_id: ChannelId,
    ) -> Result<(), SettingsError> {
        let mut data = self.data.lock().unwrap();
        let channels = match direction {
            WelcomerDirection::Welcome => &mut data.welcome_channels,
            WelcomerDirection::Leave => &mut data.leave_channels,
        };
        channels.insert(guild_id.get(), channel_id.get());
        self.save(&data)
    }

    pub fn custom_message(
        &self,
        guild_id: GuildId,
        direction: WelcomerDirection,
    ) -> Option<CustomMessage> {
        self.data
            .lock()
            .unwrap()
            .custom_messages
            .get(&guild_id.get())
            .and_then(|directions| directions.get(&direction))
            .cloned()
    }

    pub fn set_custom_message(
        &self,
        guild_id: GuildId,
        direction: WelcomerDirection,
        message: CustomMessage,
    ) -> Result<(), SettingsError> {
        let mut data = self.data.lock().unwrap();
        data.custom_messages
            .entry(guild_id.get())
            .or_default()
            .insert(direction, message);
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("floh-settings-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn absent_file_loads_as_empty() {
        let path = temp_path("absent");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::load(path).unwrap();
        assert!(store
            .channel(GuildId::new(1), WelcomerDirection::Welcome)
            .is_none());
        assert!(store
            .custom_message(GuildId::new(1), WelcomerDirection::Leave)
            .is_none());
    }

    #[test]
    fn set_channel_survives_reload() {
        let path = temp_path("reload");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::load(path.clone()).unwrap();
        store
            .set_channel(GuildId::new(7), WelcomerDirection::Welcome, ChannelId::new(99))
            .unwrap();

        let reloaded = SettingsStore::load(path.clone()).unwrap();
        assert_eq!(
            reloaded.channel(GuildId::new(7), WelcomerDirection::Welcome),
            Some(ChannelId::new(99))
        );
        assert!(reloaded
            .channel(GuildId::new(7), WelcomerDirection::Leave)
            .is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rewrite_preserves_unrelated_guilds() {
        let path = temp_path("rewrite");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::load(path.clone()).unwrap();
        store
            .set_channel(GuildId::new(1), WelcomerDirection::Leave, ChannelId::new(10))
            .unwrap();
        store
            .set_channel(GuildId::new(2), WelcomerDirection::Leave, ChannelId::new(20))
            .unwrap();

        let reloaded = SettingsStore::load(path.clone()).unwrap();
        assert_eq!(
            reloaded.channel(GuildId::new(1), WelcomerDirection::Leave),
            Some(ChannelId::new(10))
        );
        assert_eq!(
            reloaded.channel(GuildId::new(2), WelcomerDirection::Leave),
            Some(ChannelId::new(20))
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn custom_message_round_trips() {
        let path = temp_path("custom");
        let _ = fs::remove_file(&path);

        let store = SettingsStore::load(path.clone()).unwrap();
        store
            .set_custom_message(
                GuildId::new(3),
                WelcomerDirection::Welcome,
                CustomMessage {
                    title: "Hey {user_name}!".to_string(),
                    description: "Welcome to {server}".to_string(),
                    image: None,
                },
            )
            .unwrap();

        let reloaded = SettingsStore::load(path.clone()).unwrap();
        let message = reloaded
            .custom_message(GuildId::new(3), WelcomerDirection::Welcome)
            .unwrap();
        assert_eq!(message.title, "Hey {user_name}!");
        assert!(message.image.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SettingsStore::load(path.clone()),
            Err(SettingsError::Serde(_))
        ));

        let _ = fs::remove_file(&path);
    }
}
