//! Game configuration.
//!
//! Read from `config.toml` in the wairewolves configuration directory
//! (`~/.config/wairewolves/config.toml` on Linux). Every field has a
//! default, so a missing file or a partial file is fine.

use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "wairewolves";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Placeholder replaced by the seat name in [`GameConfig::persona`].
pub const SEAT_NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Minimum number of seats before `Start` is accepted
    pub min_players: usize,
    /// Interval of the agent seats' periodic tick, in seconds
    pub agent_tick_secs: u64,
    /// Prefix of the werewolves' secret channel name
    pub secret_channel_prefix: String,
    /// System prompt given to every agent seat; `{name}` is the seat name
    pub persona: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 4,
            agent_tick_secs: 60,
            secret_channel_prefix: "WerewolvesOnly_".to_string(),
            persona: default_persona(),
        }
    }
}

fn default_persona() -> String {
    "You are a player of the famous card game 'The Werewolves of Millers Hollow'. \
     You will play together with the werewolves team or with the villagers team, \
     depending on the card you get. \
     Be curious, be funny, make jokes. \
     Your name is {name}. \
     Do not use more than five sentences in your responses!"
        .to_string()
}

impl GameConfig {
    /// Loads the configuration from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No game config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GameError::internal(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            GameError::internal(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path()?)
    }

    pub fn agent_tick(&self) -> Duration {
        Duration::from_secs(self.agent_tick_secs.max(1))
    }

    /// Name of the secret channel for the game called `session_name`.
    pub fn secret_channel_name(&self, session_name: &str) -> String {
        format!("{}{}", self.secret_channel_prefix, session_name)
    }

    /// The persona prompt for one agent seat.
    pub fn persona_for(&self, seat: &str) -> String {
        self.persona.replace(SEAT_NAME_PLACEHOLDER, seat)
    }
}

/// Returns the path of the configuration file: `<config_dir>/wairewolves/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| GameError::internal("Could not determine configuration directory"))?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
