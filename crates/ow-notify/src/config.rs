use std::path::Path;

use ow_store::{read_json, write_json, JsonStyle};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::NotifyResult;

/// Default file name of the bot configuration.
pub const TELEGRAM_CONFIG_FILE: &str = "telegram_config.json";

/// Bot credentials and delivery preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chat_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Send the full status report even when nothing changed.
    #[serde(default)]
    pub always_notify: bool,
}

fn default_enabled() -> bool {
    true
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            enabled: true,
            always_notify: false,
        }
    }

    /// Both credentials are present.
    pub fn is_complete(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }

    /// Complete and switched on.
    pub fn is_active(&self) -> bool {
        self.enabled && self.is_complete()
    }

    /// First 20 characters of the token, for display.
    pub fn masked_token(&self) -> String {
        let prefix: String = self.bot_token.chars().take(20).collect();
        format!("{prefix}...")
    }

    /// Load the configuration.
    ///
    /// A missing file, unreadable JSON, or empty credentials all mean "not
    /// configured" and yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        match read_json::<Self>(path) {
            Ok(Some(config)) if config.is_complete() => Some(config),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable bot configuration");
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> NotifyResult<()> {
        write_json(path, self, JsonStyle::Pretty)?;
        Ok(())
    }
}
