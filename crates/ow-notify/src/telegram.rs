//! Minimal Telegram Bot API client.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::notifier::Notifier;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Every Bot API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self, method: &str) -> NotifyResult<T> {
        if !self.ok {
            return Err(NotifyError::Api {
                method: method.to_string(),
                description: self.description.unwrap_or_else(|| "unknown error".into()),
            });
        }
        self.result
            .ok_or_else(|| NotifyError::EmptyResult(method.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Serialize)]
struct GetUpdates {
    limit: u32,
}

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl TelegramBot {
    pub fn new(http: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base.trim_end_matches('/'), self.token, method)
    }

    async fn call<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> NotifyResult<T> {
        debug!(method, "calling bot API");
        let envelope = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?
            .json::<Envelope<T>>()
            .await?;
        envelope.into_result(method)
    }

    /// Send an HTML-formatted message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> NotifyResult<()> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        info!(chat_id, "message sent");
        Ok(())
    }

    pub async fn get_me(&self) -> NotifyResult<BotUser> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// The most recent updates the bot has received.
    pub async fn get_updates(&self, limit: u32) -> NotifyResult<Vec<Update>> {
        self.call("getUpdates", &GetUpdates { limit }).await
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// Distinct chat ids seen in `updates`, ascending.
pub fn chat_ids(updates: &[Update]) -> Vec<i64> {
    updates
        .iter()
        .filter_map(|u| u.message.as_ref())
        .map(|m| m.chat.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Delivers notifications to one chat.
#[derive(Clone, Debug)]
pub struct TelegramNotifier {
    bot: TelegramBot,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot: TelegramBot, chat_id: impl Into<String>) -> Self {
        Self {
            bot,
            chat_id: chat_id.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &TelegramConfig) -> Self {
        Self::new(TelegramBot::new(http, &config.bot_token), &config.chat_id)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> NotifyResult<()> {
        self.bot.send_message(&self.chat_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_url_embeds_token() {
        let bot = TelegramBot::new(reqwest::Client::new(), "123:abc").with_api_base("http://localhost:8081/");
        assert_eq!(bot.method_url("getMe"), "http://localhost:8081/bot123:abc/getMe");
    }

    #[test]
    fn debug_hides_token() {
        let bot = TelegramBot::new(reqwest::Client::new(), "secret-token");
        assert!(!format!("{bot:?}").contains("secret-token"));
    }

    #[test]
    fn envelope_success() {
        let envelope: Envelope<BotUser> = serde_json::from_value(json!({
            "ok": true,
            "result": {"id": 7, "is_bot": true, "first_name": "Watcher", "username": "watch_bot"}
        }))
        .unwrap();
        let user = envelope.into_result("getMe").unwrap();
        assert_eq!(user.username.as_deref(), Some("watch_bot"));
    }

    #[test]
    fn envelope_failure_carries_description() {
        let envelope: Envelope<BotUser> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }))
        .unwrap();
        match envelope.into_result("getMe") {
            Err(NotifyError::Api { method, description }) => {
                assert_eq!(method, "getMe");
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn chat_ids_are_distinct_and_sorted() {
        let updates: Vec<Update> = serde_json::from_value(json!([
            {"update_id": 1, "message": {"chat": {"id": 50, "type": "private", "first_name": "A"}, "text": "hi"}},
            {"update_id": 2, "message": {"chat": {"id": -10, "type": "group"}}},
            {"update_id": 3},
            {"update_id": 4, "message": {"chat": {"id": 50, "type": "private"}, "text": "again"}}
        ]))
        .unwrap();
        assert_eq!(chat_ids(&updates), vec![-10, 50]);
        assert_eq!(updates[1].message.as_ref().unwrap().chat.kind, "group");
    }

    #[test]
    fn notifier_from_config() {
        let config = TelegramConfig::new("tok", "99");
        let notifier = TelegramNotifier::from_config(reqwest::Client::new(), &config);
        assert_eq!(notifier.chat_id, "99");
    }
}
