//! Notification layer for orderwatch.
//!
//! Turns rendered change lines into chat messages and delivers them through
//! a [`Notifier`]. The bundled transport is a small Telegram Bot API client.

pub mod config;
pub mod error;
pub mod message;
pub mod notifier;
pub mod telegram;

pub use config::{TelegramConfig, TELEGRAM_CONFIG_FILE};
pub use error::{NotifyError, NotifyResult};
pub use message::{change_message, escape_html, status_report, MAX_LISTED_CHANGES};
pub use notifier::{NoOpNotifier, Notifier};
pub use telegram::{chat_ids, BotUser, Chat, TelegramBot, TelegramNotifier, Update};
