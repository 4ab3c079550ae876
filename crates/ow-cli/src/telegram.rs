//! `orderwatch telegram ...` subcommands.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use colored::Colorize;
use ow_notify::message::{test_change_message, test_no_change_message};
use ow_notify::{chat_ids, TelegramBot, TelegramConfig};
use ow_store::read_json;
use serde::Serialize;

use crate::cli::{Switch, TelegramAction, TelegramArgs};
use crate::config::WatchConfig;
use crate::output::Output;
use crate::prompt;

const SUCCESS_PROBE: &str = "✅ <b>Success!</b> This chat ID works correctly.";

pub async fn run(config: &WatchConfig, args: TelegramArgs, out: Output) -> anyhow::Result<()> {
    let path = config.telegram_path();
    match args.action.unwrap_or(TelegramAction::Show) {
        TelegramAction::Show => show(&path, out),
        TelegramAction::Setup => setup(&path, out).map(|_| ()),
        TelegramAction::Enable => update(&path, out, |c| c.enabled = true, "Notifications enabled"),
        TelegramAction::Disable => update(&path, out, |c| c.enabled = false, "Notifications disabled"),
        TelegramAction::AlwaysNotify { state } => {
            let raw = load_raw(&path)?;
            let on = match state {
                Some(Switch::On) => true,
                Some(Switch::Off) => false,
                None => !raw.always_notify,
            };
            let message = if on { "Always-notify turned on" } else { "Always-notify turned off" };
            update(&path, out, |c| c.always_notify = on, message)
        }
        TelegramAction::SetToken { token } => {
            update(&path, out, |c| c.bot_token = token.trim().to_string(), "Bot token updated")
        }
        TelegramAction::SetChat { chat_id } => {
            update(&path, out, |c| c.chat_id = chat_id.trim().to_string(), "Chat ID updated")
        }
        TelegramAction::Test => test(&path, out).await,
        TelegramAction::Chats => chats(&path, out).await,
    }
}

/// Stored configuration, complete or not.
fn load_raw(path: &Path) -> anyhow::Result<TelegramConfig> {
    match read_json::<TelegramConfig>(path).with_context(|| format!("reading {}", path.display()))? {
        Some(config) => Ok(config),
        None => bail!(
            "no Telegram configuration at {}; run `orderwatch telegram setup` first",
            path.display()
        ),
    }
}

fn update(
    path: &Path,
    out: Output,
    change: impl FnOnce(&mut TelegramConfig),
    message: &str,
) -> anyhow::Result<()> {
    let mut config = load_raw(path)?;
    change(&mut config);
    config.save(path).context("saving Telegram configuration")?;
    out.note(format!("{} {message}", "✓".green().bold()));
    Ok(())
}

#[derive(Serialize)]
struct ConfigView {
    bot_token: String,
    chat_id: String,
    enabled: bool,
    always_notify: bool,
}

fn show(path: &Path, out: Output) -> anyhow::Result<()> {
    let Some(config) = read_json::<TelegramConfig>(path)? else {
        out.note("No Telegram configuration found. Run `orderwatch telegram setup`.".yellow());
        return Ok(());
    };
    if out.is_json() {
        return out.json(&ConfigView {
            bot_token: config.masked_token(),
            chat_id: config.chat_id,
            enabled: config.enabled,
            always_notify: config.always_notify,
        });
    }
    let flag = |on: bool| if on { "yes".green() } else { "no".red() };
    println!("{}", "Telegram configuration".bold());
    println!("  Bot token:     {}", config.masked_token());
    println!("  Chat ID:       {}", config.chat_id);
    println!("  Enabled:       {}", flag(config.enabled));
    println!("  Always notify: {}", flag(config.always_notify));
    if !config.is_complete() {
        println!("{}", "  Bot token or chat ID is missing.".yellow());
    }
    Ok(())
}

/// Ask for credentials and save them. `None` when the user left a field
/// empty.
pub fn setup(path: &Path, out: Output) -> anyhow::Result<Option<TelegramConfig>> {
    if !prompt::is_interactive() {
        bail!("setup needs a terminal; use `telegram set-token` and `telegram set-chat` instead");
    }
    out.note("Create a bot with @BotFather, then message it once and run `orderwatch telegram chats` to find your chat ID.".dimmed());
    let token = prompt::input("Bot token")?;
    let chat_id = prompt::input("Chat ID")?;
    if token.is_empty() || chat_id.is_empty() {
        out.note("Bot token and chat ID are both required. Nothing saved.".yellow());
        return Ok(None);
    }
    let mut config = TelegramConfig::new(token, chat_id);
    config.always_notify = prompt::confirm("Send the order report on every run, even without changes?")?;
    config.save(path).context("saving Telegram configuration")?;
    out.note(format!("{} Telegram configuration saved to {}", "✓".green().bold(), path.display()));
    Ok(Some(config))
}

async fn test(path: &Path, out: Output) -> anyhow::Result<()> {
    let config = load_raw(path)?;
    if !config.is_complete() {
        bail!("bot token or chat ID is missing");
    }
    if !config.enabled {
        out.note("Notifications are disabled; sending the test anyway.".yellow());
    }
    let bot = TelegramBot::new(reqwest::Client::new(), &config.bot_token);
    bot.send_message(&config.chat_id, &test_change_message())
        .await
        .context("sending test change message")?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    bot.send_message(&config.chat_id, &test_no_change_message(config.always_notify))
        .await
        .context("sending test status message")?;
    out.note(format!("{} Test messages sent to chat {}", "✓".green().bold(), config.chat_id));
    Ok(())
}

async fn chats(path: &Path, out: Output) -> anyhow::Result<()> {
    let config = load_raw(path)?;
    if config.bot_token.trim().is_empty() {
        bail!("no bot token configured; run `orderwatch telegram set-token <token>`");
    }
    let bot = TelegramBot::new(reqwest::Client::new(), &config.bot_token);
    let me = bot.get_me().await.context("contacting the bot")?;
    out.note(format!(
        "Bot: {} (@{}, id {})",
        me.first_name.bold(),
        me.username.as_deref().unwrap_or("-"),
        me.id
    ));

    let updates = bot.get_updates(10).await.context("fetching bot updates")?;
    let ids = chat_ids(&updates);
    if out.is_json() {
        return out.json(&ids);
    }
    if ids.is_empty() {
        println!("{}", "No messages found.".yellow());
        println!("  1. Open Telegram and find your bot by its username.");
        println!("  2. Send it any message, e.g. /start.");
        println!("  3. Run this command again.");
        return Ok(());
    }

    println!("{}", "Chats that messaged the bot:".bold());
    for update in &updates {
        let Some(message) = &update.message else { continue };
        let chat = &message.chat;
        let name = chat.first_name.as_deref().or(chat.username.as_deref()).unwrap_or("-");
        println!("  {} {} ({}, {})", "-".blue(), chat.id.to_string().bold(), chat.kind, name);
    }
    for id in &ids {
        match bot.send_message(&id.to_string(), SUCCESS_PROBE).await {
            Ok(()) => println!("{} Probe message delivered to {id}", "✓".green()),
            Err(e) => println!("{} Could not message {id}: {e}", "✗".red()),
        }
    }
    Ok(())
}
