use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "orderwatch",
    about = "Order status watcher: fetch, compare, notify",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to orderwatch.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch orders, compare with the saved snapshot, and notify on changes
    Check(CheckArgs),
    /// Compare two saved snapshot files
    Diff(DiffArgs),
    /// Show order details from the saved snapshot
    Show(ShowArgs),
    /// Log in to the vendor account and save tokens
    Login(LoginArgs),
    /// Manage Telegram notifications
    Telegram(TelegramArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Save the snapshot on first run without asking
    #[arg(long)]
    pub save: bool,
    /// Skip notifications for this run
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Label for list elements in the report
    #[arg(long)]
    pub label: Option<String>,
    /// Pair list elements by this dotted key instead of by position
    #[arg(long)]
    pub match_by: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {}

#[derive(Args)]
pub struct LoginArgs {}

#[derive(Args)]
pub struct TelegramArgs {
    #[command(subcommand)]
    pub action: Option<TelegramAction>,
}

#[derive(Subcommand)]
pub enum TelegramAction {
    /// Show the current configuration
    Show,
    /// Interactively enter bot token and chat ID
    Setup,
    /// Turn notifications on
    Enable,
    /// Turn notifications off
    Disable,
    /// Send the status report even when nothing changed
    AlwaysNotify {
        /// Omit to toggle
        #[arg(value_enum)]
        state: Option<Switch>,
    },
    /// Replace the bot token
    SetToken { token: String },
    /// Replace the chat ID
    SetChat {
        /// Group chat IDs are negative
        #[arg(allow_hyphen_values = true)]
        chat_id: String,
    },
    /// Send sample notifications
    Test,
    /// List chats that recently messaged the bot
    Chats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Switch {
    On,
    Off,
}
