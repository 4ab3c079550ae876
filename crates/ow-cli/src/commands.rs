use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use ow_api::{fetch_detailed_orders, OwnerApiClient};
use ow_diff::{render_changes, ChangeRecord, DiffEngine, DiffResult, ListMatching, ReportLine};
use ow_notify::{change_message, status_report, NoOpNotifier, Notifier, TelegramConfig, TelegramNotifier};
use ow_store::{read_json, FileSnapshotStore, SnapshotStore};
use ow_types::{Document, OrderSummary};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{CheckArgs, Cli, Command, DiffArgs};
use crate::config::WatchConfig;
use crate::output::Output;
use crate::{prompt, session, telegram};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = WatchConfig::load(cli.config.as_deref())?;
    let out = Output::new(cli.format);
    match cli.command {
        Command::Check(args) => cmd_check(&config, args, out).await,
        Command::Diff(args) => cmd_diff(&config, args, out),
        Command::Show(_) => cmd_show(&config, out),
        Command::Login(_) => session::run_login(&config, &reqwest::Client::new(), out).await,
        Command::Telegram(args) => telegram::run(&config, args, out).await,
    }
}

/// Outcome of comparing a fresh snapshot with the saved one.
#[derive(Debug, PartialEq, Eq)]
enum Comparison {
    FirstRun,
    Unchanged,
    Changed(DiffResult),
}

impl Comparison {
    fn label(&self) -> &'static str {
        match self {
            Self::FirstRun => "first_run",
            Self::Unchanged => "unchanged",
            Self::Changed(_) => "changed",
        }
    }

    fn changes(&self) -> &[ChangeRecord] {
        match self {
            Self::Changed(result) => &result.changes,
            _ => &[],
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    status: &'static str,
    saved: bool,
    changes: &'a [ChangeRecord],
    orders: &'a [OrderSummary],
}

fn compare(store: &dyn SnapshotStore, engine: &DiffEngine, fresh: &Document) -> anyhow::Result<Comparison> {
    let Some(previous) = store.load().context("loading saved orders")? else {
        return Ok(Comparison::FirstRun);
    };
    let result = engine
        .diff(&previous, fresh)
        .context("comparing with the saved orders")?;
    Ok(if result.is_empty() {
        Comparison::Unchanged
    } else {
        Comparison::Changed(result)
    })
}

/// Message to send for this run, if any.
fn notification(
    comparison: &Comparison,
    lines: &[ReportLine],
    orders: &[OrderSummary],
    always_notify: bool,
    max_lines: usize,
    now: NaiveDateTime,
) -> Option<String> {
    match comparison {
        Comparison::Changed(_) => Some(change_message(lines, orders.len(), max_lines, now)),
        Comparison::Unchanged if always_notify => Some(status_report(orders, now)),
        _ => None,
    }
}

/// Bot settings that apply to this run: complete, enabled, and not
/// silenced with `--no-notify`.
fn active_telegram(config: Option<TelegramConfig>, no_notify: bool) -> Option<TelegramConfig> {
    config.filter(|c| !no_notify && c.is_active())
}

/// Telegram when active, otherwise a notifier that drops every message.
fn select_notifier(http: reqwest::Client, active: Option<&TelegramConfig>) -> Box<dyn Notifier> {
    match active {
        Some(tg) => Box::new(TelegramNotifier::from_config(http, tg)),
        None => Box::new(NoOpNotifier),
    }
}

/// Delivery failures are reported but never fail the run.
async fn deliver(notifier: &dyn Notifier, message: &str, out: Output) -> bool {
    match notifier.notify(message).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "notification failed");
            out.note(format!("{} Failed to send notification: {e}", "✗".red()));
            false
        }
    }
}

async fn cmd_check(config: &WatchConfig, args: CheckArgs, out: Output) -> anyhow::Result<()> {
    let interactive = prompt::is_interactive();
    let http = reqwest::Client::new();

    let telegram_path = config.telegram_path();
    let mut telegram_config = TelegramConfig::load(&telegram_path);
    if telegram_config.is_none()
        && !args.no_notify
        && interactive
        && !telegram_path.exists()
        && prompt::confirm("Would you like to set up Telegram notifications?")?
    {
        telegram_config = telegram::setup(&telegram_path, out)?;
    }

    out.note("> Start retrieving the information. Please be patient...".blue());
    let token = session::access_token(config, &http, out, interactive).await?;
    let client = OwnerApiClient::new(http.clone(), token).with_locale(config.locale());
    let orders = fetch_detailed_orders(&client).await.context("fetching orders")?;
    let fresh = Document::Sequence(orders);
    let summaries = OrderSummary::from_snapshot(&fresh).context("reading fetched orders")?;
    info!(orders = summaries.len(), "orders fetched");

    let store = FileSnapshotStore::new(config.orders_path());
    let engine = config.diff_engine();
    let comparison = compare(&store, &engine, &fresh)?;
    let lines = match &comparison {
        Comparison::Changed(result) => render_changes(result, engine.item_label()),
        _ => Vec::new(),
    };

    let saved = match &comparison {
        Comparison::FirstRun => {
            let save = args.save
                || (interactive && prompt::confirm("Save the order information for future comparison?")?);
            if save {
                store.save(&fresh).context("saving orders")?;
                out.note(format!("{} Orders saved to {}", "✓".green(), store.path().display()));
            } else {
                out.note("Orders not saved.".dimmed());
            }
            save
        }
        Comparison::Unchanged => {
            out.note("No differences found.".green());
            false
        }
        Comparison::Changed(_) => {
            out.note("Differences found:".bold());
            if !out.is_json() {
                out.changes(&lines);
            }
            store.save(&fresh).context("saving orders")?;
            true
        }
    };

    let active = active_telegram(telegram_config, args.no_notify);
    let always_notify = active.as_ref().is_some_and(|tg| tg.always_notify);
    let notifier = select_notifier(http, active.as_ref());
    let now = Local::now().naive_local();
    if let Some(message) =
        notification(&comparison, &lines, &summaries, always_notify, config.max_listed_changes, now)
    {
        if deliver(notifier.as_ref(), &message, out).await && active.is_some() {
            out.note(format!("{} Notification sent", "✓".green()));
        }
    }

    if out.is_json() {
        return out.json(&CheckReport {
            status: comparison.label(),
            saved,
            changes: comparison.changes(),
            orders: &summaries,
        });
    }
    out.orders(&summaries);
    Ok(())
}

fn read_snapshot(path: &Path) -> anyhow::Result<Document> {
    read_json::<Document>(path)
        .with_context(|| format!("reading {}", path.display()))?
        .with_context(|| format!("{} does not exist", path.display()))
}

fn cmd_diff(config: &WatchConfig, args: DiffArgs, out: Output) -> anyhow::Result<()> {
    let old = read_snapshot(&args.old)?;
    let new = read_snapshot(&args.new)?;

    let mut engine = config.diff_engine();
    if let Some(label) = args.label {
        engine = engine.with_item_label(label);
    }
    if let Some(key) = args.match_by {
        engine = engine.with_list_matching(ListMatching::ByKey(key));
    }

    let result = engine.diff(&old, &new).context("comparing snapshots")?;
    if out.is_json() {
        return out.json(&result);
    }
    if result.is_empty() {
        println!("No differences found.");
    } else {
        out.changes(&render_changes(&result, engine.item_label()));
    }
    Ok(())
}

fn cmd_show(config: &WatchConfig, out: Output) -> anyhow::Result<()> {
    let store = FileSnapshotStore::new(config.orders_path());
    let Some(snapshot) = store.load().context("loading saved orders")? else {
        out.note("No saved orders. Run `orderwatch check --save` first.".yellow());
        return Ok(());
    };
    let summaries = OrderSummary::from_snapshot(&snapshot).context("reading saved orders")?;
    if out.is_json() {
        return out.json(&summaries);
    }
    out.orders(&summaries);
    Ok(())
}
