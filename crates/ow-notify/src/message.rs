//! Chat message bodies (HTML parse mode).

use std::fmt::Write;

use chrono::NaiveDateTime;
use ow_diff::{truncate, LineKind, ReportLine};
use ow_types::OrderSummary;

/// Change lines listed before the rest is summarized as "N more".
pub const MAX_LISTED_CHANGES: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NOT_AVAILABLE: &str = "N/A";

/// Escape text for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Message announcing detected changes.
///
/// Lists at most `max_lines` lines and summarizes the remainder.
pub fn change_message(
    lines: &[ReportLine],
    order_count: usize,
    max_lines: usize,
    now: NaiveDateTime,
) -> String {
    let mut message = String::new();
    message.push_str("🚗 <b>Tesla Order Status Update</b>\n");
    let _ = writeln!(message, "📅 {}\n", now.format(TIMESTAMP_FORMAT));

    if order_count == 1 {
        message.push_str("📋 Detected changes in your Tesla order:\n\n");
    } else {
        message.push_str("📋 Detected changes in your Tesla orders:\n\n");
    }

    let (shown, remaining) = truncate(lines, max_lines);
    for line in shown {
        let marker = match line.kind {
            LineKind::Removed => "❌",
            LineKind::Added => "✅",
        };
        let _ = writeln!(message, "{marker} {}", escape_html(&line.text));
    }

    if remaining > 0 {
        let _ = write!(message, "\n... and {remaining} more changes");
    }

    message.push_str("\n\n🔄 Check your Tesla account for complete details.");
    message
}

/// Full per-order report, sent when nothing changed but the user asked to
/// hear from every run.
pub fn status_report(orders: &[OrderSummary], now: NaiveDateTime) -> String {
    let mut message = String::new();
    message.push_str("🚗 <b>Tesla Order Status Report</b>\n");
    let _ = writeln!(message, "📅 {}\n", now.format(TIMESTAMP_FORMAT));

    if orders.is_empty() {
        message.push_str("No orders found on this account.\n\n");
    }

    for (i, order) in orders.iter().enumerate() {
        let field = |value: &Option<String>| escape_html(value.as_deref().unwrap_or(NOT_AVAILABLE));
        let _ = writeln!(message, "<b>📋 Order {}</b>", i + 1);
        let _ = writeln!(message, "🔢 Order ID: <code>{}</code>", escape_html(&order.reference_number));
        let _ = writeln!(message, "📊 Status: <b>{}</b>", field(&order.status));
        let _ = writeln!(message, "🚙 Model: <b>{}</b>", field(&order.model));
        let _ = writeln!(message, "📅 Delivery Window: <b>{}</b>", field(&order.delivery_window));
        let _ = writeln!(message, "🚚 ETA to Delivery: <b>{}</b>", field(&order.eta_to_delivery_center));
        let _ = writeln!(message, "🏪 Delivery Location: <b>{}</b>\n", field(&order.routing_location));
    }

    message.push_str("<i>🔄 No changes since the last check.</i>");
    message
}

/// Sample change notification for `telegram test`.
pub fn test_change_message() -> String {
    "🧪 <b>Tesla Order Status Test</b>\n\n✅ <b>Change detected test:</b> This simulates a change notification! 🚀".to_string()
}

/// Sample no-change notification for `telegram test`.
pub fn test_no_change_message(always_notify: bool) -> String {
    if always_notify {
        "🧪 <b>Tesla Order Status Test</b>\n\n✅ <b>No changes test:</b> With always-notify on, every run sends the full order report. 📊".to_string()
    } else {
        "🧪 <b>Tesla Order Status Test</b>\n\n✅ <b>No changes test:</b> This simulates a 'no changes detected' notification! 📊".to_string()
    }
}
