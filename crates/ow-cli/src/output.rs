use std::fmt::Display;

use colored::{ColoredString, Colorize};
use ow_diff::{LineKind, ReportLine};
use ow_types::OrderSummary;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Routes human output by format: in JSON mode stdout carries only the
/// JSON document and progress notes go to stderr.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn note(&self, message: impl Display) {
        if self.is_json() {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn changes(&self, lines: &[ReportLine]) {
        for line in lines {
            println!("{}", colored_line(line));
        }
    }

    pub fn orders(&self, orders: &[OrderSummary]) {
        for order in orders {
            print_order(order);
        }
    }
}

pub fn colored_line(line: &ReportLine) -> ColoredString {
    match line.kind {
        LineKind::Removed => line.to_string().red(),
        LineKind::Added => line.to_string().green(),
    }
}

fn print_order(order: &OrderSummary) {
    let rule = "-".repeat(45);
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".into());

    println!();
    println!("{rule}");
    println!("{}", "ORDER INFORMATION".bold());
    println!("{rule}");

    println!("{}", "Order Details:".bold());
    println!("{} {}", "- Order ID:".blue(), order.reference_number);
    println!("{} {}", "- Status:".blue(), field(&order.status));
    println!("{} {}", "- Model:".blue(), field(&order.model));
    println!("{} {}", "- VIN:".blue(), field(&order.vin));

    println!();
    println!("{}", "Reservation Details:".bold());
    println!("{} {}", "- Reservation Date:".blue(), field(&order.reservation_date));
    println!("{} {}", "- Order Booked Date:".blue(), field(&order.order_booked_date));

    println!();
    println!("{}", "Vehicle Status:".bold());
    let odometer = match (&order.odometer, &order.odometer_type) {
        (Some(value), Some(unit)) => format!("{value} {unit}"),
        (Some(value), None) => value.clone(),
        _ => "N/A".into(),
    };
    println!("{} {}", "- Vehicle Odometer:".blue(), odometer);

    println!();
    println!("{}", "Delivery Information:".bold());
    println!("{} {}", "- Routing Location:".blue(), field(&order.routing_location));
    println!("{} {}", "- Delivery Window:".blue(), field(&order.delivery_window));
    println!("{} {}", "- ETA to Delivery Center:".blue(), field(&order.eta_to_delivery_center));
    println!("{} {}", "- Delivery Appointment Date:".blue(), field(&order.delivery_appointment));
    println!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ow_diff::{render_changes, ChangePath, ChangeRecord, DiffResult};
    use serde_json::json;

    #[test]
    fn colored_line_keeps_text() {
        colored::control::set_override(false);
        let result = DiffResult {
            changes: vec![ChangeRecord::ValueChanged {
                path: ChangePath::root().item("Order", 0).key("status"),
                old: json!("BOOKED").into(),
                new: json!("DELIVERED").into(),
            }],
        };
        let lines = render_changes(&result, "Order");
        let rendered: Vec<String> = lines.iter().map(|l| colored_line(l).to_string()).collect();
        assert_eq!(rendered, vec!["- Order 0.status: BOOKED", "+ Order 0.status: DELIVERED"]);
    }

    #[test]
    fn json_mode_flag() {
        assert!(Output::new(OutputFormat::Json).is_json());
        assert!(!Output::new(OutputFormat::Text).is_json());
    }
}
