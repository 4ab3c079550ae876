//! Plain-text rendering of change records.
//!
//! Produces uncolored lines tagged with whether they describe the old or the
//! new side. Terminal colors and chat markup are applied by the caller.

use std::fmt;

use serde::Serialize;

use crate::change::{display_locator, ChangeRecord, DiffResult};

/// Which side of the comparison a line describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Removed keys, removed items, and old values.
    Removed,
    /// Added keys, added items, and new values.
    Added,
}

impl LineKind {
    pub fn marker(self) -> char {
        match self {
            Self::Removed => '-',
            Self::Added => '+',
        }
    }
}

/// One human-readable line of a change report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub kind: LineKind,
    pub text: String,
}

impl ReportLine {
    fn removed(text: String) -> Self {
        Self { kind: LineKind::Removed, text }
    }

    fn added(text: String) -> Self {
        Self { kind: LineKind::Added, text }
    }
}

/// `- text` or `+ text`.
impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.text)
    }
}

/// Render one record. Value changes produce two lines (old, then new).
///
/// `item_label` names list elements in item-level lines, e.g. `Order` gives
/// `Removed order 2`, or `Removed order RN1` when lists are matched by key.
pub fn render_record(record: &ChangeRecord, item_label: &str) -> Vec<ReportLine> {
    match record {
        ChangeRecord::KeyRemoved { path } => {
            vec![ReportLine::removed(format!("Removed key '{path}'"))]
        }
        ChangeRecord::KeyAdded { path, value } => {
            vec![ReportLine::added(format!("Added key '{path}': {value}"))]
        }
        ChangeRecord::ValueChanged { path, old, new } => vec![
            ReportLine::removed(format!("{path}: {old}")),
            ReportLine::added(format!("{path}: {new}")),
        ],
        ChangeRecord::ItemRemoved { index, locator } => vec![ReportLine::removed(format!(
            "Removed {} {}",
            item_label.to_lowercase(),
            item_name(*index, locator.as_deref())
        ))],
        ChangeRecord::ItemAdded { index, locator } => vec![ReportLine::added(format!(
            "Added {} {}",
            item_label.to_lowercase(),
            item_name(*index, locator.as_deref())
        ))],
    }
}

/// Identity when known, list position otherwise.
fn item_name(index: usize, locator: Option<&str>) -> String {
    match locator {
        Some(locator) => display_locator(locator).into_owned(),
        None => index.to_string(),
    }
}

/// Render a whole result, preserving record order.
pub fn render_changes(result: &DiffResult, item_label: &str) -> Vec<ReportLine> {
    result
        .iter()
        .flat_map(|record| render_record(record, item_label))
        .collect()
}

/// Split `lines` into the first `max` lines and the count left over.
pub fn truncate(lines: &[ReportLine], max: usize) -> (&[ReportLine], usize) {
    if lines.len() <= max {
        (lines, 0)
    } else {
        (&lines[..max], lines.len() - max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangePath;
    use serde_json::json;

    fn rendered(record: ChangeRecord) -> Vec<String> {
        render_record(&record, "Order").iter().map(ToString::to_string).collect()
    }

    #[test]
    fn key_records() {
        let path = ChangePath::root().item("Order", 0).key("vin");
        assert_eq!(
            rendered(ChangeRecord::KeyRemoved { path: path.clone() }),
            vec!["- Removed key 'Order 0.vin'"]
        );
        assert_eq!(
            rendered(ChangeRecord::KeyAdded { path, value: json!("5YJ3").into() }),
            vec!["+ Added key 'Order 0.vin': 5YJ3"]
        );
    }

    #[test]
    fn value_change_renders_old_then_new() {
        let record = ChangeRecord::ValueChanged {
            path: ChangePath::root().key("k"),
            old: json!([1, 2, 3]).into(),
            new: json!([1, 2, 4]).into(),
        };
        assert_eq!(rendered(record), vec!["- k: [1,2,3]", "+ k: [1,2,4]"]);
    }

    #[test]
    fn item_records_use_lowercase_label() {
        assert_eq!(rendered(ChangeRecord::ItemRemoved { index: 2, locator: None }), vec!["- Removed order 2"]);
        assert_eq!(rendered(ChangeRecord::ItemAdded { index: 0, locator: None }), vec!["+ Added order 0"]);
    }

    #[test]
    fn keyed_item_records_name_the_identity() {
        let removed = ChangeRecord::ItemRemoved { index: 0, locator: Some("RN1".into()) };
        assert_eq!(rendered(removed), vec!["- Removed order RN1"]);
        let added = ChangeRecord::ItemAdded { index: 3, locator: Some("a.b".into()) };
        assert_eq!(rendered(added), vec!["+ Added order \"a.b\""]);
    }

    #[test]
    fn keyed_diff_renders_identities_throughout() {
        use crate::engine::{DiffEngine, ListMatching};
        use ow_types::Document;

        let engine = DiffEngine::new()
            .with_item_label("Order")
            .with_list_matching(ListMatching::ByKey("id".into()));
        let old = Document::from(json!([{"id": "A", "s": 1}, {"id": "B", "s": 1}]));
        let new = Document::from(json!([{"id": "B", "s": 2}]));
        let result = engine.diff(&old, &new).unwrap();
        let lines: Vec<String> = render_changes(&result, engine.item_label())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, vec!["- Removed order A", "- Order B.s: 1", "+ Order B.s: 2"]);
    }

    #[test]
    fn render_changes_flattens_in_order() {
        let result = DiffResult {
            changes: vec![
                ChangeRecord::ValueChanged {
                    path: ChangePath::root().key("a"),
                    old: json!(1).into(),
                    new: json!(2).into(),
                },
                ChangeRecord::ItemAdded { index: 1, locator: None },
            ],
        };
        let lines = render_changes(&result, "Item");
        let kinds: Vec<LineKind> = lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Removed, LineKind::Added, LineKind::Added]);
        assert_eq!(lines[2].text, "Added item 1");
    }

    #[test]
    fn truncate_reports_remainder() {
        let lines: Vec<ReportLine> = (0..5).map(|i| ReportLine::added(format!("line {i}"))).collect();
        let (shown, rest) = truncate(&lines, 3);
        assert_eq!(shown.len(), 3);
        assert_eq!(rest, 2);

        let (shown, rest) = truncate(&lines, 10);
        assert_eq!(shown.len(), 5);
        assert_eq!(rest, 0);
    }
}
