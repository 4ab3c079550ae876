//! Change records produced by the structural diff engine.

use std::borrow::Cow;
use std::fmt;

use ow_types::Document;
use serde::{Serialize, Serializer};

/// One step from a parent node to a child node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A key inside a mapping.
    Key(String),
    /// An element of a top-level document list, e.g. `Order 0` or
    /// `Order RN1234` when lists are matched by identity.
    Item { label: String, locator: String },
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Item { label, locator } => write!(f, "{label} {}", display_locator(locator)),
        }
    }
}

/// A list-element locator as shown to users.
///
/// Locators that could be misread inside a dotted path (empty, or holding
/// `.`, whitespace, or quotes) are printed quoted and escaped.
pub fn display_locator(locator: &str) -> Cow<'_, str> {
    let ambiguous = locator.is_empty()
        || locator
            .chars()
            .any(|c| c == '.' || c == '"' || c == '\'' || c.is_whitespace());
    if ambiguous {
        Cow::Owned(format!("{locator:?}"))
    } else {
        Cow::Borrowed(locator)
    }
}

/// Location of a change inside a document tree.
///
/// Segments are kept structured so keys containing `.` stay unambiguous; the
/// display form joins them with `.`, e.g. `Order 0.tasks.scheduling`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangePath(Vec<PathSegment>);

impl ChangePath {
    /// The empty path (document root).
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathSegment::Key(key.into()))
    }

    /// This path extended by a list element.
    pub fn item(&self, label: impl Into<String>, locator: impl ToString) -> Self {
        self.with(PathSegment::Item {
            label: label.into(),
            locator: locator.to_string(),
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for ChangePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for ChangePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single detected difference between two documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// A key present in the old mapping is gone from the new one.
    KeyRemoved { path: ChangePath },
    /// A key appeared that the old mapping did not have.
    KeyAdded { path: ChangePath, value: Document },
    /// A key exists on both sides with unequal, non-recursed values.
    ValueChanged {
        path: ChangePath,
        old: Document,
        new: Document,
    },
    /// An element of the old top-level list has no counterpart.
    ///
    /// `index` is the position in the old list. `locator` is the element's
    /// identity when lists are matched by key.
    ItemRemoved {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        locator: Option<String>,
    },
    /// An element of the new top-level list has no counterpart.
    ItemAdded {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        locator: Option<String>,
    },
}

impl ChangeRecord {
    /// The key path for key-level records; `None` for list-level records.
    pub fn path(&self) -> Option<&ChangePath> {
        match self {
            Self::KeyRemoved { path }
            | Self::KeyAdded { path, .. }
            | Self::ValueChanged { path, .. } => Some(path),
            Self::ItemRemoved { .. } | Self::ItemAdded { .. } => None,
        }
    }

    pub fn is_addition(&self) -> bool {
        matches!(self, Self::KeyAdded { .. } | Self::ItemAdded { .. })
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Self::KeyRemoved { .. } | Self::ItemRemoved { .. })
    }

    pub fn is_modification(&self) -> bool {
        matches!(self, Self::ValueChanged { .. })
    }
}

/// Ordered change records from one comparison.
///
/// Records stay in generation order; nothing re-sorts them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
    /// The detected changes, in generation order.
    pub changes: Vec<ChangeRecord>,
}

impl DiffResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.changes.iter()
    }

    /// Number of added keys and items.
    pub fn additions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_addition()).count()
    }

    /// Number of removed keys and items.
    pub fn removals(&self) -> usize {
        self.changes.iter().filter(|c| c.is_removal()).count()
    }

    /// Number of changed values.
    pub fn modifications(&self) -> usize {
        self.changes.iter().filter(|c| c.is_modification()).count()
    }

    pub(crate) fn push(&mut self, record: ChangeRecord) {
        self.changes.push(record);
    }

    pub(crate) fn append(&mut self, other: DiffResult) {
        self.changes.extend(other.changes);
    }
}

impl IntoIterator for DiffResult {
    type Item = ChangeRecord;
    type IntoIter = std::vec::IntoIter<ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_display_joins_segments() {
        let path = ChangePath::root()
            .item("Order", 0)
            .key("tasks")
            .key("scheduling")
            .key("deliveryWindowDisplay");
        assert_eq!(path.to_string(), "Order 0.tasks.scheduling.deliveryWindowDisplay");
        assert_eq!(path.segments().len(), 4);
    }

    #[test]
    fn path_extension_leaves_parent_untouched() {
        let parent = ChangePath::root().key("x");
        let child = parent.key("y");
        assert_eq!(parent.to_string(), "x");
        assert_eq!(child.to_string(), "x.y");
        assert_eq!(child.last(), Some(&PathSegment::Key("y".into())));
    }

    #[test]
    fn keys_with_dots_stay_single_segments() {
        let path = ChangePath::root().key("a.b");
        assert_eq!(path.segments(), &[PathSegment::Key("a.b".into())]);
    }

    #[test]
    fn ambiguous_locators_are_quoted() {
        let path = ChangePath::root().item("Order", "a.b").key("status");
        assert_eq!(path.to_string(), "Order \"a.b\".status");
        assert_eq!(ChangePath::root().item("Order", "RN 1").to_string(), "Order \"RN 1\"");
        assert_eq!(ChangePath::root().item("Order", "").to_string(), "Order \"\"");
        assert_eq!(ChangePath::root().item("Order", "RN1").to_string(), "Order RN1");
        assert_eq!(display_locator("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn root_path() {
        assert!(ChangePath::root().is_root());
        assert_eq!(ChangePath::root().to_string(), "<root>");
    }

    #[test]
    fn record_classification() {
        let removed = ChangeRecord::KeyRemoved { path: ChangePath::root().key("a") };
        let added = ChangeRecord::ItemAdded { index: 2, locator: None };
        let changed = ChangeRecord::ValueChanged {
            path: ChangePath::root().key("b"),
            old: json!(1).into(),
            new: json!(2).into(),
        };
        assert!(removed.is_removal());
        assert!(added.is_addition());
        assert!(changed.is_modification());
        assert_eq!(added.path(), None);
        assert_eq!(changed.path().map(ToString::to_string).as_deref(), Some("b"));

        let result = DiffResult { changes: vec![removed, added, changed] };
        assert_eq!(result.len(), 3);
        assert_eq!((result.additions(), result.removals(), result.modifications()), (1, 1, 1));
    }

    #[test]
    fn records_serialize_with_dotted_paths() {
        let record = ChangeRecord::ValueChanged {
            path: ChangePath::root().item("Order", 1).key("status"),
            old: json!("BOOKED").into(),
            new: json!("DELIVERED").into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"kind": "value_changed", "path": "Order 1.status", "old": "BOOKED", "new": "DELIVERED"})
        );

        let list = DiffResult { changes: vec![ChangeRecord::ItemRemoved { index: 3, locator: None }] };
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!([{"kind": "item_removed", "index": 3}])
        );

        let keyed = ChangeRecord::ItemAdded { index: 0, locator: Some("RN1".into()) };
        assert_eq!(
            serde_json::to_value(&keyed).unwrap(),
            json!({"kind": "item_added", "index": 0, "locator": "RN1"})
        );
    }
}
