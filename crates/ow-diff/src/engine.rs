//! Structural diff: compare two document trees and list what changed.
//!
//! Mappings are compared key by key and recursed into. Everything else,
//! sequences included, is compared atomically by deep equality. Top-level
//! document lists are aligned by position unless identity matching is
//! requested.

use ow_types::{Document, DocumentKind, Mapping};

use crate::change::{ChangePath, ChangeRecord, DiffResult};
use crate::error::{DiffError, EngineResult};

/// Label of positional segments when none is configured.
pub const DEFAULT_ITEM_LABEL: &str = "Item";

/// How elements of two top-level document lists are paired.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ListMatching {
    /// Element `i` of the old list is compared with element `i` of the new.
    #[default]
    Positional,
    /// Elements are paired by the value at this dotted key path
    /// (e.g. `order.referenceNumber`). Elements without it never pair.
    ByKey(String),
}

/// Configurable diff engine.
///
/// The engine holds no state between calls; one instance can be shared
/// freely across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffEngine {
    item_label: String,
    matching: ListMatching,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self {
            item_label: DEFAULT_ITEM_LABEL.to_string(),
            matching: ListMatching::Positional,
        }
    }
}

impl DiffEngine {
    /// Positional matching with the `Item` label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label used for list-element path segments, e.g. `Order` → `Order 0.status`.
    pub fn with_item_label(mut self, label: impl Into<String>) -> Self {
        self.item_label = label.into();
        self
    }

    pub fn with_list_matching(mut self, matching: ListMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn item_label(&self) -> &str {
        &self.item_label
    }

    pub fn list_matching(&self) -> &ListMatching {
        &self.matching
    }

    /// Compare two documents of the same top-level shape.
    ///
    /// Two mappings go through [`diff_mappings`] from the root; two sequences
    /// go through [`DiffEngine::diff_document_lists`]. Any other combination
    /// is a [`DiffError::TypeMismatch`].
    pub fn diff(&self, old: &Document, new: &Document) -> EngineResult<DiffResult> {
        match (old, new) {
            (Document::Mapping(old), Document::Mapping(new)) => {
                Ok(diff_mappings(old, new, &ChangePath::root()))
            }
            (Document::Sequence(old), Document::Sequence(new)) => {
                self.diff_document_lists(old, new)
            }
            (Document::Mapping(_) | Document::Sequence(_), other) => Err(DiffError::TypeMismatch {
                path: ChangePath::root(),
                expected: old.kind(),
                found: other.kind(),
            }),
            (Document::Scalar(_), _) => Err(DiffError::TypeMismatch {
                path: ChangePath::root(),
                expected: DocumentKind::Mapping,
                found: DocumentKind::Scalar,
            }),
        }
    }

    /// Compare two lists of mapping documents.
    pub fn diff_document_lists(
        &self,
        old: &[Document],
        new: &[Document],
    ) -> EngineResult<DiffResult> {
        match &self.matching {
            ListMatching::Positional => self.diff_positional(old, new),
            ListMatching::ByKey(key) => self.diff_keyed(old, new, key),
        }
    }

    fn diff_positional(&self, old: &[Document], new: &[Document]) -> EngineResult<DiffResult> {
        let mut result = DiffResult::new();

        for (index, old_item) in old.iter().enumerate() {
            match new.get(index) {
                Some(new_item) => {
                    let prefix = ChangePath::root().item(&self.item_label, index);
                    let (old_map, new_map) = both_mappings(old_item, new_item, &prefix)?;
                    result.append(diff_mappings(old_map, new_map, &prefix));
                }
                None => result.push(ChangeRecord::ItemRemoved { index, locator: None }),
            }
        }

        for index in old.len()..new.len() {
            result.push(ChangeRecord::ItemAdded { index, locator: None });
        }

        Ok(result)
    }

    fn diff_keyed(&self, old: &[Document], new: &[Document], key: &str) -> EngineResult<DiffResult> {
        // Identities compare as documents, so `1` and `"1"` never pair.
        // The first new element with an identity wins; later duplicates stay
        // unpaired.
        let new_ids: Vec<Option<&Document>> = new.iter().map(|doc| identity_at(doc, key)).collect();
        let first_with = |id: &Document| new_ids.iter().position(|candidate| *candidate == Some(id));

        let mut paired = vec![false; new.len()];
        let mut result = DiffResult::new();

        for (index, old_item) in old.iter().enumerate() {
            let id = identity_at(old_item, key);
            let counterpart = id.and_then(&first_with).filter(|&j| !paired[j]);

            match (id, counterpart) {
                (Some(id), Some(j)) => {
                    paired[j] = true;
                    let prefix = ChangePath::root().item(&self.item_label, id);
                    let (old_map, new_map) = both_mappings(old_item, &new[j], &prefix)?;
                    result.append(diff_mappings(old_map, new_map, &prefix));
                }
                _ => result.push(ChangeRecord::ItemRemoved {
                    index,
                    locator: id.map(Document::to_string),
                }),
            }
        }

        for (index, was_paired) in paired.iter().enumerate() {
            if !was_paired {
                result.push(ChangeRecord::ItemAdded {
                    index,
                    locator: new_ids[index].map(Document::to_string),
                });
            }
        }

        Ok(result)
    }
}

/// Non-null value at `key`, the element's identity in keyed matching.
fn identity_at<'a>(doc: &'a Document, key: &str) -> Option<&'a Document> {
    doc.lookup(key).filter(|v| !v.is_null())
}

/// Compare two mappings, prefixing every emitted path with `prefix`.
///
/// Keys of `old` are visited first, in `old`'s order: missing keys are
/// `KeyRemoved`, nested mappings are recursed into in place, other unequal
/// values are `ValueChanged`. Keys only in `new` follow as `KeyAdded`, in
/// `new`'s order.
pub fn diff_mappings(old: &Mapping, new: &Mapping, prefix: &ChangePath) -> DiffResult {
    let mut result = DiffResult::new();
    collect_mapping_changes(old, new, prefix, &mut result);
    result
}

fn collect_mapping_changes(old: &Mapping, new: &Mapping, prefix: &ChangePath, out: &mut DiffResult) {
    for (key, old_val) in old {
        let Some(new_val) = new.get(key) else {
            out.push(ChangeRecord::KeyRemoved { path: prefix.key(key) });
            continue;
        };

        match (old_val, new_val) {
            (Document::Mapping(old_child), Document::Mapping(new_child)) => {
                collect_mapping_changes(old_child, new_child, &prefix.key(key), out);
            }
            _ if old_val != new_val => out.push(ChangeRecord::ValueChanged {
                path: prefix.key(key),
                old: old_val.clone(),
                new: new_val.clone(),
            }),
            _ => {}
        }
    }

    for (key, new_val) in new {
        if !old.contains_key(key) {
            out.push(ChangeRecord::KeyAdded {
                path: prefix.key(key),
                value: new_val.clone(),
            });
        }
    }
}

fn both_mappings<'a>(
    old: &'a Document,
    new: &'a Document,
    path: &ChangePath,
) -> EngineResult<(&'a Mapping, &'a Mapping)> {
    let expect = |doc: &'a Document| {
        doc.as_mapping().ok_or_else(|| DiffError::TypeMismatch {
            path: path.clone(),
            expected: DocumentKind::Mapping,
            found: doc.kind(),
        })
    };
    Ok((expect(old)?, expect(new)?))
}

/// Compare two documents with the default engine.
pub fn diff(old: &Document, new: &Document) -> EngineResult<DiffResult> {
    DiffEngine::default().diff(old, new)
}

/// Compare two document lists positionally with the default `Item` label.
pub fn diff_document_lists(old: &[Document], new: &[Document]) -> EngineResult<DiffResult> {
    DiffEngine::default().diff_document_lists(old, new)
}
