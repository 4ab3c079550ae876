use ow_types::Document;

use crate::error::StoreResult;

/// Holder of the last saved order snapshot.
///
/// All implementations must satisfy these invariants:
/// - A snapshot is written wholesale; there are no partial updates.
/// - `load` after a successful `save` returns an equal document.
/// - A missing snapshot is `Ok(None)`, never an error.
/// - Corrupt or unreadable content is an error, never silently ignored.
pub trait SnapshotStore: Send + Sync {
    /// Load the saved snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> StoreResult<Option<Document>>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &Document) -> StoreResult<()>;

    /// Returns `true` if a snapshot is present.
    ///
    /// Default implementation loads it. Backends may override for a cheaper
    /// check.
    fn exists(&self) -> StoreResult<bool> {
        Ok(self.load()?.is_some())
    }
}
