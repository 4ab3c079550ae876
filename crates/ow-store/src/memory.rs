use std::sync::RwLock;

use ow_types::Document;

use crate::error::StoreResult;
use crate::traits::SnapshotStore;

/// In-memory snapshot store.
///
/// Intended for tests and embedding. The snapshot is held behind a `RwLock`
/// and cloned on read/write.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Option<Document>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Document) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }

    /// Drop the held snapshot.
    pub fn clear(&self) {
        *self.snapshot.write().expect("lock poisoned") = None;
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        Ok(self.snapshot.read().expect("lock poisoned").clone())
    }

    fn save(&self, snapshot: &Document) -> StoreResult<()> {
        *self.snapshot.write().expect("lock poisoned") = Some(snapshot.clone());
        Ok(())
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = self.snapshot.read().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("InMemorySnapshotStore")
            .field("has_snapshot", &present)
            .finish()
    }
}
