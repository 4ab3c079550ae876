use std::path::{Path, PathBuf};

use ow_types::Document;
use tracing::info;

use crate::error::StoreResult;
use crate::json::{read_json, write_json, JsonStyle};
use crate::traits::SnapshotStore;

/// Snapshot store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        read_json(&self.path)
    }

    fn save(&self, snapshot: &Document) -> StoreResult<()> {
        write_json(&self.path, snapshot, JsonStyle::Compact)?;
        info!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(self.path.is_file())
    }
}
