//! Whole-file JSON persistence shared by snapshots, tokens, and bot config.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Output layout for [`write_json`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonStyle {
    Compact,
    Pretty,
}

/// Read and decode a JSON file. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read json file");
    Ok(Some(value))
}

/// Encode `value` and replace `path` with it.
///
/// The content goes to a temporary file in the same directory first and is
/// renamed over the target, so readers see either the old or the new file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> StoreResult<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let ser_err = |source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    };

    let bytes = match style {
        JsonStyle::Compact => serde_json::to_vec(value).map_err(ser_err)?,
        JsonStyle::Pretty => serde_json::to_vec_pretty(value).map_err(ser_err)?,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        reason: e.error.to_string(),
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote json file");
    Ok(())
}
