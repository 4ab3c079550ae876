//! Snapshot persistence for orderwatch.
//!
//! The previously fetched order list is kept as one JSON document and
//! replaced wholesale after each successful comparison. The same whole-file
//! JSON helpers back the token and bot configuration files.
//!
//! # Storage Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`FileSnapshotStore`] -- a single JSON file, replaced atomically
//! - [`InMemorySnapshotStore`] -- `RwLock`-held snapshot for tests and embedding
//!
//! # Design Rules
//!
//! 1. Snapshots are written whole, never patched.
//! 2. Writes go to a temporary file that is renamed into place.
//! 3. A missing file means "no snapshot yet"; unreadable content is an error.
//! 4. The store never interprets document contents.

pub mod error;
pub mod file;
pub mod json;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileSnapshotStore;
pub use json::{read_json, write_json, JsonStyle};
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotStore;
