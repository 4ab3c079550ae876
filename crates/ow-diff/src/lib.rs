//! Structural diff engine for orderwatch.
//!
//! Compares two document trees (typically the saved and the freshly fetched
//! order snapshots) and produces an ordered list of typed change records.
//! The engine is pure: no I/O, no shared state, safe to call concurrently.
//!
//! # Key Types
//!
//! - [`DiffEngine`] / [`ListMatching`] -- Configurable comparison entry point
//! - [`DiffResult`] / [`ChangeRecord`] / [`ChangePath`] -- Ordered change records
//! - [`ReportLine`] -- Uncolored human-readable rendering of a record

pub mod change;
pub mod engine;
pub mod error;
pub mod render;

pub use change::{display_locator, ChangePath, ChangeRecord, DiffResult, PathSegment};
pub use engine::{diff, diff_document_lists, diff_mappings, DiffEngine, ListMatching};
pub use error::{DiffError, EngineResult};
pub use render::{render_changes, render_record, truncate, LineKind, ReportLine};
