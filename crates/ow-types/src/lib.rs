//! Foundation types for orderwatch.
//!
//! Every other orderwatch crate depends on `ow-types` for the document tree
//! that snapshots, diffs, and summaries are built on.
//!
//! # Key Types
//!
//! - [`Document`] -- Immutable JSON-like tree: scalar, sequence, or mapping
//! - [`Mapping`] -- Insertion-ordered, order-insensitive key/value node
//! - [`OrderSummary`] -- The user-facing fields of one detailed order

pub mod document;
pub mod error;
pub mod order;

pub use document::{Document, DocumentKind, Mapping, Scalar};
pub use error::TypeError;
pub use order::{detailed_order, OrderSummary, REFERENCE_NUMBER_PATH};
