//! Error types for the diff crate.

use ow_types::DocumentKind;

use crate::change::ChangePath;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A node had a different shape than the comparison requires (e.g. a
    /// list element that is not a mapping, or a mapping compared to a list).
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: ChangePath,
        expected: DocumentKind,
        found: DocumentKind,
    },
}

/// Convenience alias for fallible engine operations.
pub type EngineResult<T> = Result<T, DiffError>;
