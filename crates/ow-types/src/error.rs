use thiserror::Error;

/// Errors produced when reading structure out of a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("unexpected document shape: expected {expected}, got {found}")]
    UnexpectedShape { expected: &'static str, found: String },
}
