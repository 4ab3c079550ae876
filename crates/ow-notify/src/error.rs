use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bot API rejected {method}: {description}")]
    Api { method: String, description: String },

    #[error("bot API returned no result for {0}")]
    EmptyResult(String),

    #[error("store error: {0}")]
    Store(#[from] ow_store::StoreError),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
