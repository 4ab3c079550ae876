use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("malformed access token: {0}")]
    MalformedToken(String),

    #[error("authorization redirect has no code parameter")]
    MissingAuthCode,

    #[error("authorization state mismatch")]
    StateMismatch,

    #[error("token store error: {0}")]
    Store(#[from] ow_store::StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;
