use thiserror::Error;

/// Errors produced while building or signing provider tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signing primitive could not produce a signature.
    /// Never retried internally, the cache slot stays as it was.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("invalid token manager config: {0}")]
    InvalidConfig(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

pub type TokenResult<T> = Result<T, TokenError>;
