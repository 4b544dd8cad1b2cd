//! Error types for request construction.
//!
//! These never reach the caller directly: they are turned into
//! [`FailureKind::Usage`](httpexpect_chain::FailureKind::Usage) failures on
//! the request chain.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("path parameter {0:?} has no placeholder in the path")]
    UnknownPathParam(String),

    #[error("path placeholder {0:?} was never filled")]
    UnfilledPathParam(String),

    #[error("request body cannot be encoded: {0}")]
    Body(String),
}

pub type Result<T> = std::result::Result<T, RequestError>;
