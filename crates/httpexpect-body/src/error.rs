use std::io;
use std::sync::Arc;

/// Errors produced while buffering a body.
///
/// Cloneable: the first drain error is cached and handed out again on
/// every later access.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BodyError {
    #[error("failed to read body: {0}")]
    Read(#[source] Arc<io::Error>),
}

impl From<io::Error> for BodyError {
    fn from(err: io::Error) -> Self { BodyError::Read(Arc::new(err)) }
}

pub type Result<T> = std::result::Result<T, BodyError>;
