#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("value cannot be canonicalized: {0}")]
    Canonicalize(String),

    #[error("invalid JSON: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
