//! Error types for httpexpect-delivery.

use std::error::Error as StdError;
use std::time::Duration;

use httpexpect_body::BodyError;
use httpexpect_chain::FailureKind;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source:    Box<dyn StdError + Send + Sync>,
        temporary: bool,
    },

    #[error("timeout exceeded ({}ms)", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("request externally cancelled")]
    Cancelled,

    #[error("max retries exceeded ({attempts} attempts)")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last:     Box<DeliveryError>,
    },

    #[error("failed to read request body: {0}")]
    BodyRead(#[from] BodyError),

    #[error("invalid redirect location {location:?}: {reason}")]
    InvalidRedirect { location: String, reason: String },
}

impl DeliveryError {
    /// Cause tag carried into the assertion chain.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            DeliveryError::Transport { .. } | DeliveryError::InvalidRedirect { .. } => FailureKind::Transport,
            DeliveryError::Timeout { .. } => FailureKind::Timeout,
            DeliveryError::Cancelled => FailureKind::Cancelled,
            DeliveryError::RetriesExhausted { .. } => FailureKind::PolicyExhausted,
            DeliveryError::BodyRead(_) => FailureKind::BodyRead,
        }
    }

    /// This error followed by every error in its source chain.
    pub fn messages(&self) -> Vec<String> {
        std::iter::successors(Some(self as &(dyn StdError + 'static)), |&err| err.source())
            .map(ToString::to_string)
            .collect()
    }
}

pub type Result<T> = std::result::Result<T, DeliveryError>;
