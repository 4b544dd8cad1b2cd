use std::fmt;
use std::time::{Duration, Instant};

use http::{HeaderMap, Method, StatusCode};
use url::Url;

/// Why the engine stopped a call from outside the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The call deadline elapsed.
    Timeout,
    /// The external cancel signal fired.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Timeout => f.write_str("timeout exceeded"),
            StopReason::Cancelled => f.write_str("externally cancelled"),
        }
    }
}

/// Result of a single send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The transport produced a response.
    Response(StatusCode),
    /// The transport failed.
    TransportError { message: String, temporary: bool },
    /// The send was aborted by the deadline or the cancel signal.
    Stopped(StopReason),
}

/// One send within a logical call.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Redirect hop the attempt belongs to (0 = original target).
    pub hop:     u32,
    /// Attempt index within the hop (0 = first attempt).
    pub attempt: u32,
    pub method:  Method,
    pub url:     Url,
    pub headers: HeaderMap,
    pub started: Instant,
    pub elapsed: Duration,
    pub outcome: AttemptOutcome,
    /// Whether the engine decided to send again after this attempt.
    pub retried: bool,
}

impl AttemptRecord {
    pub fn status(&self) -> Option<StatusCode> {
        match self.outcome {
            AttemptOutcome::Response(status) => Some(status),
            _ => None,
        }
    }
}
