//! Immutable data types for one logical call.
//!
//! Policies and options are fixed before the call starts; attempt records
//! are produced by the engine and never mutated afterwards.

pub mod attempt;
pub mod message;
pub mod options;
pub mod policy;

pub use attempt::{AttemptOutcome, AttemptRecord, StopReason};
pub use message::{DeliveryRequest, TransportRequest, TransportResponse};
pub use options::{DEFAULT_MAX_REDIRECTS, DeliveryOptions};
pub use policy::{RedirectPolicy, RetryPolicy};
