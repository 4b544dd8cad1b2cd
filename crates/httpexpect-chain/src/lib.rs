//! Failure propagation and reporting for fluent assertion chains.
//!
//! # Architecture
//!
//! - [`Chain`] - copy-on-branch node carried by every fluent object
//! - [`AssertionFailure`] - structured description handed to the reporter
//! - [`Reporter`] - sink invoked exactly once per failing node
//! - [`Value`] - closed value tree every assertion input is canonicalized into
//!
//! # Key Features
//!
//! - **Report once**: `fail` is idempotent, and nodes entered under a failed
//!   node start failed and stay silent
//! - **No retroactive damage**: a failure never flips nodes that were already
//!   handed out, only nodes entered afterwards
//! - **Aliases**: a node can be renamed so failure paths stay readable

mod chain;
mod error;
mod failure;
mod reporter;
mod value;

pub use chain::Chain;
pub use error::{Error, Result};
pub use failure::{AssertionFailure, FailureKind, Severity};
pub use reporter::{LogReporter, PanicReporter, RecordingReporter, Reporter};
pub use value::{Value, ValueKind};
