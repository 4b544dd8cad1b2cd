//! Failure sinks.
//!
//! A [`Reporter`] receives each failing chain node exactly once. The chain
//! never calls it for a node that started out failed.

use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::failure::AssertionFailure;

/// Receives structured failure descriptions.
pub trait Reporter: Send + Sync {
    fn report(&self, failure: &AssertionFailure);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, failure: &AssertionFailure) { (**self).report(failure) }
}

/// Panics on fatal failures so the surrounding `#[test]` fails.
///
/// Non-fatal failures are logged at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report(&self, failure: &AssertionFailure) {
        if failure.is_fatal() {
            panic!("{failure}");
        }
        warn!(path = %failure.path, kind = %failure.kind, "{failure}");
    }
}

/// Logs every failure and never panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, failure: &AssertionFailure) {
        if failure.is_fatal() {
            error!(path = %failure.path, kind = %failure.kind, "{failure}");
        } else {
            warn!(path = %failure.path, kind = %failure.kind, "{failure}");
        }
    }
}

/// Keeps every reported failure in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<AssertionFailure>>,
}

impl RecordingReporter {
    pub fn new() -> Self { Self::default() }

    /// Snapshot of the failures reported so far, oldest first.
    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize { self.failures.lock().map(|f| f.len()).unwrap_or(0) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn clear(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.clear();
        }
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, failure: &AssertionFailure) {
        // A poisoned lock only means another test thread panicked while
        // recording; keep collecting.
        let mut failures = match self.failures.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.push(failure.clone());
    }
}
