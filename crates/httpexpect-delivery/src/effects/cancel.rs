use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Externally owned cancellation signal.
///
/// Clones share state: firing any clone cancels every call observing it,
/// including calls that start after it fired.
#[derive(Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) { self.tx.send_replace(true); }

    pub fn is_cancelled(&self) -> bool { *self.tx.borrow() }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self { Self::new() }
}

impl PartialEq for CancelSignal {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.tx, &other.tx) }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
