//! Pure decisions made by the engine.
//!
//! Nothing here performs I/O: the engine feeds outcomes in and acts on the
//! answers, which keeps every policy rule unit-testable in isolation.

mod classify;
mod redirect;
mod retry;

pub use classify::is_temporary_error;
pub use redirect::{Redirect, follow_redirect, is_redirect, resolve_location, strip_headers};
pub use retry::{retry_delay, should_retry_error, should_retry_status};
