//! I/O side of delivery: the transport seam, cancellation and the engine.

mod cancel;
mod engine;
#[cfg(feature = "reqwest")]
mod reqwest_transport;
mod transport;

pub use cancel::CancelSignal;
pub use engine::{Delivery, Engine};
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
pub use transport::{HandlerTransport, Transport};
