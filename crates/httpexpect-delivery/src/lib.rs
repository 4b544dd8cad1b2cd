//! Request delivery with retries, redirects, timeouts and cancellation.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options, policies, messages and attempt records
//! - [`core`] - Pure retry, redirect and error-classification rules
//! - `effects` - The [`Transport`] seam, [`CancelSignal`] and the [`Engine`]
//!
//! # Key Features
//!
//! - **Bounded**: at most `1 + max_retries` sends per hop and at most
//!   `max_redirects` hops per call
//! - **Replayable bodies**: the request body is buffered once and handed to
//!   every attempt and hop as a fresh reader
//! - **One deadline**: the timeout covers the whole logical call, including
//!   back-off sleeps
//! - **Transport-agnostic**: an in-process [`HandlerTransport`] for tests, a
//!   `reqwest` transport behind the `reqwest` feature
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use http::{Method, StatusCode};
//! use httpexpect_delivery::{
//!     DeliveryOptions, DeliveryRequest, Engine, HandlerTransport, TransportRequest, TransportResponse,
//! };
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let transport = HandlerTransport::new(|_request: TransportRequest| async {
//!     Ok::<_, std::io::Error>(TransportResponse::new(StatusCode::NO_CONTENT))
//! });
//! let engine = Engine::new(Arc::new(transport));
//!
//! let request = DeliveryRequest::new(Method::GET, "http://localhost/ping".parse().unwrap());
//! let delivery = engine.execute(&request, &DeliveryOptions::default().max_retries(2)).await;
//!
//! assert_eq!(delivery.response().unwrap().status, StatusCode::NO_CONTENT);
//! assert_eq!(delivery.attempt_count(), 1);
//! # });
//! # }
//! ```

pub mod core;
pub mod data;
mod effects;
mod error;

pub use data::{
    AttemptOutcome, AttemptRecord, DEFAULT_MAX_REDIRECTS, DeliveryOptions, DeliveryRequest, RedirectPolicy,
    RetryPolicy, StopReason, TransportRequest, TransportResponse,
};
pub use effects::{CancelSignal, Delivery, Engine, HandlerTransport, Transport};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestTransport;
pub use error::{DeliveryError, Result};
