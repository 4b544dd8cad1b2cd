//! Fluent end-to-end HTTP assertions.
//!
//! # Architecture
//!
//! - [`Expect`] - entry point holding the shared [`Config`]
//! - [`Request`] - builder for one logical call; `expect()` delivers it
//! - [`Response`] - the final response, fully buffered
//! - [`ValueAssert`], [`Object`], [`Array`], [`Str`], [`Number`],
//!   [`Boolean`] - typed wrappers over decoded values
//!
//! Delivery (retries, redirects, timeout, cancellation) lives in
//! `httpexpect-delivery`; failure propagation in `httpexpect-chain`.
//!
//! # Key Features
//!
//! - **No early returns**: every call returns something to keep chaining on;
//!   after the first failure the rest of that branch is a silent no-op
//! - **One report per failure**: the reporter sees each failing node once,
//!   with its full path
//! - **Transport-agnostic**: in-process handlers for tests, `reqwest` behind
//!   the `reqwest` feature
//!
//! # Example
//!
//! ```
//! use http::header::CONTENT_TYPE;
//! use http::{HeaderValue, StatusCode};
//! use httpexpect::{Config, Expect, HandlerTransport, RecordingReporter, TransportRequest, TransportResponse};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let transport = HandlerTransport::new(|_request: TransportRequest| async {
//!     Ok::<_, std::io::Error>(
//!         TransportResponse::new(StatusCode::OK)
//!             .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
//!             .body(r#"{"id": 7, "name": "widget"}"#),
//!     )
//! });
//! let e = Expect::new(Config::new(transport).base_url("http://shop.test"));
//!
//! let response = e.get("/items/{id}").path_param("id", 7).expect().await;
//! response.status(200);
//! let item = response.json().object();
//! item.value("id").number().is_equal(7.0);
//! item.value("name").string().is_equal("widget");
//! # });
//! ```

mod assert;
mod config;
mod error;
mod expect;
mod request;
mod response;

pub use assert::{Array, Boolean, Number, Object, Str, ValueAssert};
pub use config::Config;
pub use error::RequestError;
pub use expect::Expect;
pub use httpexpect_body::{BodyReader, BodyWrapper, ByteStream};
pub use httpexpect_chain::{
    AssertionFailure, Chain, FailureKind, LogReporter, PanicReporter, RecordingReporter, Reporter, Severity, Value,
};
pub use httpexpect_delivery::{
    AttemptOutcome, AttemptRecord, CancelSignal, DeliveryOptions, HandlerTransport, RedirectPolicy, RetryPolicy,
    Transport, TransportRequest, TransportResponse,
};
#[cfg(feature = "reqwest")]
pub use httpexpect_delivery::ReqwestTransport;
pub use request::Request;
pub use response::{Response, StatusRange};
