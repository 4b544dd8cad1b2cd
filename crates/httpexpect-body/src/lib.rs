//! Lazily buffered, replayable bodies.
//!
//! Transport streams are single pass, but one logical call may need the same
//! body many times: once per retry attempt, once per redirect hop, and once
//! more for diagnostics. [`BodyWrapper`] pulls the stream into memory on
//! first touch and hands out independent [`BodyReader`]s from then on.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use futures_util::stream;
//! use httpexpect_body::{BodyWrapper, ByteStream};
//! use std::io::Read;
//!
//! # tokio_test_block_on(async {
//! let source: ByteStream = Box::pin(stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(b"payload"))]));
//! let body = BodyWrapper::new(source);
//!
//! let mut first = String::new();
//! body.materialize().await.unwrap().read_to_string(&mut first).unwrap();
//! let second = body.bytes().await.unwrap();
//! assert_eq!(first.as_bytes(), &second[..]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

mod error;
mod reader;
mod wrapper;

pub use error::{BodyError, Result};
pub use reader::BodyReader;
pub use wrapper::BodyWrapper;

/// A boxed stream type for body sources.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// One-shot byte source as handed over by a transport.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;
