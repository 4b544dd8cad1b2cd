use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::{BodyError, Result};
use crate::reader::BodyReader;
use crate::ByteStream;

type CancelHook = Box<dyn FnOnce() + Send>;

struct State {
    /// One-shot source; `None` once drained.
    source: Option<ByteStream>,
    /// Populated by the drain and never mutated afterwards.
    buffer: Option<Bytes>,
    error:  Option<BodyError>,
    cursor: usize,
    cancel: Option<CancelHook>,
}

impl State {
    /// Drain the source into the buffer, at most once.
    ///
    /// The source is released and the cancel hook fired whether the drain
    /// succeeded or not; a failure is cached permanently.
    async fn drain(&mut self) -> Result<Bytes> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if let Some(buffer) = &self.buffer {
            return Ok(buffer.clone());
        }

        let mut collected = BytesMut::new();
        let mut failure = None;
        if let Some(mut source) = self.source.take() {
            while let Some(chunk) = source.next().await {
                match chunk {
                    Ok(chunk) => collected.extend_from_slice(&chunk),
                    Err(err) => {
                        failure = Some(BodyError::from(err));
                        break;
                    }
                }
            }
        }
        self.release();

        match failure {
            Some(error) => {
                trace!(error = %error, "body drain failed");
                self.error = Some(error.clone());
                Err(error)
            }
            None => {
                let buffer = collected.freeze();
                trace!(bytes = buffer.len(), "body drained");
                self.buffer = Some(buffer.clone());
                Ok(buffer)
            }
        }
    }

    fn release(&mut self) {
        self.source = None;
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    fn drained(&self) -> bool { self.buffer.is_some() || self.error.is_some() }
}

/// Body that can be read any number of times.
///
/// The underlying stream is pulled into memory on first touch (read,
/// rewind after a read, materialize or close) and released right after.
/// All operations serialize through one async mutex.
pub struct BodyWrapper {
    state: Mutex<State>,
}

impl BodyWrapper {
    /// Wrap a one-shot byte stream. Nothing is read until first access.
    pub fn new(source: ByteStream) -> Self {
        Self::with_state(Some(source), None)
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::with_state(None, Some(bytes.into()))
    }

    pub fn empty() -> Self { Self::from_bytes(Bytes::new()) }

    fn with_state(source: Option<ByteStream>, buffer: Option<Bytes>) -> Self {
        Self {
            state: Mutex::new(State {
                source,
                buffer,
                error: None,
                cursor: 0,
                cancel: None,
            }),
        }
    }

    /// Install a hook fired exactly once, when the source is released.
    ///
    /// Used by transports to abort the underlying connection. If the body is
    /// already buffered the hook fires on the next `close`.
    #[must_use]
    pub fn with_cancel_hook(self, hook: impl FnOnce() + Send + 'static) -> Self {
        let mut state = self.state.into_inner();
        state.cancel = Some(Box::new(hook));
        Self {
            state: Mutex::new(state),
        }
    }

    /// Read from the internal cursor, draining the source on first call.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.state.lock().await;
        let buffer = state.drain().await?;
        let rest = &buffer[state.cursor.min(buffer.len())..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        state.cursor += n;
        Ok(n)
    }

    /// Reset the internal cursor to the start.
    ///
    /// Does not force a drain: rewinding a body nobody has read is a no-op.
    pub async fn rewind(&self) {
        let mut state = self.state.lock().await;
        if state.drained() {
            state.cursor = 0;
        }
    }

    /// Return a fresh reader over the whole body, positioned at zero.
    ///
    /// The wrapper's own cursor is left untouched.
    pub async fn materialize(&self) -> Result<BodyReader> {
        let mut state = self.state.lock().await;
        state.drain().await.map(BodyReader::new)
    }

    /// The whole body as one shared buffer.
    pub async fn bytes(&self) -> Result<Bytes> { self.state.lock().await.drain().await }

    /// Drain (if nobody read the body yet), release the source and fire the
    /// cancel hook. Safe to call repeatedly; every call returns the same
    /// result.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let drained = state.drain().await.map(|_| ());
        state.release();
        drained
    }

    /// `true` once the source has been pulled, successfully or not.
    pub async fn is_drained(&self) -> bool { self.state.lock().await.drained() }
}

impl Default for BodyWrapper {
    fn default() -> Self { Self::empty() }
}

impl fmt::Debug for BodyWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_lock() {
            Ok(state) => f
                .debug_struct("BodyWrapper")
                .field("buffered", &state.buffer.as_ref().map(Bytes::len))
                .field("pending_source", &state.source.is_some())
                .field("error", &state.error)
                .field("cursor", &state.cursor)
                .finish(),
            Err(_) => f.debug_struct("BodyWrapper").finish_non_exhaustive(),
        }
    }
}
