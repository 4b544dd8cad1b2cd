use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use httpexpect_body::{BodyReader, BodyWrapper, ByteStream};
use url::Url;

/// What the caller wants delivered.
///
/// The body is shared: the engine takes a fresh reader from it for every
/// attempt and hop, and the caller keeps it for diagnostics.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub method:  Method,
    pub url:     Url,
    pub headers: HeaderMap,
    pub body:    Option<Arc<BodyWrapper>>,
}

impl DeliveryRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(Arc::new(BodyWrapper::from_bytes(body)));
        self
    }

    #[must_use]
    pub fn body_stream(mut self, source: ByteStream) -> Self {
        self.body = Some(Arc::new(BodyWrapper::new(source)));
        self
    }
}

/// One message handed to the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method:  Method,
    pub url:     Url,
    pub headers: HeaderMap,
    pub body:    Option<BodyReader>,
}

impl TransportRequest {
    /// Body bytes, empty when the request carries none.
    pub fn body_bytes(&self) -> Bytes { self.body.as_ref().map(BodyReader::to_bytes).unwrap_or_default() }
}

/// What the transport returns.
#[derive(Debug)]
pub struct TransportResponse {
    pub status:  StatusCode,
    pub headers: HeaderMap,
    pub body:    BodyWrapper,
}

impl TransportResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: BodyWrapper::empty(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = BodyWrapper::from_bytes(body);
        self
    }

    #[must_use]
    pub fn body_stream(mut self, source: ByteStream) -> Self {
        self.body = BodyWrapper::new(source);
        self
    }
}
