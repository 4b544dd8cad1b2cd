use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use httpexpect_body::BodyWrapper;
use httpexpect_chain::{AssertionFailure, Chain, FailureKind, Value};
use httpexpect_delivery::{AttemptRecord, Delivery};
use tracing::trace;

use crate::assert::{Str, ValueAssert, label};

/// Status code class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRange {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusRange {
    pub fn contains(self, status: u16) -> bool {
        let bounds = match self {
            StatusRange::Informational => 100..200,
            StatusRange::Success => 200..300,
            StatusRange::Redirection => 300..400,
            StatusRange::ClientError => 400..500,
            StatusRange::ServerError => 500..600,
        };
        bounds.contains(&status)
    }
}

impl fmt::Display for StatusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusRange::Informational => "1xx",
            StatusRange::Success => "2xx",
            StatusRange::Redirection => "3xx",
            StatusRange::ClientError => "4xx",
            StatusRange::ServerError => "5xx",
        };
        f.write_str(name)
    }
}

/// The final response of one logical call.
///
/// The body is fully buffered before the response is handed out. When the
/// call failed the response is empty and its chain is failed, so every
/// assertion on it is a silent no-op.
pub struct Response {
    chain:     Chain,
    status:    Option<StatusCode>,
    headers:   HeaderMap,
    body:      Bytes,
    raw:       Arc<BodyWrapper>,
    elapsed:   Duration,
    attempts:  Vec<AttemptRecord>,
    redirects: u32,
}

impl Response {
    pub(crate) fn failed(chain: Chain) -> Self {
        Self {
            chain,
            status: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            raw: Arc::new(BodyWrapper::empty()),
            elapsed: Duration::ZERO,
            attempts: Vec::new(),
            redirects: 0,
        }
    }

    pub(crate) async fn from_delivery(chain: Chain, delivery: Delivery) -> Self {
        let Delivery {
            outcome,
            attempts,
            redirects,
            elapsed,
        } = delivery;

        let Ok(response) = outcome else {
            let mut failed = Self::failed(chain);
            failed.attempts = attempts;
            failed.redirects = redirects;
            failed.elapsed = elapsed;
            return failed;
        };

        let raw = Arc::new(response.body);
        let body = match raw.bytes().await {
            Ok(body) => body,
            Err(e) => {
                chain.fail(AssertionFailure::new(FailureKind::BodyRead).error(e.to_string()));
                Bytes::new()
            }
        };
        trace!(status = response.status.as_u16(), bytes = body.len(), "response buffered");

        Self {
            chain,
            status: Some(response.status),
            headers: response.headers,
            body,
            raw,
            elapsed,
            attempts,
            redirects,
        }
    }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    /// Status of the final response; `None` when the call failed.
    pub fn raw_status(&self) -> Option<StatusCode> { self.status }

    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// The re-readable body.
    pub fn raw_body(&self) -> &BodyWrapper { &self.raw }

    /// Wall time of the whole logical call.
    pub fn elapsed(&self) -> Duration { self.elapsed }

    /// Every send, across retries and redirect hops.
    pub fn attempts(&self) -> &[AttemptRecord] { &self.attempts }

    pub fn redirects(&self) -> u32 { self.redirects }

    fn status_code(&self) -> u16 { self.status.map_or(0, |s| s.as_u16()) }

    pub fn status(&self, expected: u16) -> &Self {
        let chain = self.chain.enter(label("Status", expected));
        if !chain.failed() && self.status_code() != expected {
            chain.fail(
                AssertionFailure::assertion("expected: status codes are equal")
                    .expected(expected)
                    .actual(self.status_code()),
            );
        }
        self
    }

    pub fn status_range(&self, range: StatusRange) -> &Self {
        let chain = self.chain.enter(format!("StatusRange({range})"));
        if !chain.failed() && !range.contains(self.status_code()) {
            chain.fail(
                AssertionFailure::assertion(format!("expected: status code in range {range}"))
                    .actual(self.status_code()),
            );
        }
        self
    }

    pub fn has_header(&self, name: &str) -> &Self {
        let chain = self.chain.enter(label("HasHeader", name));
        if !chain.failed() && !self.headers.contains_key(name) {
            chain.fail(AssertionFailure::assertion(format!("expected: header {name:?} is present")));
        }
        self
    }

    pub fn not_has_header(&self, name: &str) -> &Self {
        let chain = self.chain.enter(label("NotHasHeader", name));
        if !chain.failed() && self.headers.contains_key(name) {
            chain.fail(AssertionFailure::assertion(format!("expected: header {name:?} is absent")));
        }
        self
    }

    /// First value of header `name`. A missing or non-text header fails the
    /// returned wrapper's chain.
    pub fn header(&self, name: &str) -> Str {
        let chain = self.chain.enter(label("Header", name));
        if chain.failed() {
            return Str::new(chain, String::new());
        }
        match self.headers.get(name).map(|v| v.to_str()) {
            Some(Ok(value)) => Str::new(chain, value.to_owned()),
            Some(Err(_)) => {
                chain.fail(AssertionFailure::assertion(format!("header {name:?} is not valid text")));
                Str::new(chain, String::new())
            }
            None => {
                chain.fail(AssertionFailure::assertion(format!("expected: header {name:?} is present")));
                Str::new(chain, String::new())
            }
        }
    }

    /// Media type of `Content-Type`, parameters ignored, case-insensitive.
    pub fn content_type(&self, media_type: &str) -> &Self {
        let chain = self.chain.enter(label("ContentType", media_type));
        if chain.failed() {
            return self;
        }
        let actual = self.media_type();
        if !actual.as_deref().is_some_and(|actual| actual.eq_ignore_ascii_case(media_type)) {
            let failure = AssertionFailure::assertion("expected: content type matches").expected(media_type);
            chain.fail(match actual {
                Some(actual) => failure.actual(actual),
                None => failure.error("no Content-Type header"),
            });
        }
        self
    }

    fn media_type(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        Some(value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn body(&self) -> Str {
        let chain = self.chain.enter("Body()");
        Str::new(chain, String::from_utf8_lossy(&self.body).into_owned())
    }

    /// Body as text; invalid UTF-8 fails the returned wrapper's chain.
    pub fn text(&self) -> Str {
        let chain = self.chain.enter("Text()");
        if chain.failed() {
            return Str::new(chain, String::new());
        }
        match std::str::from_utf8(&self.body) {
            Ok(text) => Str::new(chain, text.to_owned()),
            Err(e) => {
                chain.fail(AssertionFailure::assertion(format!("body is not valid UTF-8: {e}")));
                Str::new(chain, String::new())
            }
        }
    }

    /// Decode the body as JSON.
    ///
    /// Requires a JSON media type (`application/json` or `*/*+json`). A
    /// wrong content type or an undecodable body fails the returned
    /// wrapper's chain.
    pub fn json(&self) -> ValueAssert {
        let chain = self.chain.enter("JSON()");
        if chain.failed() {
            return ValueAssert::new(chain, Value::Null);
        }
        let is_json = self
            .media_type()
            .is_some_and(|media| media == "application/json" || media.ends_with("+json"));
        if !is_json {
            let actual = self.media_type().unwrap_or_default();
            chain.fail(
                AssertionFailure::assertion("expected: JSON content type")
                    .expected("application/json")
                    .actual(actual),
            );
            return ValueAssert::new(chain, Value::Null);
        }
        match Value::from_json_slice(&self.body) {
            Ok(value) => ValueAssert::new(chain, value),
            Err(e) => {
                chain.fail(AssertionFailure::assertion(e.to_string()));
                ValueAssert::new(chain, Value::Null)
            }
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("path", &self.chain.path())
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .field("attempts", &self.attempts.len())
            .field("redirects", &self.redirects)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
