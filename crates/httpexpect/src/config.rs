use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};
use httpexpect_chain::{PanicReporter, Reporter};
use httpexpect_delivery::DeliveryOptions;

/// Settings shared by every request created from one [`Expect`](crate::Expect).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use httpexpect::{Config, DeliveryOptions, HandlerTransport, RecordingReporter, TransportRequest, TransportResponse};
///
/// let transport = HandlerTransport::new(|_request: TransportRequest| async {
///     Ok::<_, std::io::Error>(TransportResponse::new(http::StatusCode::OK))
/// });
/// let config = Config::new(transport)
///     .base_url("http://localhost:8080/api")
///     .reporter(RecordingReporter::new())
///     .delivery(DeliveryOptions::default().timeout(Duration::from_secs(2)));
/// ```
pub struct Config<T> {
    /// Prefix joined with every request path. Empty means paths are
    /// absolute URLs.
    ///
    /// Default: empty
    pub base_url: String,

    pub transport: Arc<T>,

    /// Sink for every failure.
    ///
    /// Default: [`PanicReporter`]
    pub reporter: Arc<dyn Reporter>,

    /// Delivery settings each request starts from.
    ///
    /// Default: `DeliveryOptions::default()`
    pub delivery: DeliveryOptions,

    /// Headers added to every request; request headers of the same name
    /// replace them.
    ///
    /// Default: none
    pub headers: HeaderMap,
}

impl<T> Config<T> {
    pub fn new(transport: T) -> Self { Self::with_transport(Arc::new(transport)) }

    /// Share an already wrapped transport between several configs.
    pub fn with_transport(transport: Arc<T>) -> Self {
        Self {
            base_url: String::new(),
            transport,
            reporter: Arc::new(PanicReporter),
            delivery: DeliveryOptions::default(),
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    #[must_use]
    pub fn delivery(mut self, delivery: DeliveryOptions) -> Self {
        self.delivery = delivery;
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

impl<T> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("delivery", &self.delivery)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
