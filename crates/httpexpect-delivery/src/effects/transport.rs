use std::future::Future;
use std::io;

use crate::core::is_temporary_error;
use crate::data::{TransportRequest, TransportResponse};

/// "Send a request, get a response" collaborator.
///
/// This trait provides the minimal interface the engine needs. Implementations
/// must NOT follow redirects or retry on their own: the engine does both, so
/// it can replay the body and apply its policies.
///
/// # Implementations
///
/// - [`HandlerTransport`]: in-process handler, no network
/// - [`ReqwestTransport`](crate::ReqwestTransport): real client (feature `reqwest`)
pub trait Transport: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send one message and return the response head with a one-shot body.
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, Self::Error>> + Send;

    /// Whether `error` is a temporary network condition worth retrying.
    ///
    /// The default looks for a transient `io::Error` in the source chain.
    fn is_temporary(&self, error: &Self::Error) -> bool { is_temporary_error(error) }
}

/// Adapts an async closure into a [`Transport`].
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use httpexpect_delivery::{HandlerTransport, TransportRequest, TransportResponse};
///
/// let transport = HandlerTransport::new(|request: TransportRequest| async move {
///     let status = if request.url.path() == "/health" { StatusCode::OK } else { StatusCode::NOT_FOUND };
///     Ok::<_, std::io::Error>(TransportResponse::new(status))
/// });
/// ```
pub struct HandlerTransport<F> {
    handler: F,
}

impl<F> HandlerTransport<F> {
    pub fn new(handler: F) -> Self { Self { handler } }
}

impl<F, Fut> Transport for HandlerTransport<F>
where
    F: Fn(TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = io::Result<TransportResponse>> + Send,
{
    type Error = io::Error;

    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, Self::Error>> + Send {
        (self.handler)(request)
    }
}
