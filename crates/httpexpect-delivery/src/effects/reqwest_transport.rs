use futures_util::TryStreamExt;
use httpexpect_body::BodyWrapper;
use reqwest::redirect::Policy;

use super::transport::Transport;
use crate::core::is_temporary_error;
use crate::data::{TransportRequest, TransportResponse};

/// Production transport backed by `reqwest`.
///
/// The client never follows redirects itself; the engine does.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default client settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
        Ok(Self { client })
    }

    /// Wrap a pre-configured client.
    ///
    /// The client must be built with `redirect(Policy::none())`, otherwise
    /// redirect policies and hop counts are not observable.
    pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
}

impl Transport for ReqwestTransport {
    type Error = reqwest::Error;

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, Self::Error> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = request.body {
            builder = builder.body(body.to_bytes());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let stream = response.bytes_stream().map_err(std::io::Error::other);

        Ok(TransportResponse {
            status,
            headers,
            body: BodyWrapper::new(Box::pin(stream)),
        })
    }

    fn is_temporary(&self, error: &Self::Error) -> bool {
        error.is_timeout() || error.is_connect() || is_temporary_error(error)
    }
}
