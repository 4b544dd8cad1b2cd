use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use httpexpect_body::{BodyWrapper, ByteStream};
use httpexpect_chain::{AssertionFailure, Chain, FailureKind};
use httpexpect_delivery::{
    CancelSignal, DeliveryOptions, DeliveryRequest, Engine, RedirectPolicy, RetryPolicy, Transport,
};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{RequestError, Result};
use crate::response::Response;

/// Builder for one logical call.
///
/// Construction errors (bad header, unencodable body, malformed URL) fail
/// the request chain instead of returning an error; [`Request::expect`]
/// then returns a failed [`Response`] without calling the transport.
pub struct Request<T> {
    config:      Arc<Config<T>>,
    chain:       Chain,
    method:      Method,
    path:        String,
    path_params: Vec<(String, String)>,
    query:       Vec<(String, String)>,
    headers:     HeaderMap,
    body:        Option<Arc<BodyWrapper>>,
    options:     DeliveryOptions,
}

impl<T> Request<T> {
    pub(crate) fn new(config: Arc<Config<T>>, chain: Chain, method: Method, path: String) -> Self {
        let options = config.delivery.clone();
        Self {
            config,
            chain,
            method,
            path,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            options,
        }
    }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    fn usage(&self, error: RequestError) {
        self.chain.fail(AssertionFailure::new(FailureKind::Usage).error(error.to_string()));
    }

    /// Substitute `{name}` in the path with `value`.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: impl Display) -> Self {
        self.path_params.push((name.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl Display) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    /// Add a header. An invalid name or value fails the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| e.to_string())
            .and_then(|name| HeaderValue::from_str(value).map(|value| (name, value)).map_err(|e| e.to_string()));
        match parsed {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(reason) => self.usage(RequestError::InvalidHeader {
                name: name.to_owned(),
                reason,
            }),
        }
        self
    }

    #[must_use]
    pub fn basic_auth(self, user: &str, password: &str) -> Self {
        let token = STANDARD.encode(format!("{user}:{password}"));
        self.set_header(AUTHORIZATION, &format!("Basic {token}"))
    }

    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self { self.set_header(AUTHORIZATION, &format!("Bearer {token}")) }

    fn set_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => self.usage(RequestError::InvalidHeader {
                name:   name.to_string(),
                reason: e.to_string(),
            }),
        }
        self
    }

    fn default_content_type(&mut self, value: &'static str) {
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        }
    }

    #[must_use]
    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(Arc::new(BodyWrapper::from_bytes(body)));
        self
    }

    /// UTF-8 text body; sets `Content-Type: text/plain` unless set already.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.default_content_type("text/plain; charset=utf-8");
        self.bytes(body.into())
    }

    /// JSON body; sets `Content-Type: application/json` unless set already.
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_vec(body) {
            Ok(encoded) => {
                self.default_content_type("application/json; charset=utf-8");
                self.bytes(encoded)
            }
            Err(e) => {
                self.usage(RequestError::Body(e.to_string()));
                self
            }
        }
    }

    /// One-shot streaming body. It is buffered on the first attempt and
    /// replayed for retries and redirects.
    #[must_use]
    pub fn stream(mut self, source: ByteStream) -> Self {
        self.body = Some(Arc::new(BodyWrapper::new(source)));
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.options = self.options.max_retries(max_retries);
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.options = self.options.retry_policy(policy);
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, min: Duration, max: Duration) -> Self {
        self.options = self.options.retry_delay(min, max);
        self
    }

    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.options = self.options.max_redirects(max_redirects);
        self
    }

    #[must_use]
    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.options = self.options.redirect_policy(policy);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.timeout(timeout);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.options = self.options.cancel(signal);
        self
    }

    /// Substitute `{name}` placeholders in one pass over the template, so
    /// braces inside a value are never read as placeholders. The last value
    /// given for a name wins.
    fn fill_path(&self) -> Result<String> {
        let template = self.path.as_str();
        if let Some((name, _)) = self
            .path_params
            .iter()
            .find(|(name, _)| !template.contains(&format!("{{{name}}}")))
        {
            return Err(RequestError::UnknownPathParam(name.clone()));
        }

        let mut path = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = self
                .path_params
                .iter()
                .rev()
                .find(|(param, _)| param == name)
                .map(|(_, value)| value)
                .ok_or_else(|| RequestError::UnfilledPathParam(name.to_owned()))?;
            path.push_str(&rest[..start]);
            path.push_str(value);
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);
        Ok(path)
    }

    /// Resolve path parameters, join with the base URL and append the query.
    fn url(&self) -> Result<Url> {
        let path = self.fill_path()?;

        let raw = join_url(&self.config.base_url, &path);
        let mut url = Url::parse(&raw).map_err(|e| RequestError::InvalidUrl {
            url:    raw.clone(),
            reason: e.to_string(),
        })?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Config headers overlaid with request headers, by name.
    fn merged_headers(&self) -> HeaderMap {
        let mut headers = self.config.headers.clone();
        for name in self.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &self.headers {
            headers.append(name.clone(), value.clone());
        }
        headers
    }
}

impl<T: Transport> Request<T> {
    /// Send the request and return the response to assert on.
    ///
    /// Never returns an error: delivery failures are reported through the
    /// chain and leave the response failed.
    pub async fn expect(self) -> Response {
        if self.chain.failed() {
            return Response::failed(self.chain.enter("Expect()"));
        }
        let url = match self.url() {
            Ok(url) => url,
            Err(e) => {
                self.usage(e);
                return Response::failed(self.chain.enter("Expect()"));
            }
        };

        let chain = self.chain.enter("Expect()");
        let request = DeliveryRequest {
            method: self.method.clone(),
            url,
            headers: self.merged_headers(),
            body: self.body.clone(),
        };
        debug!(method = %request.method, url = %request.url, path = %chain.path(), "sending request");

        let engine = Engine::new(Arc::clone(&self.config.transport));
        let delivery = engine.deliver(&request, &self.options, &chain).await;
        Response::from_delivery(chain, delivery).await
    }
}

fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    if path.is_empty() {
        return base.to_owned();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use httpexpect_chain::RecordingReporter;

    use super::*;

    fn request(base: &str, path: &str) -> (Request<()>, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let config = Arc::new(Config::new(()).base_url(base).reporter(reporter.clone()));
        let chain = Chain::root(r#"Request("GET")"#, config.reporter.clone());
        (Request::new(config, chain, Method::GET, path.to_owned()), reporter)
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h/api/", "/users"), "http://h/api/users");
        assert_eq!(join_url("http://h/api", "users"), "http://h/api/users");
        assert_eq!(join_url("", "http://h/x"), "http://h/x");
        assert_eq!(join_url("http://h", "https://other/x"), "https://other/x");
        assert_eq!(join_url("http://h/api", ""), "http://h/api");
    }

    #[test]
    fn test_path_params_and_query() {
        let (request, reporter) = request("http://h/api", "/users/{id}/posts/{post}");
        let request = request
            .path_param("id", 42)
            .path_param("post", "first")
            .query("page", 2)
            .query("q", "a b");

        let url = request.url().unwrap();
        assert_eq!(url.as_str(), "http://h/api/users/42/posts/first?page=2&q=a+b");
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_path_param_errors() {
        let (request, _) = request("http://h", "/users/{id}");
        assert_eq!(request.url().unwrap_err(), RequestError::UnfilledPathParam("id".into()));

        let (request, _) = request_with("/users/{id}", |r| r.path_param("name", "x"));
        assert_eq!(request.url().unwrap_err(), RequestError::UnknownPathParam("name".into()));
    }

    #[test]
    fn test_path_param_values_are_not_rescanned() {
        let (request, _) = request_with("/search/{q}", |r| r.path_param("q", "{x}"));
        assert_eq!(request.url().unwrap().path(), "/search/%7Bx%7D");

        let (request, _) = request_with("/{a}/{b}", |r| r.path_param("a", "{b}").path_param("b", "2"));
        assert_eq!(request.url().unwrap().path(), "/%7Bb%7D/2");

        let (request, _) = request_with("/users/{id}", |r| r.path_param("id", 1).path_param("id", 2));
        assert_eq!(request.url().unwrap().path(), "/users/2");
    }

    fn request_with(path: &str, f: impl FnOnce(Request<()>) -> Request<()>) -> (Request<()>, Arc<RecordingReporter>) {
        let (request, reporter) = request("http://h", path);
        (f(request), reporter)
    }

    #[test]
    fn test_invalid_header_fails_chain() {
        let (request, reporter) = request("http://h", "/");
        let request = request.header("bad header", "x");

        assert!(request.chain().failed());
        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Usage);
        assert_eq!(failures[0].path, r#"Request("GET")"#);
    }

    #[test]
    fn test_auth_headers() {
        let (request, _) = request("http://h", "/");
        let request = request.basic_auth("user", "pass");
        assert_eq!(request.headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");

        let request = request.bearer_auth("tok");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let (request, _) = request("http://h", "/");
        let request = request.json(&serde_json::json!({"a": 1}));
        assert_eq!(request.headers[CONTENT_TYPE], "application/json; charset=utf-8");
        assert!(request.body.is_some());

        let (request, _) = request_with("/", |r| r.header("content-type", "application/vnd.api+json").text("{}"));
        assert_eq!(request.headers[CONTENT_TYPE], "application/vnd.api+json");
    }

    #[test]
    fn test_request_headers_replace_defaults() {
        let reporter = Arc::new(RecordingReporter::new());
        let config = Arc::new(
            Config::new(())
                .reporter(reporter)
                .header(http::header::ACCEPT, HeaderValue::from_static("text/html"))
                .header(http::header::USER_AGENT, HeaderValue::from_static("suite")),
        );
        let chain = Chain::new(config.reporter.clone());
        let request = Request::new(config, chain, Method::GET, "/".into()).header("accept", "application/json");

        let headers = request.merged_headers();
        assert_eq!(headers[http::header::ACCEPT], "application/json");
        assert_eq!(headers[http::header::USER_AGENT], "suite");
    }

    #[test]
    fn test_overrides_start_from_config() {
        let (request, _) = request("http://h", "/");
        let request = request.with_max_retries(3).with_timeout(Duration::from_millis(5));
        assert_eq!(request.options.max_retries, 3);
        assert_eq!(request.options.timeout, Some(Duration::from_millis(5)));
        assert_eq!(request.options.redirect_policy, RedirectPolicy::FollowAllRedirects);
    }
}
