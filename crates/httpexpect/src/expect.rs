use std::sync::Arc;

use http::Method;
use httpexpect_chain::{Chain, Value};
use serde::Serialize;

use crate::assert::{ValueAssert, canonical, label};
use crate::config::Config;
use crate::request::Request;

/// Entry point: creates requests and standalone value assertions.
///
/// Cheap to clone; clones share the config and report into the same
/// reporter.
pub struct Expect<T> {
    config: Arc<Config<T>>,
    chain:  Chain,
}

impl<T> Expect<T> {
    pub fn new(config: Config<T>) -> Self {
        let chain = Chain::new(Arc::clone(&config.reporter));
        Self {
            config: Arc::new(config),
            chain,
        }
    }

    pub fn config(&self) -> &Config<T> { &self.config }

    pub fn chain(&self) -> &Chain { &self.chain }

    /// Start a request. `path` is joined with the configured base URL and
    /// may contain `{name}` placeholders.
    pub fn request(&self, method: Method, path: impl Into<String>) -> Request<T> {
        let chain = self.chain.enter(label("Request", method.as_str()));
        Request::new(Arc::clone(&self.config), chain, method, path.into())
    }

    pub fn get(&self, path: impl Into<String>) -> Request<T> { self.request(Method::GET, path) }

    pub fn post(&self, path: impl Into<String>) -> Request<T> { self.request(Method::POST, path) }

    pub fn put(&self, path: impl Into<String>) -> Request<T> { self.request(Method::PUT, path) }

    pub fn patch(&self, path: impl Into<String>) -> Request<T> { self.request(Method::PATCH, path) }

    pub fn delete(&self, path: impl Into<String>) -> Request<T> { self.request(Method::DELETE, path) }

    pub fn head(&self, path: impl Into<String>) -> Request<T> { self.request(Method::HEAD, path) }

    pub fn options(&self, path: impl Into<String>) -> Request<T> { self.request(Method::OPTIONS, path) }

    /// Assert on an arbitrary serializable value, no HTTP involved.
    pub fn value<V: Serialize + ?Sized>(&self, value: &V) -> ValueAssert {
        let chain = self.chain.enter("Value()");
        let value = canonical(&chain, value).unwrap_or(Value::Null);
        ValueAssert::new(chain, value)
    }
}

impl<T> Clone for Expect<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            chain:  self.chain.clone(),
        }
    }
}
