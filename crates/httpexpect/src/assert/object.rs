use std::collections::BTreeMap;

use httpexpect_chain::{AssertionFailure, Chain, Value};
use serde::Serialize;

use super::{Array, ValueAssert, canonical, label};

/// Assertions over a JSON object.
#[derive(Debug, Clone)]
pub struct Object {
    chain: Chain,
    map:   BTreeMap<String, Value>,
}

impl Object {
    pub fn new(chain: Chain, map: BTreeMap<String, Value>) -> Self { Self { chain, map } }

    pub fn raw(&self) -> &BTreeMap<String, Value> { &self.map }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Array {
        let chain = self.chain.enter("Keys()");
        let keys = self.map.keys().cloned().map(Value::String).collect();
        Array::new(chain, keys)
    }

    pub fn is_empty(&self) -> &Self {
        let chain = self.chain.enter("IsEmpty()");
        if !chain.failed() && !self.map.is_empty() {
            chain.fail(
                AssertionFailure::assertion("expected: object is empty").actual(Value::Object(self.map.clone())),
            );
        }
        self
    }

    pub fn not_empty(&self) -> &Self {
        let chain = self.chain.enter("NotEmpty()");
        if !chain.failed() && self.map.is_empty() {
            chain.fail(AssertionFailure::assertion("expected: object is not empty"));
        }
        self
    }

    pub fn contains_key(&self, key: &str) -> &Self {
        let chain = self.chain.enter(label("ContainsKey", key));
        if !chain.failed() && !self.map.contains_key(key) {
            chain.fail(
                AssertionFailure::assertion(format!("expected: object contains key {key:?}"))
                    .actual(Value::Object(self.map.clone())),
            );
        }
        self
    }

    pub fn not_contains_key(&self, key: &str) -> &Self {
        let chain = self.chain.enter(label("NotContainsKey", key));
        if !chain.failed() && self.map.contains_key(key) {
            chain.fail(
                AssertionFailure::assertion(format!("expected: object does not contain key {key:?}"))
                    .actual(Value::Object(self.map.clone())),
            );
        }
        self
    }

    /// Extract the value under `key`. A missing key fails the returned
    /// wrapper's chain.
    pub fn value(&self, key: &str) -> ValueAssert {
        let chain = self.chain.enter(label("Value", key));
        if chain.failed() {
            return ValueAssert::new(chain, Value::Null);
        }
        match self.map.get(key) {
            Some(value) => ValueAssert::new(chain, value.clone()),
            None => {
                chain.fail(
                    AssertionFailure::assertion(format!("expected: object contains key {key:?}"))
                        .actual(Value::Object(self.map.clone())),
                );
                ValueAssert::new(chain, Value::Null)
            }
        }
    }

    pub fn is_equal<T: Serialize + ?Sized>(&self, expected: &T) -> &Self {
        let chain = self.chain.enter("IsEqual()");
        if chain.failed() {
            return self;
        }
        let Some(expected) = canonical(&chain, expected) else {
            return self;
        };
        let actual = Value::Object(self.map.clone());
        if actual != expected {
            chain.fail(
                AssertionFailure::assertion("expected: objects are equal")
                    .expected(expected)
                    .actual(actual),
            );
        }
        self
    }

    /// Every key of `subset` is present with a matching value, recursively.
    pub fn contains_subset<T: Serialize + ?Sized>(&self, subset: &T) -> &Self {
        let chain = self.chain.enter("ContainsSubset()");
        if chain.failed() {
            return self;
        }
        let Some(subset) = canonical(&chain, subset) else {
            return self;
        };
        let actual = Value::Object(self.map.clone());
        if !actual.contains_subset(&subset) {
            chain.fail(
                AssertionFailure::assertion("expected: object contains subset")
                    .expected(subset)
                    .actual(actual),
            );
        }
        self
    }
}
