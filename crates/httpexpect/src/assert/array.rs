use httpexpect_chain::{AssertionFailure, Chain, Value};
use serde::Serialize;

use super::{Number, ValueAssert, canonical, label};

/// Assertions over a JSON array.
#[derive(Debug, Clone)]
pub struct Array {
    chain: Chain,
    items: Vec<Value>,
}

impl Array {
    pub fn new(chain: Chain, items: Vec<Value>) -> Self { Self { chain, items } }

    pub fn raw(&self) -> &[Value] { &self.items }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    pub fn length(&self) -> Number { Number::new(self.chain.enter("Length()"), self.items.len() as f64) }

    pub fn is_empty(&self) -> &Self {
        let chain = self.chain.enter("IsEmpty()");
        if !chain.failed() && !self.items.is_empty() {
            chain.fail(AssertionFailure::assertion("expected: array is empty").actual(self.snapshot()));
        }
        self
    }

    pub fn not_empty(&self) -> &Self {
        let chain = self.chain.enter("NotEmpty()");
        if !chain.failed() && self.items.is_empty() {
            chain.fail(AssertionFailure::assertion("expected: array is not empty"));
        }
        self
    }

    /// Extract the element at `index`. Out of bounds fails the returned
    /// wrapper's chain.
    pub fn element(&self, index: usize) -> ValueAssert { self.pick(label("Element", index), Some(index)) }

    pub fn first(&self) -> ValueAssert { self.pick("First()".to_owned(), Some(0)) }

    pub fn last(&self) -> ValueAssert { self.pick("Last()".to_owned(), self.items.len().checked_sub(1)) }

    fn pick(&self, segment: String, index: Option<usize>) -> ValueAssert {
        let chain = self.chain.enter(segment);
        if chain.failed() {
            return ValueAssert::new(chain, Value::Null);
        }
        match index.and_then(|i| self.items.get(i)) {
            Some(item) => ValueAssert::new(chain, item.clone()),
            None => {
                let message = match index {
                    Some(i) => format!("index {i} out of bounds for array of length {}", self.items.len()),
                    None => "array is empty".to_owned(),
                };
                chain.fail(AssertionFailure::assertion(message).actual(self.snapshot()));
                ValueAssert::new(chain, Value::Null)
            }
        }
    }

    /// At least one element equals `expected`.
    pub fn contains<T: Serialize + ?Sized>(&self, expected: &T) -> &Self {
        let chain = self.chain.enter("Contains()");
        if chain.failed() {
            return self;
        }
        let Some(expected) = canonical(&chain, expected) else {
            return self;
        };
        if !self.items.contains(&expected) {
            chain.fail(
                AssertionFailure::assertion("expected: array contains element")
                    .expected(expected)
                    .actual(self.snapshot()),
            );
        }
        self
    }

    pub fn is_equal<T: Serialize + ?Sized>(&self, expected: &T) -> &Self {
        let chain = self.chain.enter("IsEqual()");
        if chain.failed() {
            return self;
        }
        let Some(expected) = canonical(&chain, expected) else {
            return self;
        };
        let actual = self.snapshot();
        if actual != expected {
            chain.fail(
                AssertionFailure::assertion("expected: arrays are equal")
                    .expected(expected)
                    .actual(actual),
            );
        }
        self
    }

    fn snapshot(&self) -> Value { Value::Array(self.items.clone()) }
}
