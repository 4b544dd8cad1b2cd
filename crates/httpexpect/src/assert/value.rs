use httpexpect_chain::{AssertionFailure, Chain, Value};
use serde::Serialize;

use super::{Array, Boolean, Number, Object, Str, canonical, kind_mismatch};

/// Assertions over a value of any kind.
#[derive(Debug, Clone)]
pub struct ValueAssert {
    chain: Chain,
    value: Value,
}

impl ValueAssert {
    pub fn new(chain: Chain, value: Value) -> Self { Self { chain, value } }

    pub fn raw(&self) -> &Value { &self.value }

    pub fn chain(&self) -> &Chain { &self.chain }

    /// Rename this node in failure paths of everything entered from it.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    pub fn is_null(&self) -> &Self {
        let chain = self.chain.enter("IsNull()");
        if !chain.failed() && !self.value.is_null() {
            chain.fail(AssertionFailure::assertion("expected: value is null").actual(self.value.clone()));
        }
        self
    }

    pub fn not_null(&self) -> &Self {
        let chain = self.chain.enter("NotNull()");
        if !chain.failed() && self.value.is_null() {
            chain.fail(AssertionFailure::assertion("expected: value is not null"));
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
        if self.value != expected {
            chain.fail(
                AssertionFailure::assertion("expected: values are equal")
                    .expected(expected)
                    .actual(self.value.clone()),
            );
        }
        self
    }

    pub fn not_equal<T: Serialize + ?Sized>(&self, unexpected: &T) -> &Self {
        let chain = self.chain.enter("NotEqual()");
        if chain.failed() {
            return self;
        }
        let Some(unexpected) = canonical(&chain, unexpected) else {
            return self;
        };
        if self.value == unexpected {
            chain.fail(AssertionFailure::assertion("expected: values are not equal").actual(unexpected));
        }
        self
    }

    pub fn object(&self) -> Object {
        let chain = self.chain.enter("Object()");
        match &self.value {
            Value::Object(map) if !chain.failed() => Object::new(chain, map.clone()),
            other => {
                if !chain.failed() {
                    kind_mismatch(&chain, "object", other);
                }
                Object::new(chain, Default::default())
            }
        }
    }

    pub fn array(&self) -> Array {
        let chain = self.chain.enter("Array()");
        match &self.value {
            Value::Array(items) if !chain.failed() => Array::new(chain, items.clone()),
            other => {
                if !chain.failed() {
                    kind_mismatch(&chain, "array", other);
                }
                Array::new(chain, Vec::new())
            }
        }
    }

    pub fn string(&self) -> Str {
        let chain = self.chain.enter("String()");
        match &self.value {
            Value::String(s) if !chain.failed() => Str::new(chain, s.clone()),
            other => {
                if !chain.failed() {
                    kind_mismatch(&chain, "string", other);
                }
                Str::new(chain, String::new())
            }
        }
    }

    pub fn number(&self) -> Number {
        let chain = self.chain.enter("Number()");
        match &self.value {
            Value::Number(n) if !chain.failed() => Number::new(chain, *n),
            other => {
                if !chain.failed() {
                    kind_mismatch(&chain, "number", other);
                }
                Number::new(chain, 0.0)
            }
        }
    }

    pub fn boolean(&self) -> Boolean {
        let chain = self.chain.enter("Boolean()");
        match &self.value {
            Value::Bool(b) if !chain.failed() => Boolean::new(chain, *b),
            other => {
                if !chain.failed() {
                    kind_mismatch(&chain, "boolean", other);
                }
                Boolean::new(chain, false)
            }
        }
    }
}
