use httpexpect_chain::{AssertionFailure, Chain};

use super::label;

#[derive(Debug, Clone)]
pub struct Boolean {
    chain: Chain,
    value: bool,
}

impl Boolean {
    pub fn new(chain: Chain, value: bool) -> Self { Self { chain, value } }

    pub fn raw(&self) -> bool { self.value }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    pub fn is_true(&self) -> &Self { self.check("IsTrue()".to_owned(), true) }

    pub fn is_false(&self) -> &Self { self.check("IsFalse()".to_owned(), false) }

    pub fn is_equal(&self, expected: bool) -> &Self { self.check(label("IsEqual", expected), expected) }

    fn check(&self, segment: String, expected: bool) -> &Self {
        let chain = self.chain.enter(segment);
        if !chain.failed() && self.value != expected {
            chain.fail(
                AssertionFailure::assertion(format!("expected: {expected}"))
                    .expected(expected)
                    .actual(self.value),
            );
        }
        self
    }
}
