use httpexpect_chain::{AssertionFailure, Chain, FailureKind};

use super::label;

/// Assertions over a number. Every number is an `f64`.
#[derive(Debug, Clone)]
pub struct Number {
    chain: Chain,
    value: f64,
}

impl Number {
    pub fn new(chain: Chain, value: f64) -> Self { Self { chain, value } }

    pub fn raw(&self) -> f64 { self.value }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    fn compare(&self, segment: String, holds: impl FnOnce(f64) -> bool, message: String, expected: f64) -> &Self {
        let chain = self.chain.enter(segment);
        if chain.failed() {
            return self;
        }
        if self.value.is_nan() || expected.is_nan() {
            chain.fail(AssertionFailure::new(FailureKind::Usage).error("NaN cannot be compared"));
        } else if !holds(self.value) {
            chain.fail(AssertionFailure::assertion(message).expected(expected).actual(self.value));
        }
        self
    }

    pub fn is_equal(&self, expected: f64) -> &Self {
        self.compare(
            label("IsEqual", expected),
            |actual| actual == expected,
            "expected: numbers are equal".to_owned(),
            expected,
        )
    }

    pub fn not_equal(&self, unexpected: f64) -> &Self {
        self.compare(
            label("NotEqual", unexpected),
            |actual| actual != unexpected,
            "expected: numbers are not equal".to_owned(),
            unexpected,
        )
    }

    /// `|actual - expected| <= delta`.
    pub fn in_delta(&self, expected: f64, delta: f64) -> &Self {
        self.compare(
            format!("InDelta({expected:?}, {delta:?})"),
            |actual| (actual - expected).abs() <= delta,
            format!("expected: number within {delta} of {expected}"),
            expected,
        )
    }

    /// `min <= actual <= max`.
    pub fn in_range(&self, min: f64, max: f64) -> &Self {
        let chain = self.chain.enter(format!("InRange({min:?}, {max:?})"));
        if chain.failed() {
            return self;
        }
        if min.is_nan() || max.is_nan() || min > max {
            chain.fail(AssertionFailure::new(FailureKind::Usage).error(format!("invalid range [{min}, {max}]")));
        } else if !(min..=max).contains(&self.value) {
            chain.fail(
                AssertionFailure::assertion(format!("expected: number in range [{min}, {max}]"))
                    .actual(self.value),
            );
        }
        self
    }

    pub fn gt(&self, bound: f64) -> &Self {
        self.compare(label("Gt", bound), |actual| actual > bound, format!("expected: number > {bound}"), bound)
    }

    pub fn ge(&self, bound: f64) -> &Self {
        self.compare(label("Ge", bound), |actual| actual >= bound, format!("expected: number >= {bound}"), bound)
    }

    pub fn lt(&self, bound: f64) -> &Self {
        self.compare(label("Lt", bound), |actual| actual < bound, format!("expected: number < {bound}"), bound)
    }

    pub fn le(&self, bound: f64) -> &Self {
        self.compare(label("Le", bound), |actual| actual <= bound, format!("expected: number <= {bound}"), bound)
    }
}
