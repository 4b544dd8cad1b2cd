use httpexpect_chain::{AssertionFailure, Chain, FailureKind, Value};
use regex::Regex;

use super::{Number, label};

/// Assertions over a string.
#[derive(Debug, Clone)]
pub struct Str {
    chain: Chain,
    value: String,
}

impl Str {
    pub fn new(chain: Chain, value: String) -> Self { Self { chain, value } }

    pub fn raw(&self) -> &str { &self.value }

    pub fn chain(&self) -> &Chain { &self.chain }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.chain.set_alias(name);
        self
    }

    /// Run `check` under a child node labelled `segment`.
    fn check(&self, segment: String, holds: impl FnOnce(&str) -> bool, failure: impl FnOnce() -> AssertionFailure) -> &Self {
        let chain = self.chain.enter(segment);
        if !chain.failed() && !holds(&self.value) {
            chain.fail(failure().actual(self.value.as_str()));
        }
        self
    }

    pub fn is_equal(&self, expected: &str) -> &Self {
        self.check(
            label("IsEqual", expected),
            |actual| actual == expected,
            || AssertionFailure::assertion("expected: strings are equal").expected(expected),
        )
    }

    pub fn not_equal(&self, unexpected: &str) -> &Self {
        self.check(
            label("NotEqual", unexpected),
            |actual| actual != unexpected,
            || AssertionFailure::assertion("expected: strings are not equal"),
        )
    }

    /// Case-insensitive equality.
    pub fn is_equal_fold(&self, expected: &str) -> &Self {
        self.check(
            label("IsEqualFold", expected),
            |actual| actual.to_lowercase() == expected.to_lowercase(),
            || AssertionFailure::assertion("expected: strings are equal ignoring case").expected(expected),
        )
    }

    pub fn contains(&self, needle: &str) -> &Self {
        self.check(
            label("Contains", needle),
            |actual| actual.contains(needle),
            || AssertionFailure::assertion(format!("expected: string contains {needle:?}")),
        )
    }

    pub fn not_contains(&self, needle: &str) -> &Self {
        self.check(
            label("NotContains", needle),
            |actual| !actual.contains(needle),
            || AssertionFailure::assertion(format!("expected: string does not contain {needle:?}")),
        )
    }

    pub fn has_prefix(&self, prefix: &str) -> &Self {
        self.check(
            label("HasPrefix", prefix),
            |actual| actual.starts_with(prefix),
            || AssertionFailure::assertion(format!("expected: string starts with {prefix:?}")),
        )
    }

    pub fn has_suffix(&self, suffix: &str) -> &Self {
        self.check(
            label("HasSuffix", suffix),
            |actual| actual.ends_with(suffix),
            || AssertionFailure::assertion(format!("expected: string ends with {suffix:?}")),
        )
    }

    /// The string matches regular expression `pattern` anywhere.
    pub fn matches(&self, pattern: &str) -> &Self {
        let chain = self.chain.enter(label("Matches", pattern));
        if chain.failed() {
            return self;
        }
        match Regex::new(pattern) {
            Ok(re) if re.is_match(&self.value) => {}
            Ok(_) => chain.fail(
                AssertionFailure::assertion(format!("expected: string matches {pattern:?}"))
                    .actual(self.value.as_str()),
            ),
            Err(e) => chain.fail(AssertionFailure::new(FailureKind::Usage).error(e.to_string())),
        }
        self
    }

    pub fn is_empty(&self) -> &Self {
        self.check(
            "IsEmpty()".to_owned(),
            str::is_empty,
            || AssertionFailure::assertion("expected: string is empty"),
        )
    }

    pub fn not_empty(&self) -> &Self {
        self.check(
            "NotEmpty()".to_owned(),
            |actual| !actual.is_empty(),
            || AssertionFailure::assertion("expected: string is not empty"),
        )
    }

    /// Length in characters.
    pub fn length(&self) -> Number { Number::new(self.chain.enter("Length()"), self.value.chars().count() as f64) }

    /// Parse the string as a number. Unparsable input fails the returned
    /// wrapper's chain.
    pub fn as_number(&self) -> Number {
        let chain = self.chain.enter("AsNumber()");
        if chain.failed() {
            return Number::new(chain, 0.0);
        }
        match self.value.trim().parse::<f64>() {
            Ok(n) => Number::new(chain, n),
            Err(e) => {
                chain.fail(
                    AssertionFailure::assertion(format!("string is not a number: {e}"))
                        .actual(Value::String(self.value.clone())),
                );
                Number::new(chain, 0.0)
            }
        }
    }
}
