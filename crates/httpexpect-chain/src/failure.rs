use std::fmt;

use crate::value::Value;

/// Cause tag attached to every reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The transport returned an error.
    Transport,
    /// The per-call deadline elapsed.
    Timeout,
    /// The external cancel signal fired.
    Cancelled,
    /// Retries ran out while the last attempt still failed.
    PolicyExhausted,
    /// The body source failed while it was being buffered.
    BodyRead,
    /// A predicate on response data did not hold.
    Assertion,
    /// The API was used incorrectly (bad URL, bad header, bad argument).
    Usage,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Transport => "transport error",
            FailureKind::Timeout => "timeout exceeded",
            FailureKind::Cancelled => "externally cancelled",
            FailureKind::PolicyExhausted => "retries exhausted",
            FailureKind::BodyRead => "body read error",
            FailureKind::Assertion => "assertion failed",
            FailureKind::Usage => "invalid usage",
        };
        f.write_str(name)
    }
}

/// How a failure should be surfaced by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// The test must fail.
    #[default]
    Fatal,
    /// The failure is informational; reporters may only log it.
    NonFatal,
}

/// Structured description of one failing chain node.
///
/// Built at the failure site with the builder methods; the chain fills in
/// `path`, `alias_path` and `severity` before handing it to the reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionFailure {
    pub kind:       FailureKind,
    pub severity:   Severity,
    /// Full path, e.g. `Request("GET").Expect().JSON().Object().Value("id")`.
    pub path:       String,
    /// Path rendered from the nearest alias downwards.
    pub alias_path: String,
    pub actual:     Option<Value>,
    pub expected:   Option<Value>,
    pub errors:     Vec<String>,
}

impl AssertionFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            severity: Severity::Fatal,
            path: String::new(),
            alias_path: String::new(),
            actual: None,
            expected: None,
            errors: Vec::new(),
        }
    }

    /// Shorthand for an [`FailureKind::Assertion`] failure with one message.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion).error(message)
    }

    #[must_use]
    pub fn actual(mut self, value: impl Into<Value>) -> Self {
        self.actual = Some(value.into());
        self
    }

    #[must_use]
    pub fn expected(mut self, value: impl Into<Value>) -> Self {
        self.expected = Some(value.into());
        self
    }

    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    pub fn is_fatal(&self) -> bool { self.severity == Severity::Fatal }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        if !self.path.is_empty() {
            writeln!(f, "\nassertion:\n  {}", self.path)?;
        }
        if !self.alias_path.is_empty() && self.alias_path != self.path {
            writeln!(f, "\nalias:\n  {}", self.alias_path)?;
        }
        if let Some(expected) = &self.expected {
            writeln!(f, "\nexpected:\n  {expected}")?;
        }
        if let Some(actual) = &self.actual {
            writeln!(f, "\nactual:\n  {actual}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_everything() {
        let mut failure = AssertionFailure::assertion("values differ")
            .expected(200u64)
            .actual(404u64);
        failure.path = "Expect().Status(200)".into();
        failure.alias_path = "login.Status(200)".into();

        let text = failure.to_string();
        assert!(text.starts_with("assertion failed"));
        assert!(text.contains("values differ"));
        assert!(text.contains("Expect().Status(200)"));
        assert!(text.contains("login.Status(200)"));
        assert!(text.contains("expected:\n  200"));
        assert!(text.contains("actual:\n  404"));
    }

    #[test]
    fn test_alias_path_hidden_when_same_as_path() {
        let mut failure = AssertionFailure::new(FailureKind::Timeout);
        failure.path = "Expect()".into();
        failure.alias_path = "Expect()".into();
        assert!(!failure.to_string().contains("alias:"));
    }
}
