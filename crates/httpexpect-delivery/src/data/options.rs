use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::policy::{RedirectPolicy, RetryPolicy};
use crate::effects::CancelSignal;

/// Redirect cap applied when `max_redirects` is left unset.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Configuration for one logical call.
///
/// # Examples
///
/// ```
/// use httpexpect_delivery::{DeliveryOptions, RetryPolicy};
/// use std::time::Duration;
///
/// let options = DeliveryOptions::default()
///     .max_retries(3)
///     .retry_policy(RetryPolicy::RetryAllErrors)
///     .timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryOptions {
    /// Retries after the first attempt of every hop.
    ///
    /// Total attempts per hop = 1 + max_retries. The bound is absolute:
    /// no policy can exceed it.
    ///
    /// Default: 0
    pub max_retries: u32,

    /// Which attempt outcomes are retried.
    ///
    /// Default: `RetryTemporaryNetworkAndServerErrors`
    pub retry_policy: RetryPolicy,

    /// Back-off before the first retry; doubles on every further retry.
    ///
    /// Default: 50ms
    pub min_retry_delay: Duration,

    /// Upper bound of the back-off.
    ///
    /// Default: 5s
    pub max_retry_delay: Duration,

    /// Redirect hops to follow. `None` applies [`DEFAULT_MAX_REDIRECTS`].
    ///
    /// Default: None
    pub max_redirects: Option<u32>,

    /// How redirect responses are handled.
    ///
    /// Default: `FollowAllRedirects`
    pub redirect_policy: RedirectPolicy,

    /// Deadline for the whole logical call: every attempt, back-off sleep
    /// and redirect hop.
    ///
    /// Default: None
    pub timeout: Option<Duration>,

    /// Externally owned signal; firing it aborts the call.
    ///
    /// Default: None
    #[serde(skip)]
    pub cancel: Option<CancelSignal>,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            max_retries:     0,
            retry_policy:    RetryPolicy::default(),
            min_retry_delay: Duration::from_millis(50),
            max_retry_delay: Duration::from_secs(5),
            max_redirects:   None,
            redirect_policy: RedirectPolicy::default(),
            timeout:         None,
            cancel:          None,
        }
    }
}

impl DeliveryOptions {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Set the back-off bounds.
    #[must_use]
    pub fn retry_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_retry_delay = min;
        self.max_retry_delay = max.max(min);
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    #[must_use]
    pub fn redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// The redirect cap actually enforced.
    pub fn redirect_limit(&self) -> u32 { self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DeliveryOptions::default();
        assert_eq!(options.max_retries, 0);
        assert_eq!(options.min_retry_delay, Duration::from_millis(50));
        assert_eq!(options.max_retry_delay, Duration::from_secs(5));
        assert_eq!(options.redirect_limit(), DEFAULT_MAX_REDIRECTS);
        assert!(options.timeout.is_none());
        assert!(options.cancel.is_none());
    }

    #[test]
    fn test_builder() {
        let options = DeliveryOptions::default()
            .max_retries(2)
            .retry_policy(RetryPolicy::DontRetry)
            .retry_delay(Duration::from_millis(10), Duration::from_millis(5))
            .max_redirects(3)
            .redirect_policy(RedirectPolicy::DontFollowRedirects)
            .timeout(Duration::from_secs(1));

        assert_eq!(options.max_retries, 2);
        assert_eq!(options.retry_policy, RetryPolicy::DontRetry);
        // max is clamped up to min
        assert_eq!(options.max_retry_delay, Duration::from_millis(10));
        assert_eq!(options.redirect_limit(), 3);
        assert_eq!(options.redirect_policy, RedirectPolicy::DontFollowRedirects);
        assert_eq!(options.timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: DeliveryOptions = serde_json::from_str(
            r#"{"max_retries": 4, "retry_policy": "retry_all_errors", "max_redirects": 2}"#,
        )
        .unwrap();
        assert_eq!(options.max_retries, 4);
        assert_eq!(options.retry_policy, RetryPolicy::RetryAllErrors);
        assert_eq!(options.max_redirects, Some(2));
        assert_eq!(options.redirect_policy, RedirectPolicy::FollowAllRedirects);
    }
}
