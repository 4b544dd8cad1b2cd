use std::time::Duration;

use crate::data::RetryPolicy;

/// Back-off before retry number `retry` (0 = first retry).
///
/// The delay formula is `min * 2^retry`, capped at `max`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use httpexpect_delivery::core::retry_delay;
///
/// let min = Duration::from_millis(50);
/// let max = Duration::from_secs(5);
///
/// assert_eq!(retry_delay(0, min, max), Duration::from_millis(50));
/// assert_eq!(retry_delay(1, min, max), Duration::from_millis(100));
/// assert_eq!(retry_delay(10, min, max), max);
/// ```
pub fn retry_delay(retry: u32, min: Duration, max: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry);
    min.saturating_mul(multiplier).min(max)
}

/// Whether a transport error warrants another attempt.
pub fn should_retry_error(policy: RetryPolicy, temporary: bool) -> bool {
    match policy {
        RetryPolicy::DontRetry => false,
        RetryPolicy::RetryTemporaryNetworkErrors
        | RetryPolicy::RetryTemporaryNetworkAndServerErrors => temporary,
        RetryPolicy::RetryAllErrors => true,
    }
}

/// Whether a response status warrants another attempt.
pub fn should_retry_status(policy: RetryPolicy, status: u16) -> bool {
    match policy {
        RetryPolicy::DontRetry | RetryPolicy::RetryTemporaryNetworkErrors => false,
        RetryPolicy::RetryTemporaryNetworkAndServerErrors => (500..600).contains(&status),
        RetryPolicy::RetryAllErrors => (400..600).contains(&status),
    }
}
