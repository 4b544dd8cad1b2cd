use serde::{Deserialize, Serialize};

/// Which outcomes of an attempt are worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Never retry.
    DontRetry,

    /// Retry transport errors classified as temporary network conditions.
    RetryTemporaryNetworkErrors,

    /// Like `RetryTemporaryNetworkErrors`, and also retry 5xx responses.
    #[default]
    RetryTemporaryNetworkAndServerErrors,

    /// Retry every transport error and every 4xx/5xx response.
    RetryAllErrors,
}

/// Whether and how redirect responses are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    /// Return the redirect response as final.
    DontFollowRedirects,

    /// Follow every redirect. 307 and 308 resend method and body.
    #[default]
    FollowAllRedirects,

    /// Follow every redirect, never resending the body.
    FollowRedirectsWithoutBody,
}
