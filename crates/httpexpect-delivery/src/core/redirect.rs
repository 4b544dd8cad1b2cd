use http::header::{
    AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HeaderMap, PROXY_AUTHORIZATION,
    TRANSFER_ENCODING,
};
use http::Method;
use url::Url;

use crate::data::RedirectPolicy;

/// Returns `true` if the HTTP status code indicates a redirect.
///
/// # Recognized Redirect Codes
///
/// - 301: Moved Permanently
/// - 302: Found
/// - 303: See Other
/// - 307: Temporary Redirect
/// - 308: Permanent Redirect
///
/// # Examples
///
/// ```
/// use httpexpect_delivery::core::is_redirect;
///
/// assert!(is_redirect(301));
/// assert!(is_redirect(308));
/// assert!(!is_redirect(200));
/// assert!(!is_redirect(304));
/// ```
pub fn is_redirect(status: u16) -> bool { matches!(status, 301 | 302 | 303 | 307 | 308) }

/// How the next hop of a followed redirect is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub method:    Method,
    pub keep_body: bool,
}

/// Decide whether and how to follow a redirect `status` for a request sent
/// with `method`.
///
/// - 301, 302, 303: methods other than GET and HEAD become GET; the body is
///   dropped.
/// - 307, 308: method kept; body kept only under `FollowAllRedirects`.
///
/// Returns `None` when the policy forbids following or `status` is not a
/// redirect.
pub fn follow_redirect(status: u16, method: &Method, policy: RedirectPolicy) -> Option<Redirect> {
    if policy == RedirectPolicy::DontFollowRedirects {
        return None;
    }

    match status {
        301..=303 => {
            let method = if *method == Method::GET || *method == Method::HEAD {
                method.clone()
            } else {
                Method::GET
            };
            Some(Redirect {
                method,
                keep_body: false,
            })
        }
        307 | 308 => Some(Redirect {
            method:    method.clone(),
            keep_body: policy == RedirectPolicy::FollowAllRedirects,
        }),
        _ => None,
    }
}

/// Resolve a `Location` header value against the URL that produced it.
pub fn resolve_location(current: &Url, location: &str) -> Result<Url, url::ParseError> {
    current.join(location)
}

/// Remove headers that must not travel to the next hop.
///
/// Body framing headers go when the body is dropped; credentials go when
/// the redirect leaves the original host.
pub fn strip_headers(headers: &mut HeaderMap, keep_body: bool, from: &Url, to: &Url) {
    if !keep_body {
        headers.remove(CONTENT_TYPE);
        headers.remove(CONTENT_LENGTH);
        headers.remove(TRANSFER_ENCODING);
    }

    let same_origin =
        from.host_str() == to.host_str() && from.port_or_known_default() == to.port_or_known_default();
    if !same_origin {
        headers.remove(AUTHORIZATION);
        headers.remove(PROXY_AUTHORIZATION);
        headers.remove(COOKIE);
    }
}
