//! The delivery loop.
//!
//! One logical call = an outer loop over redirect hops and, per hop, an
//! inner loop over retry attempts:
//!
//! ```text
//! hop 0:  attempt 0 ─ retry? ─ attempt 1 ─ ... ─ attempt R   (R = max_retries)
//!            │
//!         redirect? ── hop 1: attempt 0 ─ ...                (up to the redirect cap)
//! ```
//!
//! Both loops are strictly sequential. The deadline and the cancel signal
//! guard every send and every back-off sleep; either one stops the whole
//! call and is never retried.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::header::LOCATION;
use http::{HeaderMap, Method};
use httpexpect_body::BodyWrapper;
use httpexpect_chain::{AssertionFailure, Chain};
use tokio::time::Instant as Deadline;
use tracing::{debug, trace, warn};
use url::Url;

use super::cancel::CancelSignal;
use super::transport::Transport;
use crate::core::{
    follow_redirect, is_redirect, resolve_location, retry_delay, should_retry_error,
    should_retry_status, strip_headers,
};
use crate::data::{
    AttemptOutcome, AttemptRecord, DeliveryOptions, DeliveryRequest, StopReason, TransportRequest,
    TransportResponse,
};
use crate::error::{DeliveryError, Result};

/// Everything one logical call produced.
#[derive(Debug)]
pub struct Delivery {
    /// Final response, or the failure that ended the call.
    pub outcome:   Result<TransportResponse>,
    /// Every send, in order, across all hops.
    pub attempts:  Vec<AttemptRecord>,
    /// Redirect hops followed.
    pub redirects: u32,
    /// Wall time of the whole call.
    pub elapsed:   Duration,
}

impl Delivery {
    pub fn response(&self) -> Option<&TransportResponse> { self.outcome.as_ref().ok() }

    pub fn error(&self) -> Option<&DeliveryError> { self.outcome.as_ref().err() }

    /// Number of times the transport was invoked.
    pub fn attempt_count(&self) -> usize { self.attempts.len() }
}

/// Drives a [`Transport`] through retries, redirects, timeout and
/// cancellation.
pub struct Engine<T> {
    transport: Arc<T>,
}

impl<T> Clone for Engine<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

/// Target of the current hop.
struct Target {
    method:  Method,
    url:     Url,
    headers: HeaderMap,
    body:    Option<Arc<BodyWrapper>>,
}

/// Deadline and cancel signal shared by every await of one call.
struct Guard<'a> {
    timeout:  Option<Duration>,
    deadline: Option<Deadline>,
    cancel:   Option<&'a CancelSignal>,
}

impl Guard<'_> {
    fn check(&self) -> std::result::Result<(), StopReason> {
        if self.cancel.is_some_and(CancelSignal::is_cancelled) {
            return Err(StopReason::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Deadline::now() >= deadline) {
            return Err(StopReason::Timeout);
        }
        Ok(())
    }

    /// Run `fut` unless the deadline or the cancel signal fires first.
    async fn run<F: Future>(&self, fut: F) -> std::result::Result<F::Output, StopReason> {
        self.check()?;
        tokio::select! {
            biased;
            _ = cancelled(self.cancel) => Err(StopReason::Cancelled),
            _ = expired(self.deadline) => Err(StopReason::Timeout),
            output = fut => Ok(output),
        }
    }

    fn error(&self, reason: StopReason) -> DeliveryError {
        match reason {
            StopReason::Cancelled => DeliveryError::Cancelled,
            StopReason::Timeout => DeliveryError::Timeout {
                timeout: self.timeout.unwrap_or_default(),
            },
        }
    }
}

async fn cancelled(signal: Option<&CancelSignal>) {
    match signal {
        Some(signal) => signal.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn expired(deadline: Option<Deadline>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<T: Transport> Engine<T> {
    pub fn new(transport: Arc<T>) -> Self { Self { transport } }

    pub fn transport(&self) -> &Arc<T> { &self.transport }

    /// Execute one logical call and report its failure, if any, into `chain`.
    ///
    /// Nothing is raised to the caller: a failed call leaves `chain` failed
    /// and the returned [`Delivery`] without a response.
    pub async fn deliver(&self, request: &DeliveryRequest, options: &DeliveryOptions, chain: &Chain) -> Delivery {
        let delivery = self.execute(request, options).await;
        if let Some(error) = delivery.error() {
            let failure = error
                .messages()
                .into_iter()
                .fold(AssertionFailure::new(error.failure_kind()), |failure, message| failure.error(message));
            chain.fail(failure);
        }
        delivery
    }

    /// Execute one logical call.
    pub async fn execute(&self, request: &DeliveryRequest, options: &DeliveryOptions) -> Delivery {
        let started = Instant::now();
        let guard = Guard {
            timeout:  options.timeout,
            deadline: options.timeout.map(|timeout| Deadline::now() + timeout),
            cancel:   options.cancel.as_ref(),
        };

        let mut attempts = Vec::new();
        let mut redirects = 0;
        let outcome = self
            .run(request, options, &guard, &mut attempts, &mut redirects)
            .await;
        let elapsed = started.elapsed();

        match &outcome {
            Ok(response) => debug!(
                method = %request.method,
                url = %request.url,
                status = response.status.as_u16(),
                attempts = attempts.len(),
                redirects,
                elapsed_ms = elapsed.as_millis() as u64,
                "logical call completed"
            ),
            Err(error) => warn!(
                method = %request.method,
                url = %request.url,
                attempts = attempts.len(),
                redirects,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                "logical call failed"
            ),
        }

        Delivery {
            outcome,
            attempts,
            redirects,
            elapsed,
        }
    }

    async fn run(
        &self,
        request: &DeliveryRequest,
        options: &DeliveryOptions,
        guard: &Guard<'_>,
        attempts: &mut Vec<AttemptRecord>,
        redirects: &mut u32,
    ) -> Result<TransportResponse> {
        let mut target = Target {
            method:  request.method.clone(),
            url:     request.url.clone(),
            headers: request.headers.clone(),
            body:    request.body.clone(),
        };
        let limit = options.redirect_limit();

        loop {
            let response = self
                .send_with_retries(&target, options, guard, attempts, *redirects)
                .await?;

            let status = response.status.as_u16();
            if !is_redirect(status) {
                return Ok(response);
            }
            let Some(redirect) = follow_redirect(status, &target.method, options.redirect_policy) else {
                return Ok(response);
            };
            let Some(location) = response.headers.get(LOCATION) else {
                debug!(status, "redirect without location, treating as final");
                return Ok(response);
            };
            if *redirects >= limit {
                warn!(limit, url = %target.url, "redirect limit reached, returning last redirect");
                return Ok(response);
            }

            let location = location
                .to_str()
                .map_err(|e| DeliveryError::InvalidRedirect {
                    location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                    reason:   e.to_string(),
                })?
                .to_owned();
            let next = resolve_location(&target.url, &location).map_err(|e| DeliveryError::InvalidRedirect {
                location: location.clone(),
                reason:   e.to_string(),
            })?;

            if let Err(e) = response.body.close().await {
                trace!(error = %e, "discarded redirect body failed to drain");
            }

            strip_headers(&mut target.headers, redirect.keep_body, &target.url, &next);
            debug!(
                hop = *redirects + 1,
                status,
                from = %target.url,
                to = %next,
                method = %redirect.method,
                keep_body = redirect.keep_body,
                "following redirect"
            );
            target.method = redirect.method;
            target.url = next;
            if !redirect.keep_body {
                target.body = None;
            }
            *redirects += 1;
        }
    }

    async fn send_with_retries(
        &self,
        target: &Target,
        options: &DeliveryOptions,
        guard: &Guard<'_>,
        attempts: &mut Vec<AttemptRecord>,
        hop: u32,
    ) -> Result<TransportResponse> {
        let policy = options.retry_policy;
        let mut attempt = 0u32;

        loop {
            if attempt > 0 {
                let delay = retry_delay(attempt - 1, options.min_retry_delay, options.max_retry_delay);
                debug!(hop, attempt, delay_ms = delay.as_millis() as u64, "backing off before retry");
                if let Err(reason) = guard.run(tokio::time::sleep(delay)).await {
                    // No further attempt was sent.
                    if let Some(last) = attempts.last_mut() {
                        last.retried = false;
                    }
                    return Err(guard.error(reason));
                }
            }

            let body = match &target.body {
                Some(body) => Some(body.materialize().await?),
                None => None,
            };
            let request = TransportRequest {
                method: target.method.clone(),
                url: target.url.clone(),
                headers: target.headers.clone(),
                body,
            };

            let started = Instant::now();
            let result = guard.run(self.transport.send(request)).await;
            let elapsed = started.elapsed();
            let can_retry = attempt < options.max_retries;

            let mut record = AttemptRecord {
                hop,
                attempt,
                method: target.method.clone(),
                url: target.url.clone(),
                headers: target.headers.clone(),
                started,
                elapsed,
                outcome: AttemptOutcome::Stopped(StopReason::Timeout),
                retried: false,
            };

            match result {
                Err(reason) => {
                    trace!(hop, attempt, %reason, "attempt stopped");
                    record.outcome = AttemptOutcome::Stopped(reason);
                    attempts.push(record);
                    return Err(guard.error(reason));
                }
                Ok(Ok(response)) => {
                    let status = response.status.as_u16();
                    let retry = can_retry && should_retry_status(policy, status);
                    trace!(hop, attempt, status, retry, "attempt completed");
                    record.outcome = AttemptOutcome::Response(response.status);
                    record.retried = retry;
                    attempts.push(record);

                    if !retry {
                        return Ok(response);
                    }
                    if let Err(e) = response.body.close().await {
                        trace!(error = %e, "discarded response body failed to drain");
                    }
                }
                Ok(Err(error)) => {
                    let temporary = self.transport.is_temporary(&error);
                    let wanted = should_retry_error(policy, temporary);
                    let retry = can_retry && wanted;
                    trace!(hop, attempt, temporary, retry, error = %error, "attempt failed");
                    record.outcome = AttemptOutcome::TransportError {
                        message: error.to_string(),
                        temporary,
                    };
                    record.retried = retry;
                    attempts.push(record);

                    if !retry {
                        let error = DeliveryError::Transport {
                            source: Box::new(error),
                            temporary,
                        };
                        if attempt > 0 && wanted {
                            return Err(DeliveryError::RetriesExhausted {
                                attempts: attempt + 1,
                                last:     Box::new(error),
                            });
                        }
                        return Err(error);
                    }
                }
            }

            attempt += 1;
        }
    }
}
