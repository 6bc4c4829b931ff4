//! Retry loop: run a closure until success or policy says stop.

use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::http::TransportError;
use std::time::Duration;

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. Before sleeping for the backoff
/// delay, `on_retry` is told which attempt failed, how long we wait and why.
pub fn run_with_retry<T, F, R>(
    policy: &RetryPolicy,
    mut f: F,
    mut on_retry: R,
) -> Result<T, TransportError>
where
    F: FnMut(u32) -> Result<T, TransportError>,
    R: FnMut(u32, Duration, &TransportError),
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = ErrorKind::from(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying");
                        on_retry(attempt, d, &e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
