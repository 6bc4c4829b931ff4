//! Retry and backoff policy.
//!
//! Classifies transport failures (timeouts, throttling, connection errors,
//! HTTP statuses) and decides exponential backoff, so the version resolver
//! and the package fetcher share one policy.

mod classify;
mod policy;
mod run;

pub use classify::{curl_kind, status_kind};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
