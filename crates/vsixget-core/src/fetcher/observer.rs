//! Hooks for user-visible fetch status. All methods default to no-ops.

use super::attempt::DownloadAttempt;
use super::candidate::Candidate;
use crate::http::TransportError;
use crate::progress::ProgressStats;
use std::time::Duration;

pub trait FetchObserver {
    fn attempt_started(&self, _candidate: &Candidate) {}

    fn progress(&self, _stats: &ProgressStats) {}

    /// A request to `url` failed and will be repeated after `delay`.
    fn retrying(&self, _url: &str, _attempt: u32, _delay: Duration, _error: &TransportError) {}

    fn attempt_finished(&self, _attempt: &DownloadAttempt) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl FetchObserver for Silent {}
