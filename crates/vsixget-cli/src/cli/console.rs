//! Console output for a running fetch.

use std::cell::Cell;
use std::time::{Duration, Instant};
use vsixget_core::fetcher::{AttemptOutcome, Candidate, DownloadAttempt, FetchError, FetchObserver};
use vsixget_core::http::TransportError;
use vsixget_core::identifier::IdentifierError;
use vsixget_core::progress::ProgressStats;
use vsixget_core::version::InvalidVersion;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
const MIB: f64 = 1_048_576.0;

/// Prints attempt status and throttled progress lines to stdout.
#[derive(Default)]
pub struct ConsoleObserver {
    last_print: Cell<Option<Instant>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            last_print: Cell::new(None),
        }
    }
}

impl FetchObserver for ConsoleObserver {
    fn attempt_started(&self, candidate: &Candidate) {
        println!("Trying {}...", candidate.kind);
        println!("URL: {}", candidate.url);
        self.last_print.set(None);
    }

    fn progress(&self, stats: &ProgressStats) {
        let now = Instant::now();
        let due = self
            .last_print
            .get()
            .map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
        if due || stats.is_complete() {
            println!("  {}", format_progress(stats));
            self.last_print.set(Some(now));
        }
    }

    fn retrying(&self, _url: &str, attempt: u32, delay: Duration, error: &TransportError) {
        println!(
            "Attempt {} failed ({}), retrying in {:.1} seconds...",
            attempt,
            error,
            delay.as_secs_f64()
        );
        if let Some(detail) = error.detail() {
            println!("Response: {}", detail);
        }
    }

    fn attempt_finished(&self, attempt: &DownloadAttempt) {
        match &attempt.outcome {
            AttemptOutcome::Success { .. } => {}
            AttemptOutcome::InvalidFormat { status, reason, .. } => {
                println!(
                    "Download completed (HTTP {}) but the file is not a valid VSIX: {}",
                    status, reason
                );
            }
            AttemptOutcome::TransportError { status, message, .. } => {
                println!("Download failed: {}", message);
                if *status == Some(404) {
                    println!("Resource not found (404). Check the extension ID and version.");
                }
            }
        }
        if let Some(detail) = attempt.outcome.detail() {
            println!("Response: {}", detail);
        }
    }
}

/// One progress line: sizes in MiB, percentage when the total is known.
pub fn format_progress(stats: &ProgressStats) -> String {
    let done = stats.bytes_done as f64 / MIB;
    let rate = stats.bytes_per_sec() / MIB;
    match (stats.total_bytes, stats.fraction()) {
        (Some(total), Some(fraction)) => format!(
            "{:.2} / {:.2} MiB ({:.1}%)  {:.2} MiB/s",
            done,
            total as f64 / MIB,
            fraction * 100.0,
            rate
        ),
        _ => format!("{:.2} MiB  {:.2} MiB/s", done, rate),
    }
}

/// Printed after every candidate failed.
pub fn print_troubleshooting(err: &FetchError) {
    eprintln!();
    eprintln!("Tried:");
    for attempt in &err.attempts {
        eprintln!("  {}: {}", attempt.kind, attempt.outcome);
    }
    eprintln!("Troubleshooting:");
    eprintln!("  - check the extension ID and version on the marketplace");
    eprintln!("  - try --latest or --skip-version-check to use the newest release");
    eprintln!("  - raise the timeout with -t/--timeout");
    eprintln!("  - behind a proxy? pass --proxy http://host:port");
    eprintln!("  - rerun with --debug for the full request trace");
}

/// Bad input gets the usage line; network and disk failures do not.
pub fn wants_usage(err: &anyhow::Error) -> bool {
    err.downcast_ref::<IdentifierError>().is_some() || err.downcast_ref::<InvalidVersion>().is_some()
}

pub fn print_usage() {
    eprintln!();
    eprintln!("{}", super::USAGE);
    eprintln!("For more information, try '--help'.");
}
