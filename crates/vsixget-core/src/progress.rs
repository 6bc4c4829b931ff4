//! Progress reporting for a single transfer (bytes done, rate, fraction).
//!
//! The transport emits a snapshot per received chunk; consumers decide how
//! often to render it.

/// Snapshot of download progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes written to the sink so far.
    pub bytes_done: u64,
    /// Body size from `Content-Length`, when the server sent one.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the request started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Fraction complete in [0.0, 1.0]; None when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            None => None,
            Some(0) => Some(1.0),
            Some(total) => Some((self.bytes_done as f64 / total as f64).min(1.0)),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_bytes.is_some_and(|t| self.bytes_done >= t)
    }
}
