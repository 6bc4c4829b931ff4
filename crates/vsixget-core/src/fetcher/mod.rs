//! Package fetcher.
//!
//! Tries each candidate URL in order (platform-specific build, then the
//! universal package) and stops at the first body that verifies as a ZIP
//! archive. The output filename depends only on the extension and resolved
//! version, never on which candidate won.

mod attempt;
mod candidate;
mod observer;

pub use attempt::{AttemptOutcome, DownloadAttempt};
pub use candidate::{candidates, Candidate, CandidateKind};
pub use observer::{FetchObserver, Silent};

use crate::context::FetchContext;
use crate::identifier::ExtensionRef;
use crate::storage;
use crate::version::VersionSpec;
use std::path::{Path, PathBuf};

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Committed package file.
    pub path: PathBuf,
    /// Every attempt in order; the last one succeeded.
    pub attempts: Vec<DownloadAttempt>,
}

impl FetchReport {
    pub fn winner(&self) -> Option<&DownloadAttempt> {
        self.attempts.last()
    }
}

/// Every candidate failed. Carries the attempts for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("failed to download {item} version {version}: all {} candidate URLs failed", .attempts.len())]
pub struct FetchError {
    pub item: String,
    pub version: String,
    pub attempts: Vec<DownloadAttempt>,
}

/// Download `ext` at `version` into `directory`, which must already exist.
pub fn fetch_package(
    ctx: &FetchContext<'_>,
    ext: &ExtensionRef,
    version: &VersionSpec,
    directory: &Path,
    observer: &dyn FetchObserver,
) -> Result<FetchReport, FetchError> {
    let final_path = directory.join(storage::package_file_name(ext, &version.resolved));
    let mut attempts = Vec::new();

    for candidate in candidates(&ctx.gallery, ext, version, &ctx.target_platform) {
        tracing::info!(kind = %candidate.kind, url = %candidate.url, "trying");
        observer.attempt_started(&candidate);
        let result = attempt::run(ctx, &candidate, &final_path, observer);
        match &result.outcome {
            AttemptOutcome::Success { bytes, entries } => {
                tracing::info!(path = %final_path.display(), bytes, entries, "package verified")
            }
            outcome => tracing::warn!(
                kind = %candidate.kind,
                detail = outcome.detail().unwrap_or("-"),
                "{}",
                outcome
            ),
        }
        observer.attempt_finished(&result);
        let done = result.outcome.is_success();
        attempts.push(result);
        if done {
            return Ok(FetchReport {
                path: final_path,
                attempts,
            });
        }
    }

    Err(FetchError {
        item: ext.to_string(),
        version: version.resolved.clone(),
        attempts,
    })
}
