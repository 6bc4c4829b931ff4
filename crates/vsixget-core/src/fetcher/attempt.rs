//! One download attempt: stream to the temp file, verify, promote.

use super::candidate::{Candidate, CandidateKind};
use super::observer::FetchObserver;
use crate::archive::{self, InvalidReason, Verification};
use crate::context::FetchContext;
use crate::http::{self, HttpResponse, TransportError};
use crate::retry;
use crate::storage;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Verified archive committed to the target path.
    Success { bytes: u64, entries: usize },
    /// The server answered but the body is not a usable package.
    InvalidFormat {
        status: u32,
        reason: InvalidReason,
        detail: Option<String>,
    },
    /// The request (or committing its result) failed.
    TransportError {
        status: Option<u32>,
        message: String,
        detail: Option<String>,
    },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }

    /// Body excerpt returned by the server, when there was one worth keeping.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::InvalidFormat { detail, .. }
            | AttemptOutcome::TransportError { detail, .. } => detail.as_deref(),
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success { bytes, entries } => {
                write!(f, "ok ({} bytes, {} entries)", bytes, entries)
            }
            AttemptOutcome::InvalidFormat { status, reason, .. } => {
                write!(f, "invalid package (HTTP {}): {}", status, reason)
            }
            AttemptOutcome::TransportError { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Record of one candidate URL and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAttempt {
    pub kind: CandidateKind,
    pub url: String,
    pub target_path: PathBuf,
    pub outcome: AttemptOutcome,
}

/// Runs one candidate. Never leaves a `.part` file behind; the target path is
/// only touched when the archive verified.
pub(crate) fn run(
    ctx: &FetchContext<'_>,
    candidate: &Candidate,
    final_path: &Path,
    observer: &dyn FetchObserver,
) -> DownloadAttempt {
    let temp = storage::temp_path(final_path);
    let outcome = match download(ctx, &candidate.url, &temp, observer) {
        Ok(resp) => verify_and_promote(&temp, final_path, &resp),
        Err(e) => {
            storage::discard(&temp);
            AttemptOutcome::TransportError {
                status: e.status(),
                message: e.to_string(),
                detail: e.detail().map(str::to_string),
            }
        }
    };
    DownloadAttempt {
        kind: candidate.kind.clone(),
        url: candidate.url.clone(),
        target_path: final_path.to_path_buf(),
        outcome,
    }
}

fn download(
    ctx: &FetchContext<'_>,
    url: &str,
    temp: &Path,
    observer: &dyn FetchObserver,
) -> Result<HttpResponse, TransportError> {
    retry::run_with_retry(
        &ctx.retry,
        |attempt| {
            tracing::debug!(url, attempt, max = ctx.retry.max_attempts, "download attempt");
            download_once(ctx, url, temp, observer)
        },
        |attempt, delay, e| observer.retrying(url, attempt, delay, e),
    )
}

fn download_once(
    ctx: &FetchContext<'_>,
    url: &str,
    temp: &Path,
    observer: &dyn FetchObserver,
) -> Result<HttpResponse, TransportError> {
    let file = storage::create_temp(temp).map_err(TransportError::Storage)?;
    let mut writer = BufWriter::new(file);
    let resp = ctx
        .transport
        .get(url, &mut writer, &mut |stats| observer.progress(stats))?;
    let file = writer
        .into_inner()
        .map_err(|e| TransportError::Storage(e.into_error()))?;
    file.sync_all().map_err(TransportError::Storage)?;
    drop(file);

    if !resp.is_success() {
        let detail = if resp.status == 404 && !resp.is_json() {
            None
        } else {
            read_excerpt(temp)
        };
        storage::discard(temp);
        return Err(TransportError::Http {
            status: resp.status,
            detail,
        });
    }
    Ok(resp)
}

fn verify_and_promote(temp: &Path, final_path: &Path, resp: &HttpResponse) -> AttemptOutcome {
    match archive::verify(temp) {
        Verification::Valid { entries } => match storage::promote(temp, final_path) {
            Ok(()) => AttemptOutcome::Success {
                bytes: resp.bytes_received,
                entries,
            },
            Err(e) => {
                storage::discard(temp);
                AttemptOutcome::TransportError {
                    status: Some(resp.status),
                    message: format!("{:#}", e),
                    detail: None,
                }
            }
        },
        Verification::Invalid(reason) => {
            let detail = if resp.is_json() || reason == InvalidReason::NotZip("JSON") {
                read_excerpt(temp)
            } else {
                None
            };
            storage::discard(temp);
            AttemptOutcome::InvalidFormat {
                status: resp.status,
                reason,
                detail,
            }
        }
    }
}

fn read_excerpt(path: &Path) -> Option<String> {
    let mut buf = Vec::new();
    File::open(path)
        .ok()?
        .take(4096)
        .read_to_end(&mut buf)
        .ok()?;
    http::body_excerpt(&buf)
}
