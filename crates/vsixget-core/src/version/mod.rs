//! Version resolution.
//!
//! An explicit version is used as-is once it passes the path-segment check.
//! Otherwise the gallery metadata endpoint is queried for the newest version;
//! any failure there degrades to the [`LATEST`] alias instead of aborting the
//! run.

mod parse;

use crate::context::FetchContext;
use crate::gallery::{is_path_segment, LATEST};
use crate::http::{self, TransportError};
use crate::identifier::ExtensionRef;

/// Requested and resolved version of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    /// What the caller asked for, if anything.
    pub requested: Option<String>,
    /// Concrete version, or [`LATEST`] when none could be determined.
    pub resolved: String,
}

/// A requested version that cannot be used in the package URL or file name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version {0:?}: whitespace, control characters, '/', '\\', '?', '#' and '%' are not allowed")]
pub struct InvalidVersion(pub String);

impl VersionSpec {
    /// A caller-chosen version. It ends up as a URL path segment and in the
    /// output file name, so anything that could escape either is rejected.
    pub fn explicit(version: impl Into<String>) -> Result<Self, InvalidVersion> {
        let version = version.into();
        if !is_path_segment(&version) {
            return Err(InvalidVersion(version));
        }
        Ok(Self {
            requested: Some(version.clone()),
            resolved: version,
        })
    }

    pub fn latest() -> Self {
        Self {
            requested: None,
            resolved: LATEST.to_string(),
        }
    }

    /// True when the package URL must use the `latest` alias.
    pub fn is_latest(&self) -> bool {
        self.resolved == LATEST
    }
}

/// Whether to query the gallery when no version was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookup {
    #[default]
    Remote,
    /// Go straight to the `latest` alias.
    Skip,
}

/// Source of a version typed by the user. The CLI backs this with a terminal
/// prompt; an empty answer means "no preference".
pub trait VersionPrompt {
    fn ask(&self) -> anyhow::Result<String>;
}

/// Picks the version the user asked for: the flag value first, then the
/// prompt answer. Blank values count as not given. A failing prompt is logged
/// and treated as a blank answer. A non-blank value that is not a valid
/// version is an error.
pub fn requested_version(
    flag: Option<&str>,
    prompt: Option<&dyn VersionPrompt>,
) -> Result<Option<String>, InvalidVersion> {
    let chosen = match (non_blank(flag), prompt) {
        (Some(v), _) => Some(v),
        (None, None) => None,
        (None, Some(prompt)) => match prompt.ask() {
            Ok(answer) => non_blank(Some(&answer)),
            Err(e) => {
                tracing::warn!("version prompt failed: {:#}", e);
                None
            }
        },
    };
    match chosen {
        Some(v) if !is_path_segment(&v) => Err(InvalidVersion(v)),
        other => Ok(other),
    }
}

fn non_blank(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve the version to download. Only an unusable `requested` value is an
/// error; metadata failures degrade to [`LATEST`].
pub fn resolve(
    ctx: &FetchContext<'_>,
    ext: &ExtensionRef,
    requested: Option<&str>,
    lookup: Lookup,
) -> Result<VersionSpec, InvalidVersion> {
    if let Some(v) = non_blank(requested) {
        tracing::debug!(extension = %ext, version = %v, "using requested version");
        return VersionSpec::explicit(v);
    }
    if lookup == Lookup::Skip {
        tracing::info!(extension = %ext, "version lookup skipped, using '{}'", LATEST);
        return Ok(VersionSpec::latest());
    }
    Ok(lookup_latest(ctx, ext))
}

fn lookup_latest(ctx: &FetchContext<'_>, ext: &ExtensionRef) -> VersionSpec {
    match query_latest(ctx, ext) {
        Ok(Some(v)) => {
            tracing::info!(extension = %ext, version = %v, "resolved latest version");
            VersionSpec {
                requested: None,
                resolved: v,
            }
        }
        Ok(None) => {
            tracing::warn!(extension = %ext, "metadata response has no version, using '{}'", LATEST);
            VersionSpec::latest()
        }
        Err(e) => {
            if e.status() == Some(404) {
                tracing::warn!(extension = %ext, "extension metadata not found (404); check the publisher and extension name");
            } else {
                tracing::warn!(extension = %ext, error = %e, detail = e.detail().unwrap_or("-"), "version lookup failed, using '{}'", LATEST);
            }
            VersionSpec::latest()
        }
    }
}

/// Query the metadata endpoint with retries. `Ok(None)` means the gallery
/// answered but no version token could be found.
pub fn query_latest(
    ctx: &FetchContext<'_>,
    ext: &ExtensionRef,
) -> Result<Option<String>, TransportError> {
    let url = ctx.gallery.metadata_url(ext);
    tracing::debug!(url = %url, "fetching version metadata");
    let body = crate::retry::run_with_retry(
        &ctx.retry,
        |attempt| {
            tracing::debug!(attempt, max = ctx.retry.max_attempts, "metadata attempt");
            let mut body = Vec::new();
            let resp = ctx.transport.get(&url, &mut body, &mut |_| {})?;
            if !resp.is_success() {
                let detail = if resp.status == 404 {
                    None
                } else {
                    http::body_excerpt(&body)
                };
                return Err(TransportError::Http {
                    status: resp.status,
                    detail,
                });
            }
            Ok(body)
        },
        |attempt, delay, e| {
            tracing::info!(attempt, delay_secs = delay.as_secs_f64(), error = %e, "metadata request failed, retrying");
        },
    )?;
    Ok(parse::latest_version(&body))
}
