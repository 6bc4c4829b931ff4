//! Candidate download URLs, in the order they are tried.

use crate::gallery::Gallery;
use crate::identifier::ExtensionRef;
use crate::version::VersionSpec;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    /// Build for one OS/architecture (`?targetPlatform=<id>`).
    Platform(String),
    /// Platform-agnostic package.
    Universal,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateKind::Platform(id) => write!(f, "platform-specific package ({})", id),
            CandidateKind::Universal => write!(f, "universal package"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub url: String,
}

type Strategy = fn(&Gallery, &ExtensionRef, &str, &str) -> Candidate;

/// Tried first to last; the first verified archive wins.
const STRATEGIES: [Strategy; 2] = [platform, universal];

fn platform(gallery: &Gallery, ext: &ExtensionRef, version: &str, target: &str) -> Candidate {
    Candidate {
        kind: CandidateKind::Platform(target.to_string()),
        url: gallery.platform_package_url(ext, version, target),
    }
}

fn universal(gallery: &Gallery, ext: &ExtensionRef, version: &str, _target: &str) -> Candidate {
    Candidate {
        kind: CandidateKind::Universal,
        url: gallery.package_url(ext, version),
    }
}

/// Candidates for one extension/version. The version segment is the resolved
/// version, which is the `latest` alias when resolution failed.
pub fn candidates(
    gallery: &Gallery,
    ext: &ExtensionRef,
    version: &VersionSpec,
    target_platform: &str,
) -> Vec<Candidate> {
    STRATEGIES
        .iter()
        .map(|strategy| strategy(gallery, ext, &version.resolved, target_platform))
        .collect()
}
