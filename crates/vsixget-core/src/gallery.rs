//! Marketplace gallery endpoints.
//!
//! Builds the metadata and package URLs for an extension. The gallery root is
//! configurable so the same code can be pointed at a mirror or a local server.

use crate::identifier::ExtensionRef;

/// Public gallery API root of the Visual Studio Marketplace.
pub const DEFAULT_GALLERY_URL: &str = "https://marketplace.visualstudio.com/_apis/public/gallery";

/// Platform qualifier used for the first download attempt.
pub const DEFAULT_TARGET_PLATFORM: &str = "linux-x64";

/// Version path segment the gallery resolves to the newest release.
pub const LATEST: &str = "latest";

/// True when `value` can be placed verbatim in a gallery URL path and in the
/// output file name: non-empty, not `.` or `..`, and free of whitespace,
/// control characters, path separators and URL delimiters (`?`, `#`, `%`).
pub fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%')
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    base_url: String,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new(DEFAULT_GALLERY_URL)
    }
}

impl Gallery {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` target returning extension metadata (versions array or version field).
    pub fn metadata_url(&self, ext: &ExtensionRef) -> String {
        format!(
            "{}/publishers/{}/vsextensions/{}",
            self.base_url,
            ext.publisher(),
            ext.extension()
        )
    }

    /// Universal package URL. `version` is a concrete version or [`LATEST`].
    pub fn package_url(&self, ext: &ExtensionRef, version: &str) -> String {
        format!("{}/{}/vspackage", self.metadata_url(ext), version)
    }

    /// Package URL narrowed to one OS/architecture build.
    pub fn platform_package_url(&self, ext: &ExtensionRef, version: &str, platform: &str) -> String {
        format!(
            "{}?targetPlatform={}",
            self.package_url(ext, version),
            platform
        )
    }

    /// Host and port of the gallery, for the connectivity probe.
    pub fn host_port(&self) -> Option<(String, u16)> {
        let parsed = url::Url::parse(&self.base_url).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some((host, port))
    }
}
