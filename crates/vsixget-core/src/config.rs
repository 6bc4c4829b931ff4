use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gallery::{DEFAULT_GALLERY_URL, DEFAULT_TARGET_PLATFORM};

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per URL (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (1.0 = 1s, 2s, 4s, ...).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1.0,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/vsixget/config.toml`.
///
/// Missing keys fall back to the defaults, so a file holding only
/// `timeout_secs = 30` is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VsixgetConfig {
    /// Gallery API root, without a trailing slash.
    pub gallery_url: String,
    /// Value of the `targetPlatform` query parameter on the first download attempt.
    pub target_platform: String,
    /// TCP/TLS connect timeout per request.
    pub connect_timeout_secs: u64,
    /// Abort a request after this many seconds without receiving data.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Optional HTTP(S) proxy, e.g. `http://proxy.example.com:8080`.
    pub proxy: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for VsixgetConfig {
    fn default() -> Self {
        Self {
            gallery_url: DEFAULT_GALLERY_URL.to_string(),
            target_platform: DEFAULT_TARGET_PLATFORM.to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 10,
            user_agent: format!("vsixget/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vsixget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VsixgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VsixgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<VsixgetConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: VsixgetConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = VsixgetConfig::default();
        assert_eq!(
            cfg.gallery_url,
            "https://marketplace.visualstudio.com/_apis/public/gallery"
        );
        assert_eq!(cfg.target_platform, "linux-x64");
        assert_eq!(cfg.timeout_secs, 10);
        assert!(cfg.user_agent.starts_with("vsixget/"));
        assert!(cfg.proxy.is_none());
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VsixgetConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: VsixgetConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.gallery_url, cfg.gallery_url);
        assert_eq!(parsed.target_platform, cfg.target_platform);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: VsixgetConfig = toml::from_str("timeout_secs = 45").unwrap();
        assert_eq!(cfg.timeout_secs, 45);
        assert_eq!(cfg.target_platform, "linux-x64");
        assert_eq!(cfg.connect_timeout_secs, 10);
    }

    #[test]
    fn config_toml_retry_and_proxy() {
        let toml = r#"
            target_platform = "darwin-arm64"
            proxy = "http://proxy.example.com:8080"

            [retry]
            max_attempts = 5
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: VsixgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.target_platform, "darwin-arm64");
        assert_eq!(cfg.proxy.as_deref(), Some("http://proxy.example.com:8080"));
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 5);
        assert!((retry.base_delay_secs - 0.5).abs() < 1e-9);
        assert_eq!(retry.max_delay_secs, 15);
    }

    #[test]
    fn load_from_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }
}
