//! CLI for vsixget.

mod commands;
pub mod console;
mod prompt;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;
use vsixget_core::config::{self, VsixgetConfig};
use vsixget_core::version::{Lookup, VersionSpec};

use commands::run_download;

/// Short usage line repeated after identifier and version errors.
pub const USAGE: &str = "Usage: vsixget [OPTIONS] <EXTENSION>";

const EXAMPLES: &str = "\
Examples:
  vsixget ms-python.python
  vsixget -v 2023.4.1 ms-python.python
  vsixget -d ~/Downloads https://marketplace.visualstudio.com/items?itemName=ms-python.python
  vsixget --skip-version-check ms-python.python
  vsixget --proxy http://proxy.example.com:8080 ms-python.python";

/// Download VS Code extensions (VSIX) from the Visual Studio Marketplace.
#[derive(Debug, Parser)]
#[command(name = "vsixget")]
#[command(about = "Download VS Code extensions from the Visual Studio Marketplace", long_about = None)]
#[command(disable_version_flag = true, after_help = EXAMPLES)]
pub struct Cli {
    /// Extension identifier (publisher.extension) or marketplace URL.
    #[arg(value_name = "EXTENSION")]
    pub extension: String,

    /// Extension version; skips the latest-version lookup.
    #[arg(short = 'v', long, value_parser = parse_version)]
    pub version: Option<String>,

    /// Directory to save the VSIX file (created if missing).
    #[arg(short = 'd', long, default_value = ".", value_name = "DIR")]
    pub directory: PathBuf,

    /// Do not prompt for a version; look up the latest one.
    #[arg(long, conflicts_with = "version")]
    pub latest: bool,

    /// Do not prompt or look up the version; download the `latest` alias directly.
    #[arg(long, conflicts_with = "version")]
    pub skip_version_check: bool,

    /// Seconds without data before a request is abandoned (overrides config).
    #[arg(short = 't', long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// HTTP(S) proxy for all requests, e.g. http://proxy.example.com:8080.
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Target platform for the first download attempt, e.g. win32-x64 (overrides config).
    #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
    pub platform: Option<String>,

    /// Verbose logging to stderr, including libcurl's request trace.
    #[arg(long)]
    pub debug: bool,
}

fn parse_version(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("version must not be empty".to_string());
    }
    VersionSpec::explicit(value)
        .map(|spec| spec.resolved)
        .map_err(|e| e.to_string())
}

impl Cli {
    pub fn parse_args() -> Result<Self, clap::Error> {
        Cli::try_parse()
    }

    pub fn run(&self) -> Result<()> {
        let mut cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("could not load config ({:#}), using defaults", e);
                VsixgetConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);
        self.apply_overrides(&mut cfg);
        run_download(self, &cfg)
    }

    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, cfg: &mut VsixgetConfig) {
        if let Some(secs) = self.timeout {
            println!("Using custom timeout: {} seconds", secs);
            cfg.timeout_secs = secs;
        }
        if let Some(proxy) = &self.proxy {
            println!("Using proxy: {}", proxy);
            cfg.proxy = Some(proxy.clone());
        }
        if let Some(platform) = &self.platform {
            cfg.target_platform = platform.clone();
        }
    }

    pub fn lookup(&self) -> Lookup {
        if self.skip_version_check {
            Lookup::Skip
        } else {
            Lookup::Remote
        }
    }

    /// Whether the user may be asked for a version (terminal check aside).
    pub fn may_prompt(&self) -> bool {
        self.version.is_none() && !self.latest && !self.skip_version_check
    }
}

#[cfg(test)]
mod tests;
