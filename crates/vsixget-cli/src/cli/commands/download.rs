//! `vsixget <EXTENSION>`: resolve the version, download, verify, report.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use vsixget_core::config::VsixgetConfig;
use vsixget_core::http::{CurlTransport, TransportOptions};
use vsixget_core::version::{self, VersionPrompt};
use vsixget_core::{checksum, connectivity, fetcher, identifier, storage, FetchContext};

use crate::cli::console::ConsoleObserver;
use crate::cli::prompt::TerminalPrompt;
use crate::cli::Cli;

pub fn run_download(cli: &Cli, cfg: &VsixgetConfig) -> Result<()> {
    let mut options = TransportOptions::from_config(cfg);
    options.verbose = cli.debug;
    let transport = CurlTransport::new(options);
    let ctx = FetchContext::new(cfg, &transport);

    println!("Checking network connectivity...");
    if let Err(e) = connectivity::probe_gallery(&ctx.gallery, connectivity::PROBE_TIMEOUT) {
        tracing::warn!("connectivity probe failed: {:#}", e);
        println!("WARNING: {:#}", e);
        println!("The download will still be attempted. Try a higher -t/--timeout value.");
        if cfg.proxy.is_none() {
            println!("If you're behind a proxy, use the --proxy option.");
        }
        println!();
    }

    let ext = identifier::parse_identifier(&cli.extension)?;

    let prompt = (cli.may_prompt() && std::io::stdin().is_terminal()).then_some(TerminalPrompt);
    let requested = version::requested_version(
        cli.version.as_deref(),
        prompt.as_ref().map(|p| p as &dyn VersionPrompt),
    )?;
    if cli.skip_version_check {
        println!("Skipping version check as requested");
    }
    if requested.is_none() {
        println!("No version specified, resolving latest...");
    }
    let spec = version::resolve(&ctx, &ext, requested.as_deref(), cli.lookup())?;
    if spec.is_latest() {
        println!("Using 'latest' in the download URL and filename");
    } else {
        println!("Version: {}", spec.resolved);
    }

    storage::ensure_dir(&cli.directory)?;
    println!("Attempting to download {} version {}...", ext, spec.resolved);
    let report = fetcher::fetch_package(&ctx, &ext, &spec, &cli.directory, &ConsoleObserver::new())?;

    let digest = checksum::sha256_file(&report.path)
        .with_context(|| format!("checksum {}", report.path.display()))?;
    tracing::info!(path = %report.path.display(), sha256 = %digest, "download complete");
    println!("Success! Downloaded to: {}", report.path.display());
    println!("SHA-256: {}", digest);
    Ok(())
}
