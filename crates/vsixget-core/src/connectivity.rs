//! Pre-flight reachability check for the gallery host.
//!
//! A plain TCP connect with a short timeout. The result is advisory: callers
//! log a warning and carry on, since a proxy may still get the request out.

use crate::gallery::Gallery;
use anyhow::{anyhow, Context, Result};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default timeout for the probe connect.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to `host:port`, trying each resolved address until one answers.
pub fn probe(host: &str, port: u16, timeout: Duration) -> Result<()> {
    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {}", host))?
        .collect();
    let mut last_err = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(_) => {
                tracing::debug!(%addr, "gallery host reachable");
                return Ok(());
            }
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(anyhow!("cannot connect to {}:{}: {}", host, port, e)),
        None => Err(anyhow!("{} resolved to no addresses", host)),
    }
}

/// Probe the host serving `gallery`.
pub fn probe_gallery(gallery: &Gallery, timeout: Duration) -> Result<()> {
    let (host, port) = gallery
        .host_port()
        .ok_or_else(|| anyhow!("gallery URL {} has no host", gallery.base_url()))?;
    probe(&host, port, timeout)
}
