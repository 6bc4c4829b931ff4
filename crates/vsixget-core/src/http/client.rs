//! libcurl-backed [`Transport`].

use super::{HttpResponse, ResponseHeaders, Transport, TransportError};
use crate::config::VsixgetConfig;
use crate::progress::ProgressStats;
use std::cell::RefCell;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Per-request settings applied to every curl handle.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Abort when no byte arrives for this long. Bounds every request without
    /// capping the total time of a large but healthy download.
    pub stall_timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Dump libcurl's request/response trace to stderr.
    pub verbose: bool,
}

impl TransportOptions {
    pub fn from_config(cfg: &VsixgetConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs.max(1)),
            stall_timeout: Duration::from_secs(cfg.timeout_secs.max(1)),
            user_agent: cfg.user_agent.clone(),
            proxy: cfg.proxy.clone().filter(|p| !p.trim().is_empty()),
            verbose: false,
        }
    }
}

pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.options.stall_timeout)?;
        easy.useragent(&self.options.user_agent)?;
        if let Some(proxy) = &self.options.proxy {
            easy.proxy(proxy)?;
        }
        if self.options.verbose {
            easy.verbose(true)?;
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(&ProgressStats),
    ) -> Result<HttpResponse, TransportError> {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        let headers = RefCell::new(ResponseHeaders::default());
        let mut bytes_done = 0u64;
        let mut write_error: Option<io::Error> = None;
        let started = Instant::now();

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                headers.borrow_mut().push_line(line);
                true
            })?;
            transfer.write_function(|data| {
                if let Err(e) = sink.write_all(data) {
                    write_error = Some(e);
                    return Ok(0); // abort transfer
                }
                bytes_done += data.len() as u64;
                progress(&ProgressStats {
                    bytes_done,
                    total_bytes: headers.borrow().content_length,
                    elapsed_secs: started.elapsed().as_secs_f64(),
                });
                Ok(data.len())
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if let Some(io_err) = write_error {
                return Err(TransportError::Storage(io_err));
            }
            return Err(TransportError::Curl(e));
        }

        let status = easy.response_code()?;
        let parsed = headers.into_inner();
        tracing::debug!(
            url,
            status,
            bytes = bytes_done,
            content_type = parsed.content_type.as_deref().unwrap_or("-"),
            "GET finished"
        );
        Ok(HttpResponse {
            status,
            content_type: parsed.content_type,
            content_length: parsed.content_length,
            bytes_received: bytes_done,
        })
    }
}
