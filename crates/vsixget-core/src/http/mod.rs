//! Blocking HTTP GET transport.
//!
//! The version resolver and the package fetcher only talk to the
//! [`Transport`] trait; [`CurlTransport`] is the libcurl-backed implementation.

mod client;
mod error;
mod headers;

pub use client::{CurlTransport, TransportOptions};
pub use error::TransportError;
pub use headers::ResponseHeaders;

use crate::progress::ProgressStats;
use std::io::Write;

/// Status and headers of a completed GET (after redirects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Final HTTP status code.
    pub status: u32,
    /// `Content-Type` of the final response, if any.
    pub content_type: Option<String>,
    /// `Content-Length` of the final response, if any.
    pub content_length: Option<u64>,
    /// Bytes written to the sink.
    pub bytes_received: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for `application/json` and `+json` media types.
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let media = ct.split(';').next().unwrap_or("").trim();
            media.eq_ignore_ascii_case("application/json") || media.ends_with("+json")
        })
    }
}

/// Characters of an error body kept for diagnostics.
pub const EXCERPT_CHARS: usize = 200;

/// First [`EXCERPT_CHARS`] characters of a response body, lossily decoded and
/// trimmed; None when the body is blank.
pub fn body_excerpt(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        out.push_str("...");
    }
    Some(out)
}

/// Performs a GET and streams the body into `sink`.
///
/// Implementations follow redirects and report progress per received chunk.
/// A non-2xx status is not an error at this layer; callers inspect
/// [`HttpResponse::status`].
pub trait Transport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(&ProgressStats),
    ) -> Result<HttpResponse, TransportError>;
}
