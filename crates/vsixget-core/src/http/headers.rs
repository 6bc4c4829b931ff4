//! Incremental parsing of HTTP response header lines.

/// Headers of the final response that the fetcher cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl ResponseHeaders {
    /// Feed one raw header line as libcurl delivers it.
    ///
    /// libcurl passes the headers of every redirect hop; each status line
    /// starts a new response, so only the headers after the last one remain.
    pub fn push_line(&mut self, raw: &[u8]) {
        let Ok(line) = std::str::from_utf8(raw) else {
            return;
        };
        let line = line.trim();
        if line.starts_with("HTTP/") {
            *self = ResponseHeaders::default();
            return;
        }
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            self.content_length = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(value.to_string());
        }
    }
}
