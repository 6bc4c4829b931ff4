//! Which transport failures are worth repeating.

use super::policy::ErrorKind;
use crate::http::TransportError;

impl From<&TransportError> for ErrorKind {
    fn from(e: &TransportError) -> Self {
        match e {
            TransportError::Curl(ce) => curl_kind(ce),
            TransportError::Http { status, .. } => status_kind(*status),
            // Disk full or a read-only directory won't fix itself.
            TransportError::Storage(_) => ErrorKind::Final,
        }
    }
}

/// Gallery statuses: 429/503 mean slow down, 408 and 5xx are transient,
/// everything else (404 for an unknown extension or version) is final.
pub fn status_kind(status: u32) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        408 => ErrorKind::Timeout,
        500..=599 => ErrorKind::ServerError(status),
        _ => ErrorKind::Final,
    }
}

/// libcurl failures. TLS, URL and option errors are final.
pub fn curl_kind(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_read_error()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Final
    }
}
