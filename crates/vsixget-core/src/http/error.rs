//! Transport error type for retry classification.

/// Error from one GET (curl failure, HTTP error, or local write failure).
/// Kept separate from anyhow so the retry policy can classify it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status. `detail` holds a body excerpt when one is worth showing.
    #[error("HTTP {status}")]
    Http { status: u32, detail: Option<String> },
    /// Writing the body to disk failed (e.g. disk full). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
}

impl TransportError {
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Curl(_) | TransportError::Storage(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Http { detail, .. } => detail.as_deref(),
            TransportError::Curl(_) | TransportError::Storage(_) => None,
        }
    }
}
