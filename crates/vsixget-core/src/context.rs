//! Request context shared by the version resolver and the package fetcher.

use crate::config::VsixgetConfig;
use crate::gallery::Gallery;
use crate::http::Transport;
use crate::retry::RetryPolicy;

/// Everything one run needs besides its inputs: endpoints, platform,
/// retry policy and the transport. Passed explicitly; there is no global state.
pub struct FetchContext<'a> {
    pub gallery: Gallery,
    pub target_platform: String,
    pub retry: RetryPolicy,
    pub transport: &'a dyn Transport,
}

impl<'a> FetchContext<'a> {
    pub fn new(cfg: &VsixgetConfig, transport: &'a dyn Transport) -> Self {
        let retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from_config)
            .unwrap_or_default();
        Self {
            gallery: Gallery::new(cfg.gallery_url.clone()),
            target_platform: cfg.target_platform.clone(),
            retry,
            transport,
        }
    }
}
