//! Page fetching behind a trait seam.
//!
//! [`PageFetcher`] is the only place the crate touches the network, which
//! lets the scrape cycle and poller run against canned documents in tests.
//! The production implementation is a thin wrapper over [`reqwest::Client`]:
//! no retries, no timeout override, redirects as the client defaults.

use crate::error::FetchError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Retrieves the raw HTML body of a URL.
///
/// Returns the body only for 2xx responses; any other status is a
/// [`FetchError::Status`]. Implementations do not log failures, callers do.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by an HTTP client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
