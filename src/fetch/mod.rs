//! Page fetching for built search URLs.
//!
//! Building URLs is pure; dereferencing them is the job of a [`PageFetcher`].
//! Fetchers return raw page bodies in page order and never retry. Consecutive
//! requests are spaced out by a caller-supplied delay to stay within the
//! service's rate tolerance.

mod http;
pub mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;
use std::time::Duration;

use crate::models::ResultSet;

/// Dereferences search URLs and returns the raw response bodies.
#[async_trait]
pub trait PageFetcher: Send + Sync + std::fmt::Debug {
    /// Short identifier used in log output
    fn id(&self) -> &str;

    /// Fetch one URL and return its body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch every URL of a result set in order, sleeping `delay` between requests
    async fn fetch_all(
        &self,
        urls: &ResultSet,
        delay: Duration,
    ) -> Result<Vec<String>, FetchError> {
        let total = urls.len();
        let mut pages = Vec::with_capacity(total);

        for (index, url) in urls.urls().iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tracing::debug!("Waiting {:?} before the next request", delay);
                tokio::time::sleep(delay).await;
            }

            tracing::info!("[{}] Fetching page {}/{}", self.id(), index + 1, total);
            pages.push(self.fetch(url).await?);
        }

        Ok(pages)
    }
}

/// Errors that can occur while fetching pages
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or HTTP client error
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
