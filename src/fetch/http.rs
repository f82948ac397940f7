//! HTTP page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::{FetchError, PageFetcher};
use crate::config::FetchConfig;

/// Fetches pages over HTTP with a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&FetchConfig::default())
    }

    /// Create a fetcher honouring the timeout and user agent of a fetch config
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn id(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
