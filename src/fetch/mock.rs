//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{FetchError, PageFetcher};

/// A fetcher that records requested URLs and replays canned bodies.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, String>>,
    failures: Mutex<HashSet<String>>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body returned for a URL.
    pub fn set_response(&self, url: impl Into<String>, body: impl Into<String>) {
        lock(&self.responses).insert(url.into(), body.into());
    }

    /// Make a URL answer with HTTP 500.
    pub fn set_failure(&self, url: impl Into<String>) {
        lock(&self.failures).insert(url.into());
    }

    /// URLs fetched so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        lock(&self.requested).push(url.to_string());

        if lock(&self.failures).contains(url) {
            return Err(FetchError::Status {
                status: 500,
                url: url.to_string(),
            });
        }

        Ok(lock(&self.responses)
            .get(url)
            .cloned()
            .unwrap_or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
