//! Built URL sets.

use serde::{Deserialize, Serialize};

/// URLs produced for one search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultSet {
    /// A single results page
    Single { url: String },

    /// One URL per results page, in ascending page order
    Paged {
        urls: Vec<String>,
        /// The requested count exceeded what the service will page through
        capped: bool,
    },
}

impl ResultSet {
    /// All URLs in fetch order
    pub fn urls(&self) -> &[String] {
        match self {
            ResultSet::Single { url } => std::slice::from_ref(url),
            ResultSet::Paged { urls, .. } => urls,
        }
    }

    pub fn into_urls(self) -> Vec<String> {
        match self {
            ResultSet::Single { url } => vec![url],
            ResultSet::Paged { urls, .. } => urls,
        }
    }

    pub fn len(&self) -> usize {
        self.urls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls().is_empty()
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, ResultSet::Paged { .. })
    }

    /// Whether the requested result count was cut down to the retrievable maximum
    pub fn is_capped(&self) -> bool {
        matches!(self, ResultSet::Paged { capped: true, .. })
    }
}
