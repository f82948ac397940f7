//! # lens-query
//!
//! Builds search URLs for the Lens patent search interface.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchRequest, ResultSet, etc.)
//! - [`query`]: Pure URL construction with up-front request validation
//! - [`fetch`]: Page fetchers that dereference built URLs
//! - [`config`]: Configuration management

pub mod config;
pub mod fetch;
pub mod models;
pub mod query;

// Re-export commonly used types
pub use models::{ResultSet, SearchRequest};
pub use query::{build_urls, QueryError, QueryUrlBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
