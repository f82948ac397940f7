//! Lens search URL construction.
//!
//! Everything in this module is pure: a [`SearchRequest`](crate::models::SearchRequest)
//! goes in, a [`ResultSet`](crate::models::ResultSet) of URLs comes out, and no
//! network access happens along the way.
//!
//! The query string is assembled left to right in a fixed order: terms, field
//! scope, applicant and inventor clauses, date ranges, ranking, jurisdiction,
//! families, stemming and finally the page/result-count tokens. Requests are
//! validated up front so inconsistent options fail before any URL is returned.
//!
//! ```rust
//! use lens_query::models::{BooleanOp, Jurisdiction, SearchRequest};
//! use lens_query::query::build_urls;
//!
//! let request = SearchRequest::terms(["drones", "unmanned aerial vehicle"])
//!     .boolean(BooleanOp::Or)
//!     .jurisdiction(Jurisdiction::Main)
//!     .results(120);
//!
//! let urls = build_urls(&request).unwrap();
//! assert_eq!(urls.len(), 3);
//! ```

mod builder;
mod clause;
mod encode;
mod validate;

pub use builder::{build_urls, QueryUrlBuilder};
pub use clause::{applicant_clause, inventor_clause};
pub use validate::validate_request;

/// Errors raised while turning a request into URLs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Options that are inconsistent or incomplete
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A value outside the recognised set for its option
    #[error("Unsupported {kind}: '{value}'")]
    UnsupportedValue { kind: &'static str, value: String },
}

impl QueryError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        QueryError::Configuration(message.into())
    }

    pub(crate) fn unsupported(kind: &'static str, value: impl Into<String>) -> Self {
        QueryError::UnsupportedValue {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::unsupported("jurisdiction", "XYZ");
        assert_eq!(err.to_string(), "Unsupported jurisdiction: 'XYZ'");

        let err = QueryError::configuration("end date without start");
        assert!(err.to_string().contains("end date without start"));
    }
}
