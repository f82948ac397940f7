//! Core data models for search requests and built URL sets.

mod result;
mod search;

pub use result::ResultSet;
pub use search::{BooleanOp, DateRange, FieldScope, Jurisdiction, NameFilter, Ranking, SearchRequest};
