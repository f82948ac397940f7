//! Up-front validation of search requests.

use chrono::NaiveDate;

use super::QueryError;
use crate::models::{DateRange, Jurisdiction, NameFilter, SearchRequest};

/// Check a request for inconsistent or unsupported options.
///
/// Called by the builder before anything is encoded, so a request either
/// yields URLs or fails as a whole.
pub fn validate_request(request: &SearchRequest) -> Result<(), QueryError> {
    validate_terms(&request.query, request.boolean.is_some(), "query term")?;

    if let Some(applicant) = &request.applicant {
        validate_names(applicant, "applicant")?;
    }
    if let Some(inventor) = &request.inventor {
        validate_names(inventor, "inventor")?;
    }

    validate_date_range(&request.publication_date, "publication")?;
    validate_date_range(&request.filing_date, "filing")?;

    // A hand-built `Code` must already be in the form `Jurisdiction::code` produces.
    if let Some(jurisdiction @ Jurisdiction::Code(code)) = &request.jurisdiction {
        if Jurisdiction::code(code)? != *jurisdiction {
            return Err(QueryError::unsupported("jurisdiction", code.as_str()));
        }
    }

    Ok(())
}

/// Names in an applicant or inventor filter
pub(crate) fn validate_names(filter: &NameFilter, what: &str) -> Result<(), QueryError> {
    validate_terms(&filter.names, filter.boolean.is_some(), what)
}

fn validate_terms(terms: &[String], has_boolean: bool, what: &str) -> Result<(), QueryError> {
    if terms.is_empty() {
        return Err(QueryError::configuration(format!("at least one {what} is required")));
    }

    if terms.iter().any(|t| t.trim().is_empty()) {
        return Err(QueryError::configuration(format!("{what} must not be blank")));
    }

    if terms.len() > 1 && !has_boolean {
        return Err(QueryError::configuration(format!(
            "{} {what}s given without a boolean operator (use OR or AND)",
            terms.len()
        )));
    }

    Ok(())
}

fn validate_date_range(range: &DateRange, what: &str) -> Result<(), QueryError> {
    match (range.start, range.end) {
        (None, None) => Ok(()),
        (None, Some(end)) => Err(QueryError::configuration(format!(
            "{what} date end {end} given without a start date"
        ))),
        (Some(start), None) => parse_date(start).map(|_| ()),
        (Some(start), Some(end)) => {
            let start_date = parse_date(start)?;
            let end_date = parse_date(end)?;
            if end_date < start_date {
                return Err(QueryError::configuration(format!(
                    "{what} date end {end} is before start {start}"
                )));
            }
            Ok(())
        }
    }
}

/// Parse a numeric `YYYYMMDD` date
pub(crate) fn parse_date(value: u32) -> Result<NaiveDate, QueryError> {
    if !(10_000_101..=99_991_231).contains(&value) {
        return Err(QueryError::unsupported("date", value.to_string()));
    }
    let (year, month, day) = (value / 10_000, (value / 100) % 100, value % 100);
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| QueryError::unsupported("date", value.to_string()))
}
