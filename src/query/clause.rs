//! Applicant and inventor sub-clauses.

use super::encode::{field_group, join_terms};
use super::validate::validate_names;
use super::QueryError;
use crate::models::NameFilter;

/// Build `applicant:("A" || "B")` from an applicant filter
pub fn applicant_clause(filter: &NameFilter) -> Result<String, QueryError> {
    name_clause("applicant", filter)
}

/// Build `inventor:("A" && "B")` from an inventor filter
pub fn inventor_clause(filter: &NameFilter) -> Result<String, QueryError> {
    name_clause("inventor", filter)
}

fn name_clause(field: &str, filter: &NameFilter) -> Result<String, QueryError> {
    validate_names(filter, field)?;
    Ok(field_group(field, &join_terms(&filter.names, filter.boolean)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BooleanOp;

    #[test]
    fn test_single_applicant() {
        let clause = applicant_clause(&NameFilter::single("Monsanto Technology")).unwrap();
        assert_eq!(clause, "applicant%3A%28%22Monsanto+Technology%22%29");
    }

    #[test]
    fn test_applicants_joined_with_or() {
        let filter = NameFilter::many(["Monsanto", "Bayer Cropscience"], BooleanOp::Or);
        let clause = applicant_clause(&filter).unwrap();
        assert_eq!(
            clause,
            "applicant%3A%28%22Monsanto%22+%7C%7C+%22Bayer+Cropscience%22%29"
        );
    }

    #[test]
    fn test_inventors_joined_with_and() {
        let filter = NameFilter::many(["Jane Doe", "John Roe"], BooleanOp::And);
        let clause = inventor_clause(&filter).unwrap();
        assert_eq!(
            clause,
            "inventor%3A%28%22Jane+Doe%22+%26%26+%22John+Roe%22%29"
        );
    }

    #[test]
    fn test_single_name_ignores_boolean() {
        let filter = NameFilter::many(["Monsanto"], BooleanOp::And);
        assert_eq!(
            applicant_clause(&filter).unwrap(),
            applicant_clause(&NameFilter::single("Monsanto")).unwrap()
        );
    }

    #[test]
    fn test_multiple_names_without_boolean_rejected() {
        let filter = NameFilter {
            names: vec!["Monsanto".to_string(), "Bayer".to_string()],
            boolean: None,
        };
        assert!(matches!(
            inventor_clause(&filter),
            Err(QueryError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_names_rejected() {
        let filter = NameFilter {
            names: Vec::new(),
            boolean: Some(BooleanOp::Or),
        };
        assert!(applicant_clause(&filter).is_err());
    }
}
