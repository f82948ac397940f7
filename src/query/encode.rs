//! Encoded tokens of the Lens query grammar.

use crate::models::{BooleanOp, Ranking};

/// `"`
pub(crate) const QUOTE: &str = "%22";
/// `:(`
pub(crate) const OPEN_FIELD: &str = "%3A%28";
/// `(`
pub(crate) const OPEN_PAREN: &str = "%28";
/// `)`
pub(crate) const CLOSE_PAREN: &str = "%29";
/// ` || ` between two clauses
pub(crate) const OR: &str = "+%7C%7C+";
/// ` && ` between two clauses
pub(crate) const AND: &str = "+%26%26+";

/// Token joining two quoted values inside one quoted group, e.g. `a" || "b`
pub(crate) fn quoted_join(op: BooleanOp) -> String {
    let op = match op {
        BooleanOp::Or => OR,
        BooleanOp::And => AND,
    };
    format!("{QUOTE}{op}{QUOTE}")
}

/// Turn a term into its query form: spaces become `+`, everything else that
/// is not URL-safe is percent-encoded.
pub(crate) fn normalize_term(term: &str) -> String {
    term.split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Normalise and join several terms or names into one quoted-group body
pub(crate) fn join_terms(terms: &[String], op: Option<BooleanOp>) -> String {
    let normalized: Vec<String> = terms
        .iter()
        .map(String::as_str)
        .map(normalize_term)
        .collect();
    match op {
        Some(op) => normalized.join(&quoted_join(op)),
        None => normalized.concat(),
    }
}

/// `field:("body")`
pub(crate) fn field_group(field: &str, body: &str) -> String {
    format!("{field}{OPEN_FIELD}{QUOTE}{body}{QUOTE}{CLOSE_PAREN}")
}

/// Sort suffix for a ranking mode; `d=-` is descending, `d=%2B` ascending
pub(crate) fn ranking_suffix(ranking: Ranking) -> &'static str {
    match ranking {
        Ranking::CitationCount => "&s=citing_pub_key_count&d=-",
        Ranking::FamilySize => "&s=simple_family_size&d=-",
        Ranking::SequencePresence => "&s=sequence_count&d=-",
        Ranking::LatestPublication => "&s=pub_date&d=-",
        Ranking::EarliestPublication => "&s=pub_date&d=%2B",
        Ranking::LatestFiling => "&s=filing_date&d=-",
        Ranking::EarliestFiling => "&s=filing_date&d=%2B",
    }
}
