//! Search request models.
//!
//! A [`SearchRequest`] carries every option the Lens search grammar understands.
//! Options that may be absent are `Option`s; the ranking directive is a single
//! [`Ranking`] variant so conflicting sort orders cannot be expressed.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::query::QueryError;

/// Boolean operator used to join several terms or names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BooleanOp {
    Or,
    And,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOp::Or => "OR",
            BooleanOp::And => "AND",
        }
    }
}

impl FromStr for BooleanOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OR" | "||" => Ok(BooleanOp::Or),
            "AND" | "&&" => Ok(BooleanOp::And),
            _ => Err(QueryError::unsupported("boolean operator", s)),
        }
    }
}

/// Field the search terms are scoped to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldScope {
    /// Search the full text (the service default)
    #[default]
    FullText,
    Title,
    Abstract,
    Claims,
    /// Title OR abstract OR claims
    TitleAbstractClaims,
}

impl FieldScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldScope::FullText => "fulltext",
            FieldScope::Title => "title",
            FieldScope::Abstract => "abstract",
            FieldScope::Claims => "claims",
            FieldScope::TitleAbstractClaims => "tac",
        }
    }
}

impl FromStr for FieldScope {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fulltext" | "full_text" => Ok(FieldScope::FullText),
            "title" => Ok(FieldScope::Title),
            "abstract" => Ok(FieldScope::Abstract),
            "claims" => Ok(FieldScope::Claims),
            "tac" => Ok(FieldScope::TitleAbstractClaims),
            _ => Err(QueryError::unsupported("field scope", s)),
        }
    }
}

/// Sort directive applied to the result set.
///
/// Variants are declared in the precedence order the service grammar uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ranking {
    /// Most cited first
    CitationCount,
    /// Largest simple family first
    FamilySize,
    /// Documents with sequence listings first
    SequencePresence,
    LatestPublication,
    EarliestPublication,
    LatestFiling,
    EarliestFiling,
}

impl Ranking {
    /// All ranking modes in precedence order
    pub const ALL: [Ranking; 7] = [
        Ranking::CitationCount,
        Ranking::FamilySize,
        Ranking::SequencePresence,
        Ranking::LatestPublication,
        Ranking::EarliestPublication,
        Ranking::LatestFiling,
        Ranking::EarliestFiling,
    ];

    /// Short identifier used on the command line and in request files
    pub fn id(&self) -> &'static str {
        match self {
            Ranking::CitationCount => "citing",
            Ranking::FamilySize => "family",
            Ranking::SequencePresence => "sequences",
            Ranking::LatestPublication => "latest_publn",
            Ranking::EarliestPublication => "earliest_publn",
            Ranking::LatestFiling => "latest_filing",
            Ranking::EarliestFiling => "earliest_filing",
        }
    }
}

impl FromStr for Ranking {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Ranking::ALL
            .into_iter()
            .find(|r| r.id() == normalized)
            .ok_or_else(|| QueryError::unsupported("ranking mode", s))
    }
}

/// Jurisdiction filter: a single two-letter authority code or a named group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Jurisdiction {
    /// A two-letter code, stored upper case
    Code(String),
    /// EP, JP, US, WO
    Main,
    /// AT, CA, CH, EP, GB, WO
    Ops,
}

impl Jurisdiction {
    pub const MAIN_GROUP: [&'static str; 4] = ["EP", "JP", "US", "WO"];
    pub const OPS_GROUP: [&'static str; 6] = ["AT", "CA", "CH", "EP", "GB", "WO"];

    /// Create a single-code jurisdiction, validating the code
    pub fn code(code: &str) -> Result<Self, QueryError> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(QueryError::unsupported("jurisdiction", code));
        }
        Ok(Jurisdiction::Code(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Jurisdiction::Code(code) => code,
            Jurisdiction::Main => "main",
            Jurisdiction::Ops => "ops",
        }
    }

    /// The authority codes this jurisdiction expands to
    pub fn codes(&self) -> Vec<&str> {
        match self {
            Jurisdiction::Code(code) => vec![code.as_str()],
            Jurisdiction::Main => Self::MAIN_GROUP.to_vec(),
            Jurisdiction::Ops => Self::OPS_GROUP.to_vec(),
        }
    }
}

impl FromStr for Jurisdiction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Jurisdiction::Main),
            "ops" => Ok(Jurisdiction::Ops),
            _ => Jurisdiction::code(s),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! string_conversions {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = QueryError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.$method().to_string()
                }
            }
        )*
    };
}

string_conversions! {
    BooleanOp => as_str,
    FieldScope => as_str,
    Ranking => id,
    Jurisdiction => as_str,
}

/// Applicant or inventor filter: one or more names and the operator joining them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    #[serde(deserialize_with = "one_or_many")]
    pub names: Vec<String>,

    #[serde(default)]
    pub boolean: Option<BooleanOp>,
}

impl NameFilter {
    /// Filter on a single name
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            boolean: None,
        }
    }

    /// Filter on several names joined by `boolean`
    pub fn many<I, S>(names: I, boolean: BooleanOp) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            boolean: Some(boolean),
        }
    }
}

/// Inclusive date range in numeric `YYYYMMDD` form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<u32>,

    #[serde(default)]
    pub end: Option<u32>,
}

impl DateRange {
    pub fn new(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Complete input for building Lens search URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search terms; a single term is a one-element list
    #[serde(deserialize_with = "one_or_many")]
    pub query: Vec<String>,

    /// Operator joining multiple terms
    #[serde(default)]
    pub boolean: Option<BooleanOp>,

    /// Field the terms are scoped to
    #[serde(default, alias = "type")]
    pub field: FieldScope,

    #[serde(default)]
    pub applicant: Option<NameFilter>,

    #[serde(default)]
    pub inventor: Option<NameFilter>,

    #[serde(default)]
    pub publication_date: DateRange,

    #[serde(default)]
    pub filing_date: DateRange,

    #[serde(default)]
    pub ranking: Option<Ranking>,

    #[serde(default)]
    pub jurisdiction: Option<Jurisdiction>,

    /// Collapse results to one publication per family
    #[serde(default)]
    pub families: bool,

    /// Let the service apply stemming; disabled unless asked for
    #[serde(default)]
    pub stemming: bool,

    /// Number of results wanted
    #[serde(default)]
    pub results: Option<u32>,
}

impl SearchRequest {
    /// Create a request for a single term
    pub fn new(term: impl Into<String>) -> Self {
        Self::terms([term.into()])
    }

    /// Create a request for several terms; set a boolean operator to join them
    pub fn terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: terms.into_iter().map(Into::into).collect(),
            boolean: None,
            field: FieldScope::default(),
            applicant: None,
            inventor: None,
            publication_date: DateRange::default(),
            filing_date: DateRange::default(),
            ranking: None,
            jurisdiction: None,
            families: false,
            stemming: false,
            results: None,
        }
    }

    pub fn boolean(mut self, op: BooleanOp) -> Self {
        self.boolean = Some(op);
        self
    }

    pub fn field(mut self, field: FieldScope) -> Self {
        self.field = field;
        self
    }

    pub fn applicant(mut self, filter: NameFilter) -> Self {
        self.applicant = Some(filter);
        self
    }

    pub fn inventor(mut self, filter: NameFilter) -> Self {
        self.inventor = Some(filter);
        self
    }

    /// Restrict by publication date; `end` requires `start`
    pub fn publication_date(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.publication_date = DateRange::new(start, end);
        self
    }

    /// Restrict by filing date; `end` requires `start`
    pub fn filing_date(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.filing_date = DateRange::new(start, end);
        self
    }

    pub fn ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = Some(ranking);
        self
    }

    pub fn jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction = Some(jurisdiction);
        self
    }

    pub fn families(mut self, families: bool) -> Self {
        self.families = families;
        self
    }

    pub fn stemming(mut self, stemming: bool) -> Self {
        self.stemming = stemming;
        self
    }

    pub fn results(mut self, results: u32) -> Self {
        self.results = Some(results);
        self
    }
}

/// Accept either `"term"` or `["a", "b"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
