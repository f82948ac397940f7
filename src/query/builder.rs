//! Search URL builder.

use super::clause::{applicant_clause, inventor_clause};
use super::encode::{
    field_group, join_terms, ranking_suffix, AND, CLOSE_PAREN, OPEN_PAREN, OR, QUOTE,
};
use super::validate::validate_request;
use super::QueryError;
use crate::config::BuilderConfig;
use crate::models::{DateRange, FieldScope, ResultSet, SearchRequest};

/// Builds Lens search URLs from search requests.
///
/// The builder only holds its configuration, so one instance can be shared
/// freely between callers. Identical requests always produce identical URLs.
#[derive(Debug, Clone, Default)]
pub struct QueryUrlBuilder {
    config: BuilderConfig,
}

impl QueryUrlBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build the URL (or one URL per results page) for a request
    pub fn build(&self, request: &SearchRequest) -> Result<ResultSet, QueryError> {
        let query = self.query_string(request)?;
        let page_size = self.config.page_size.max(1);

        let result = match request.results {
            Some(count) if count > page_size => {
                let max_results = self.config.max_results.max(page_size);
                let capped = count > max_results;
                if capped {
                    tracing::warn!(
                        "Only {} results can be retrieved per query (requested {}). \
                         Split the query by date range and run it repeatedly to cover the rest.",
                        max_results,
                        count
                    );
                }

                let pages = count.min(max_results).div_ceil(page_size);
                tracing::info!(
                    "Requested {} results: building {} paginated URLs of {} results",
                    count.min(max_results),
                    pages,
                    page_size
                );

                let urls = (0..pages)
                    .map(|page| {
                        format!(
                            "{}?p={}&q={}&n={}",
                            self.config.paged_base, page, query, page_size
                        )
                    })
                    .collect();

                ResultSet::Paged { urls, capped }
            }
            _ => ResultSet::Single {
                url: format!("{}?q={}&n={}", self.config.search_base, query, page_size),
            },
        };

        tracing::debug!("Built {} URL(s) for query {}", result.len(), query);
        Ok(result)
    }

    /// The encoded query string for a request, without base path or page tokens
    pub fn query_string(&self, request: &SearchRequest) -> Result<String, QueryError> {
        validate_request(request)?;

        let terms = join_terms(&request.query, request.boolean);
        let mut query = scope_terms(request.field, &terms);

        if let Some(applicant) = &request.applicant {
            query.push_str(AND);
            query.push_str(&applicant_clause(applicant)?);
        }

        if let Some(inventor) = &request.inventor {
            query.push_str(AND);
            query.push_str(&inventor_clause(inventor)?);
        }

        push_date_range(&mut query, "pub_date", &request.publication_date);
        push_date_range(&mut query, "filing_date", &request.filing_date);

        if let Some(ranking) = request.ranking {
            query.push_str(ranking_suffix(ranking));
        }

        if let Some(jurisdiction) = &request.jurisdiction {
            query.push_str("&jo=true");
            for code in jurisdiction.codes() {
                query.push_str("&j=");
                query.push_str(code);
            }
        }

        if request.families {
            query.push_str("&f=true");
        }

        // Stemming is on by default at the service; only switching it off is explicit.
        if !request.stemming {
            query.push_str("&st=false");
        }

        Ok(query)
    }
}

/// Build URLs with the default configuration
pub fn build_urls(request: &SearchRequest) -> Result<ResultSet, QueryError> {
    QueryUrlBuilder::default().build(request)
}

fn scope_terms(field: FieldScope, terms: &str) -> String {
    match field {
        FieldScope::FullText => format!("{QUOTE}{terms}{QUOTE}"),
        FieldScope::Title | FieldScope::Abstract | FieldScope::Claims => {
            field_group(field.as_str(), terms)
        }
        FieldScope::TitleAbstractClaims => format!(
            "{OPEN_PAREN}{}{OR}{}{OR}{}{CLOSE_PAREN}",
            field_group("title", terms),
            field_group("abstract", terms),
            field_group("claims", terms),
        ),
    }
}

fn push_date_range(query: &mut String, key: &str, range: &DateRange) {
    if let Some(start) = range.start {
        query.push_str(&format!("&dates=%2B{key}%3A{start}"));
        if let Some(end) = range.end {
            query.push_str(&format!("-{end}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BooleanOp, Jurisdiction, NameFilter, Ranking};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    const BASE: &str = "https://www.lens.org/lens/search";

    /// In-memory log sink for checking emitted notices
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn query(request: &SearchRequest) -> String {
        QueryUrlBuilder::default().query_string(request).unwrap()
    }

    #[test]
    fn test_single_term_defaults() {
        let urls = build_urls(&SearchRequest::new("drones")).unwrap();
        assert_eq!(
            urls,
            ResultSet::Single {
                url: format!("{BASE}?q=%22drones%22&st=false&n=50")
            }
        );
    }

    #[test]
    fn test_spaces_become_plus() {
        assert_eq!(
            query(&SearchRequest::new("synthetic biology")),
            "%22synthetic+biology%22&st=false"
        );
    }

    #[test]
    fn test_trailing_space_is_kept() {
        assert_eq!(query(&SearchRequest::new("drones ")), "%22drones+%22&st=false");
    }

    #[test]
    fn test_or_join() {
        let request = SearchRequest::terms(["a", "b"]).boolean(BooleanOp::Or);
        assert_eq!(query(&request), "%22a%22+%7C%7C+%22b%22&st=false");
    }

    #[test]
    fn test_and_join() {
        let request = SearchRequest::terms(["a", "b"]).boolean(BooleanOp::And);
        assert_eq!(query(&request), "%22a%22+%26%26+%22b%22&st=false");
    }

    #[test]
    fn test_field_scopes() {
        let title = SearchRequest::new("drones").field(FieldScope::Title);
        assert_eq!(query(&title), "title%3A%28%22drones%22%29&st=false");

        let abstract_ = SearchRequest::new("drones").field(FieldScope::Abstract);
        assert_eq!(query(&abstract_), "abstract%3A%28%22drones%22%29&st=false");

        let claims = SearchRequest::new("drones").field(FieldScope::Claims);
        assert_eq!(query(&claims), "claims%3A%28%22drones%22%29&st=false");
    }

    #[test]
    fn test_title_abstract_claims_scope() {
        let request = SearchRequest::new("drones").field(FieldScope::TitleAbstractClaims);
        assert_eq!(
            query(&request),
            "%28title%3A%28%22drones%22%29+%7C%7C+abstract%3A%28%22drones%22%29\
             +%7C%7C+claims%3A%28%22drones%22%29%29&st=false"
        );
    }

    #[test]
    fn test_applicant_and_inventor_clauses() {
        let request = SearchRequest::new("drones")
            .applicant(NameFilter::single("Boeing"))
            .inventor(NameFilter::many(["A Smith", "B Jones"], BooleanOp::Or));
        assert_eq!(
            query(&request),
            "%22drones%22\
             +%26%26+applicant%3A%28%22Boeing%22%29\
             +%26%26+inventor%3A%28%22A+Smith%22+%7C%7C+%22B+Jones%22%29\
             &st=false"
        );
    }

    #[test]
    fn test_date_ranges() {
        let request = SearchRequest::new("drones")
            .publication_date(Some(20100101), Some(20151231))
            .filing_date(Some(20090101), None);
        assert_eq!(
            query(&request),
            "%22drones%22&dates=%2Bpub_date%3A20100101-20151231\
             &dates=%2Bfiling_date%3A20090101&st=false"
        );
    }

    #[test]
    fn test_ranking_suffix_before_page_tokens() {
        let request = SearchRequest::new("drones")
            .ranking(Ranking::CitationCount)
            .results(60);
        let urls = build_urls(&request).unwrap();
        for url in urls.urls() {
            let sort = url.find("&s=citing_pub_key_count&d=-").unwrap();
            let n = url.find("&n=50").unwrap();
            assert!(sort < n);
        }
    }

    #[test]
    fn test_each_ranking_suffix() {
        let expected = [
            (Ranking::CitationCount, "&s=citing_pub_key_count&d=-"),
            (Ranking::FamilySize, "&s=simple_family_size&d=-"),
            (Ranking::SequencePresence, "&s=sequence_count&d=-"),
            (Ranking::LatestPublication, "&s=pub_date&d=-"),
            (Ranking::EarliestPublication, "&s=pub_date&d=%2B"),
            (Ranking::LatestFiling, "&s=filing_date&d=-"),
            (Ranking::EarliestFiling, "&s=filing_date&d=%2B"),
        ];
        for (ranking, suffix) in expected {
            let q = query(&SearchRequest::new("x").ranking(ranking));
            assert_eq!(q, format!("%22x%22{suffix}&st=false"));
        }
    }

    #[test]
    fn test_jurisdiction_groups() {
        let main = query(&SearchRequest::new("x").jurisdiction(Jurisdiction::Main));
        assert!(main.ends_with("&jo=true&j=EP&j=JP&j=US&j=WO&st=false"));

        let ops = query(&SearchRequest::new("x").jurisdiction(Jurisdiction::Ops));
        assert!(ops.ends_with("&jo=true&j=AT&j=CA&j=CH&j=EP&j=GB&j=WO&st=false"));

        let single = query(&SearchRequest::new("x").jurisdiction(Jurisdiction::code("us").unwrap()));
        assert!(single.ends_with("&jo=true&j=US&st=false"));
    }

    #[test]
    fn test_families_and_stemming() {
        let request = SearchRequest::new("x").families(true).stemming(true);
        assert_eq!(query(&request), "%22x%22&f=true");

        let request = SearchRequest::new("x").families(true);
        assert_eq!(query(&request), "%22x%22&f=true&st=false");
    }

    #[test]
    fn test_results_at_page_size_is_single() {
        let urls = build_urls(&SearchRequest::new("x").results(50)).unwrap();
        assert!(!urls.is_paged());
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_pagination() {
        let urls = build_urls(&SearchRequest::new("x").results(120)).unwrap();
        assert_eq!(
            urls.urls(),
            &[
                format!("{BASE}?p=0&q=%22x%22&st=false&n=50"),
                format!("{BASE}?p=1&q=%22x%22&st=false&n=50"),
                format!("{BASE}?p=2&q=%22x%22&st=false&n=50"),
            ]
        );
        assert!(!urls.is_capped());
    }

    #[test]
    fn test_pagination_capped_at_max_results() {
        let urls = build_urls(&SearchRequest::new("x").results(600)).unwrap();
        assert_eq!(urls.len(), 10);
        assert!(urls.is_capped());
        assert!(urls.urls()[9].contains("?p=9&"));

        let exact = build_urls(&SearchRequest::new("x").results(500)).unwrap();
        assert_eq!(exact.len(), 10);
        assert!(!exact.is_capped());
    }

    #[test]
    fn test_pagination_notice() {
        let logs = capture_logs(|| {
            build_urls(&SearchRequest::new("x").results(120)).unwrap();
        });
        assert!(logs.contains("INFO"), "{logs}");
        assert!(logs.contains("building 3 paginated URLs"), "{logs}");
        assert!(!logs.contains("WARN"), "{logs}");

        let logs = capture_logs(|| {
            build_urls(&SearchRequest::new("x").results(50)).unwrap();
        });
        assert!(!logs.contains("paginated"), "{logs}");
    }

    #[test]
    fn test_result_cap_warning() {
        let logs = capture_logs(|| {
            build_urls(&SearchRequest::new("x").results(600)).unwrap();
        });
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("Only 500 results can be retrieved"), "{logs}");
        assert!(logs.contains("Split the query by date range"), "{logs}");
        assert!(logs.contains("building 10 paginated URLs"), "{logs}");
    }

    #[test]
    fn test_custom_base_paths() {
        let builder = QueryUrlBuilder::new(BuilderConfig {
            search_base: "http://localhost:8080/search".to_string(),
            paged_base: "http://localhost:8080/paged".to_string(),
            ..BuilderConfig::default()
        });

        let single = builder.build(&SearchRequest::new("x")).unwrap();
        assert!(single.urls()[0].starts_with("http://localhost:8080/search?q="));

        let paged = builder.build(&SearchRequest::new("x").results(51)).unwrap();
        assert_eq!(paged.len(), 2);
        assert!(paged.urls()[1].starts_with("http://localhost:8080/paged?p=1&q="));
    }

    #[test]
    fn test_invalid_request_yields_no_urls() {
        let request = SearchRequest::terms(["a", "b"]);
        assert!(build_urls(&request).is_err());
    }

    #[test]
    fn test_idempotent() {
        let request = SearchRequest::terms(["a", "b c"])
            .boolean(BooleanOp::And)
            .jurisdiction(Jurisdiction::Ops)
            .results(260);
        assert_eq!(build_urls(&request).unwrap(), build_urls(&request).unwrap());
    }
}
