//! # Query Orchestrator Module
//!
//! ## Purpose
//! Drives one case search end-to-end: validates the input, loads the court's
//! search page, walks an ordered table of search strategies against it, and
//! settles on exactly one terminal outcome. Every invocation appends exactly
//! one row to the query log, whatever path it takes.
//!
//! ## Input/Output Specification
//! - **Input**: a [`QueryInput`] plus the requester's address for the log
//! - **Output**: a [`SearchOutcome`] with the terminal status, an optional
//!   case record and a user-facing message
//!
//! ## Search strategies
//! District-court portals accept several form-field naming schemes depending
//! on which backend serves the page. Each scheme is a [`SearchStrategy`]
//! descriptor (pure data); one execution function interprets them all, so
//! adding a scheme is a table entry, not a new code path.
//!
//! ## Outcome policy
//! - a parsed record is always `success`;
//! - a page that explicitly reports "no record found" is authoritative and
//!   always yields `not_found`; synthetic data would be misleading there;
//! - CAPTCHA blocks, strategy exhaustion and an unreachable site follow the
//!   configured fallback policy: synthetic demo data (tagged as such), or an
//!   honest `captcha_blocked` / `not_found` / `error` without substitute data.

use crate::captcha::{self, CaptchaKind};
use crate::client::CourtClient;
use crate::config::{Config, FallbackPolicy};
use crate::demo;
use crate::errors::{AppError, ParseReason, Result};
use crate::parser;
use crate::storage::QueryStore;
use crate::{CaseQuery, CaseRecord, QueryStatus};
use chrono::{Datelike, Utc};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Earliest filing year the court records go back to.
const MIN_FILING_YEAR: i32 = 1950;

/// A validated search submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i32,
}

impl QueryInput {
    /// Validate the submission before any network traffic happens.
    pub fn validate(&self) -> Result<()> {
        if self.case_type.trim().is_empty() {
            return Err(AppError::validation("case_type", "case type is required"));
        }

        if self.case_number.trim().is_empty() {
            return Err(AppError::validation("case_number", "case number is required"));
        }
        if !self
            .case_number
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '/')
        {
            return Err(AppError::validation(
                "case_number",
                "case number may contain only digits, dashes and slashes",
            ));
        }

        let current_year = Utc::now().year();
        if self.filing_year < MIN_FILING_YEAR || self.filing_year > current_year {
            return Err(AppError::validation(
                "filing_year",
                format!("filing year must be between {MIN_FILING_YEAR} and {current_year}"),
            ));
        }

        Ok(())
    }
}

/// HTTP method a strategy submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// What to put into one form field.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue {
    CaseType,
    CaseNumber,
    FilingYear,
    Literal(&'static str),
}

/// One parameterized approach to querying the search interface.
#[derive(Debug, Clone, Copy)]
pub struct SearchStrategy {
    pub label: &'static str,
    /// Path suffix relative to the search page URL (may be empty)
    pub path: &'static str,
    pub method: FormMethod,
    pub fields: &'static [(&'static str, FieldValue)],
}

/// Field-naming schemes observed across district-court backends, tried in
/// order of how commonly they appear.
pub const STRATEGIES: &[SearchStrategy] = &[
    SearchStrategy {
        label: "ecourts-standard",
        path: "",
        method: FormMethod::Post,
        fields: &[
            ("case_type", FieldValue::CaseType),
            ("case_no", FieldValue::CaseNumber),
            ("case_year", FieldValue::FilingYear),
            ("submit", FieldValue::Literal("Submit")),
        ],
    },
    SearchStrategy {
        label: "compact-names",
        path: "",
        method: FormMethod::Post,
        fields: &[
            ("casetype", FieldValue::CaseType),
            ("caseno", FieldValue::CaseNumber),
            ("caseyear", FieldValue::FilingYear),
            ("Submit", FieldValue::Literal("Search")),
        ],
    },
    SearchStrategy {
        label: "webforms",
        path: "/case-status-result",
        method: FormMethod::Post,
        fields: &[
            ("txtCaseType", FieldValue::CaseType),
            ("txtCaseNo", FieldValue::CaseNumber),
            ("txtYear", FieldValue::FilingYear),
            ("btnSearch", FieldValue::Literal("Search")),
        ],
    },
    SearchStrategy {
        label: "state-coded",
        path: "",
        method: FormMethod::Post,
        fields: &[
            ("case_type_name", FieldValue::CaseType),
            ("case_number", FieldValue::CaseNumber),
            ("filing_year", FieldValue::FilingYear),
            ("search_button", FieldValue::Literal("Get Case Status")),
            ("state_code", FieldValue::Literal("27")),
            ("district_code", FieldValue::Literal("664")),
        ],
    },
    SearchStrategy {
        label: "query-params",
        path: "",
        method: FormMethod::Get,
        fields: &[
            ("caseType", FieldValue::CaseType),
            ("caseNumber", FieldValue::CaseNumber),
            ("filingYear", FieldValue::FilingYear),
            ("searchType", FieldValue::Literal("case_number")),
        ],
    },
];

/// Terminal result of one orchestrated search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: QueryStatus,
    pub record: Option<CaseRecord>,
    /// User-facing explanation for non-success outcomes
    pub message: Option<String>,
}

/// What the live-search phase concluded before policy is applied.
enum LiveOutcome {
    Parsed(CaseRecord, String),
    Captcha(CaptchaKind, String),
    NotFoundConfirmed(String),
    Exhausted { last_error: Option<String> },
    Unreachable { details: String },
}

static HIDDEN_INPUT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[type="hidden"]"#).expect("static selector"));

/// Coordinates client, parser, demo generator and store for one search.
pub struct QueryOrchestrator {
    config: Arc<Config>,
    client: Arc<CourtClient>,
    store: Arc<QueryStore>,
}

impl QueryOrchestrator {
    pub fn new(config: Arc<Config>, client: Arc<CourtClient>, store: Arc<QueryStore>) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Run one search to completion and log it.
    ///
    /// Never returns an error: every failure mode maps onto a terminal
    /// [`SearchOutcome`], and a failed log write is logged rather than
    /// surfaced so the user still gets their result.
    pub async fn run(&self, input: QueryInput, requester_address: &str) -> SearchOutcome {
        info!(
            case_type = input.case_type.as_str(),
            case_number = input.case_number.as_str(),
            filing_year = input.filing_year,
            requester = requester_address,
            "processing search request"
        );

        let (outcome, raw_response) = match input.validate() {
            Err(error) => (
                SearchOutcome {
                    status: QueryStatus::ValidationError,
                    record: None,
                    message: Some(error.to_string()),
                },
                None,
            ),
            Ok(()) => {
                let live = self.try_live_search(&input).await;
                self.settle(&input, live)
            }
        };

        let query = CaseQuery {
            case_type: input.case_type.clone(),
            case_number: input.case_number.clone(),
            filing_year: input.filing_year,
            queried_at: Utc::now(),
            status: outcome.status,
            raw_response,
            parsed_data: outcome.record.clone(),
            error_message: outcome.message.clone(),
            requester_address: requester_address.to_string(),
            court_name: self.config.court.name.clone(),
        };
        if let Err(error) = self.store.record_query(&query).await {
            // The user still gets their result; only the audit row is lost.
            warn!(error = %error, "failed to record query log row");
        }

        info!(status = outcome.status.as_str(), "search finished");
        outcome
    }

    /// Load the search page and walk the strategy table.
    async fn try_live_search(&self, input: &QueryInput) -> LiveOutcome {
        let search_url = format!(
            "{}{}",
            self.config.court.base_url.trim_end_matches('/'),
            self.config.court.search_path
        );

        let page = match self.client.get(&search_url, &[]).await {
            Ok(page) => page,
            Err(error) => {
                warn!(url = search_url.as_str(), error = %error, "search page unreachable");
                return LiveOutcome::Unreachable {
                    details: error.to_string(),
                };
            }
        };

        if let Some(kind) = captcha::detect(&page.body) {
            info!(kind = %kind, "CAPTCHA detected on search page");
            return LiveOutcome::Captcha(kind, page.body);
        }

        let hidden_fields = extract_hidden_fields(&page.body);
        let mut last_error = None;
        let mut not_found_page: Option<String> = None;

        for strategy in STRATEGIES {
            let url = strategy_url(&search_url, strategy.path);
            let form = build_form(strategy, input, &hidden_fields);
            debug!(strategy = strategy.label, url = url.as_str(), "trying search strategy");

            let response = match strategy.method {
                FormMethod::Post => self.client.post_form(&url, &form).await,
                FormMethod::Get => self.client.get(&url, &form).await,
            };

            let response = match response {
                Ok(response) => response,
                Err(error) => {
                    warn!(strategy = strategy.label, error = %error, "strategy submission failed");
                    last_error = Some(error.to_string());
                    continue;
                }
            };

            if let Some(kind) = captcha::detect(&response.body) {
                info!(strategy = strategy.label, kind = %kind, "CAPTCHA detected on result page");
                return LiveOutcome::Captcha(kind, response.body);
            }

            match parser::parse(&response.body, input, &self.config.court) {
                Ok(record) => {
                    info!(strategy = strategy.label, "strategy produced a case record");
                    return LiveOutcome::Parsed(record, response.body);
                }
                Err(AppError::Parse {
                    reason: ParseReason::NotFound,
                    details,
                }) => {
                    debug!(strategy = strategy.label, details = details.as_str(), "no record on page");
                    not_found_page = Some(response.body);
                }
                Err(error) => {
                    debug!(strategy = strategy.label, error = %error, "response not parseable");
                    last_error = Some(error.to_string());
                }
            }
        }

        if let Some(body) = not_found_page {
            LiveOutcome::NotFoundConfirmed(body)
        } else {
            LiveOutcome::Exhausted { last_error }
        }
    }

    /// Apply the fallback policy to the live-search conclusion.
    fn settle(&self, input: &QueryInput, live: LiveOutcome) -> (SearchOutcome, Option<String>) {
        let policy = self.config.fallback.policy;

        match live {
            LiveOutcome::Parsed(record, raw) => (
                SearchOutcome {
                    status: QueryStatus::Success,
                    record: Some(record),
                    message: None,
                },
                Some(raw),
            ),

            LiveOutcome::NotFoundConfirmed(raw) => (
                SearchOutcome {
                    status: QueryStatus::NotFound,
                    record: None,
                    message: Some(format!(
                        "Case {} {}/{} was not found in the {} records. \
                         Please verify the case details.",
                        input.case_type, input.case_number, input.filing_year,
                        self.config.court.name,
                    )),
                },
                Some(raw),
            ),

            LiveOutcome::Captcha(kind, raw) => {
                let message = format!(
                    "The {} website requires CAPTCHA verification ({kind}), \
                     which this service does not solve.",
                    self.config.court.name
                );
                match policy {
                    FallbackPolicy::Demo => (
                        self.demo_outcome(input, format!("{message} Showing demo data instead.")),
                        Some(raw),
                    ),
                    FallbackPolicy::NotFound => (
                        SearchOutcome {
                            status: QueryStatus::CaptchaBlocked,
                            record: None,
                            message: Some(message),
                        },
                        Some(raw),
                    ),
                }
            }

            LiveOutcome::Exhausted { last_error } => {
                let detail = last_error
                    .unwrap_or_else(|| "no strategy produced a readable result page".to_string());
                match policy {
                    FallbackPolicy::Demo => (
                        self.demo_outcome(
                            input,
                            format!(
                                "Live data could not be retrieved from the {} website \
                                 ({detail}). Showing demo data instead.",
                                self.config.court.name
                            ),
                        ),
                        None,
                    ),
                    FallbackPolicy::NotFound => (
                        SearchOutcome {
                            status: QueryStatus::NotFound,
                            record: None,
                            message: Some(format!(
                                "Case {} {}/{} could not be located ({detail}).",
                                input.case_type, input.case_number, input.filing_year
                            )),
                        },
                        None,
                    ),
                }
            }

            LiveOutcome::Unreachable { details } => match policy {
                FallbackPolicy::Demo => (
                    self.demo_outcome(
                        input,
                        format!(
                            "The {} website is currently not accessible ({details}). \
                             Showing demo data instead.",
                            self.config.court.name
                        ),
                    ),
                    None,
                ),
                FallbackPolicy::NotFound => (
                    SearchOutcome {
                        status: QueryStatus::Error,
                        record: None,
                        message: Some(format!(
                            "The {} website is currently not accessible: {details}",
                            self.config.court.name
                        )),
                    },
                    None,
                ),
            },
        }
    }

    fn demo_outcome(&self, input: &QueryInput, message: String) -> SearchOutcome {
        let record = demo::generate(
            &input.case_type,
            &input.case_number,
            input.filing_year,
            &self.config.court.name,
        );
        SearchOutcome {
            status: QueryStatus::DemoFallback,
            record: Some(record),
            message: Some(message),
        }
    }
}

/// Hidden form fields (ASP.NET viewstate, CSRF tokens) that must be
/// round-tripped into every submission.
pub fn extract_hidden_fields(html: &str) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    document
        .select(&HIDDEN_INPUT_SEL)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            if name.is_empty() {
                return None;
            }
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

fn strategy_url(search_url: &str, path: &str) -> String {
    if path.is_empty() {
        search_url.to_string()
    } else {
        format!("{}{}", search_url.trim_end_matches('/'), path)
    }
}

fn build_form(
    strategy: &SearchStrategy,
    input: &QueryInput,
    hidden_fields: &[(String, String)],
) -> Vec<(String, String)> {
    let year = input.filing_year.to_string();
    let mut form: Vec<(String, String)> = strategy
        .fields
        .iter()
        .map(|(name, value)| {
            let resolved = match value {
                FieldValue::CaseType => input.case_type.clone(),
                FieldValue::CaseNumber => input.case_number.clone(),
                FieldValue::FilingYear => year.clone(),
                FieldValue::Literal(literal) => (*literal).to_string(),
            };
            ((*name).to_string(), resolved)
        })
        .collect();

    for (name, value) in hidden_fields {
        if !form.iter().any(|(existing, _)| existing == name) {
            form.push((name.clone(), value.clone()));
        }
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CourtClient;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn input() -> QueryInput {
        QueryInput {
            case_type: "Civil Suit".to_string(),
            case_number: "45".to_string(),
            filing_year: 2023,
        }
    }

    fn test_config(base_url: &str, policy: FallbackPolicy) -> Config {
        let mut config = Config::default();
        config.court.base_url = base_url.to_string();
        config.court.search_path = "/search".to_string();
        config.http.timeout_seconds = 1;
        config.http.max_retries = 1;
        config.http.retry_backoff_ms = 10;
        config.fallback.policy = policy;
        config
    }

    fn orchestrator(
        config: Config,
    ) -> (tempfile::TempDir, Arc<QueryStore>, QueryOrchestrator) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store =
            Arc::new(QueryStore::open(&dir.path().join("queries.db")).expect("open store"));
        let config = Arc::new(config);
        let client = Arc::new(
            CourtClient::new(&config.http, &config.court.base_url).expect("client should build"),
        );
        let orchestrator = QueryOrchestrator::new(config, client, Arc::clone(&store));
        (dir, store, orchestrator)
    }

    fn search_form_page() -> &'static str {
        r#"<html><body>
        <h1>Case Status Search</h1>
        <form method="post">
            <input type="hidden" name="__VIEWSTATE" value="dDwtMTA5" />
            <input type="hidden" name="csrf_token" value="tok-123" />
            <input type="text" name="case_no" />
            <input type="submit" value="Search" />
        </form>
        </body></html>"#
    }

    fn result_page() -> &'static str {
        r#"<html><body>
        <h2>Civil Suit 45/2023</h2>
        <table>
            <tr><td>Petitioner</td><td>Ramesh Kumar</td></tr>
            <tr><td>Respondent</td><td>Suresh Patil</td></tr>
            <tr><td>Filing Date</td><td>15-03-2023</td></tr>
            <tr><td>Case Status</td><td>Pending for evidence</td></tr>
        </table>
        </body></html>"#
    }

    #[tokio::test]
    async fn end_to_end_success_against_mock_site() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_form_page()))
            .mount(&server)
            .await;
        // The first strategy POSTs to the search page; hidden fields must be
        // round-tripped into the submission.
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_string_contains("__VIEWSTATE"))
            .and(body_string_contains("case_no=45"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page()))
            .mount(&server)
            .await;

        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));
        let outcome = orchestrator.run(input(), "127.0.0.1").await;

        assert_eq!(outcome.status, QueryStatus::Success);
        let record = outcome.record.expect("success carries a record");
        assert_eq!(record.case_number, "45");
        assert_eq!(record.filing_year, 2023);
        assert_eq!(record.petitioners, vec!["Ramesh Kumar".to_string()]);
        assert!(!record.synthetic);

        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "success");
    }

    #[tokio::test]
    async fn implausible_filing_year_is_rejected_before_any_network_call() {
        let server = MockServer::start().await;
        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));

        let outcome = orchestrator
            .run(
                QueryInput {
                    filing_year: 1800,
                    ..input()
                },
                "127.0.0.1",
            )
            .await;

        assert_eq!(outcome.status, QueryStatus::ValidationError);
        assert!(outcome.record.is_none());
        assert!(server.received_requests().await.unwrap_or_default().is_empty());

        // The rejected submission is still logged.
        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "validation_error");
    }

    #[tokio::test]
    async fn malformed_case_number_is_rejected() {
        let server = MockServer::start().await;
        let (_dir, _store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));

        let outcome = orchestrator
            .run(
                QueryInput {
                    case_number: "45; DROP TABLE".to_string(),
                    ..input()
                },
                "127.0.0.1",
            )
            .await;
        assert_eq!(outcome.status, QueryStatus::ValidationError);
    }

    #[tokio::test]
    async fn unreachable_site_falls_back_to_deterministic_demo_data() {
        let server = MockServer::start().await;
        // No mounted mocks: every fetch gets a 404 and live search fails.
        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));

        let first = orchestrator.run(input(), "127.0.0.1").await;
        let second = orchestrator.run(input(), "127.0.0.1").await;

        assert_eq!(first.status, QueryStatus::DemoFallback);
        let first_record = first.record.expect("fallback carries a record");
        assert!(first_record.synthetic);
        assert!(first_record.document_links.iter().all(|l| l.url.is_none()));
        assert_eq!(Some(&first_record), second.record.as_ref());

        // One log row per invocation.
        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.status == "demo_fallback"));
    }

    #[tokio::test]
    async fn unreachable_site_without_demo_policy_reports_error() {
        let server = MockServer::start().await;
        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::NotFound));

        let outcome = orchestrator.run(input(), "127.0.0.1").await;
        assert_eq!(outcome.status, QueryStatus::Error);
        assert!(outcome.record.is_none());
        assert!(outcome.message.is_some());

        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "error");
    }

    #[tokio::test]
    async fn captcha_on_search_page_short_circuits_to_demo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><form>
                    <img src="/captcha.php" />
                    <input name="code" />
                </form></body></html>"#,
            ))
            .mount(&server)
            .await;
        // No POST mock: strategies must not run once a CAPTCHA is seen.

        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));
        let outcome = orchestrator.run(input(), "127.0.0.1").await;

        assert_eq!(outcome.status, QueryStatus::DemoFallback);
        assert!(outcome.record.expect("demo record").synthetic);
        assert!(outcome.message.expect("message").contains("CAPTCHA"));

        let requests = server.received_requests().await.unwrap_or_default();
        assert!(requests
            .iter()
            .all(|r| r.method.to_string().eq_ignore_ascii_case("GET")));

        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows[0].status, "demo_fallback");
    }

    #[tokio::test]
    async fn captcha_without_demo_policy_yields_captcha_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><div class="g-recaptcha"></div></body></html>"#,
            ))
            .mount(&server)
            .await;

        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::NotFound));
        let outcome = orchestrator.run(input(), "127.0.0.1").await;

        assert_eq!(outcome.status, QueryStatus::CaptchaBlocked);
        assert!(outcome.record.is_none());

        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows[0].status, "captcha_blocked");
    }

    #[tokio::test]
    async fn confirmed_no_record_stays_not_found_even_with_demo_policy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_form_page()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><table><tr><td colspan="2">
                    No record found for the given case details
                </td></tr></table></body></html>"#,
            ))
            .mount(&server)
            .await;

        let (_dir, store, orchestrator) =
            orchestrator(test_config(&server.uri(), FallbackPolicy::Demo));
        let outcome = orchestrator.run(input(), "127.0.0.1").await;

        assert_eq!(outcome.status, QueryStatus::NotFound);
        assert!(outcome.record.is_none());

        let rows = store.list_recent_queries(10).await.expect("list");
        assert_eq!(rows[0].status, "not_found");
    }

    #[test]
    fn hidden_fields_are_extracted_by_name() {
        let fields = extract_hidden_fields(search_form_page());
        assert_eq!(
            fields,
            vec![
                ("__VIEWSTATE".to_string(), "dDwtMTA5".to_string()),
                ("csrf_token".to_string(), "tok-123".to_string()),
            ]
        );
    }

    #[test]
    fn build_form_resolves_fields_and_appends_hidden() {
        let hidden = vec![("__VIEWSTATE".to_string(), "vs".to_string())];
        let form = build_form(&STRATEGIES[0], &input(), &hidden);

        assert!(form.contains(&("case_no".to_string(), "45".to_string())));
        assert!(form.contains(&("case_year".to_string(), "2023".to_string())));
        assert!(form.contains(&("case_type".to_string(), "Civil Suit".to_string())));
        assert!(form.contains(&("__VIEWSTATE".to_string(), "vs".to_string())));
    }

    #[test]
    fn hidden_fields_never_override_strategy_fields() {
        let hidden = vec![("case_no".to_string(), "stale".to_string())];
        let form = build_form(&STRATEGIES[0], &input(), &hidden);
        let values: Vec<&str> = form
            .iter()
            .filter(|(name, _)| name == "case_no")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(values, vec!["45"]);
    }

    #[test]
    fn strategy_table_is_ordered_data() {
        assert!(STRATEGIES.len() >= 4);
        assert_eq!(STRATEGIES[0].label, "ecourts-standard");
        assert!(STRATEGIES
            .iter()
            .any(|s| s.method == FormMethod::Get));
    }
}
