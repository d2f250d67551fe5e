//! # HTTP Client Module
//!
//! ## Purpose
//! A single pooled HTTP client for all traffic to the court website: search
//! page loads, form submissions, connectivity probes and document downloads.
//!
//! ## Input/Output Specification
//! - **Input**: URLs, query parameters, form fields
//! - **Output**: Response status and body, or a classified fetch error
//! - **Retry policy**: idempotent GETs are retried with exponential backoff on
//!   transient failures (timeouts, connection errors, 5xx); 4xx responses are
//!   surfaced immediately and form POSTs are never replayed
//!
//! Government court sites are served with long tail latencies, intermittent
//! 5xx responses and occasionally broken TLS chains; the defaults here mirror
//! what reliably works against them.

use crate::config::HttpClientConfig;
use crate::errors::{AppError, FetchKind, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// A successful text response from the court site.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

/// A successful binary response, used when proxying documents.
#[derive(Debug, Clone)]
pub struct BinaryResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Pooled HTTP client for the court website.
pub struct CourtClient {
    http: Client,
    max_retries: u32,
    backoff: Duration,
    referer: String,
}

impl CourtClient {
    /// Build the client once at startup; connections are pooled across
    /// queries.
    pub fn new(config: &HttpClientConfig, referer: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9,hi;q=0.8"),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            // Several district-court hosts serve expired or mismatched
            // certificate chains; strict verification makes them unreachable.
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            max_retries: config.max_retries.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
            referer: referer.to_string(),
        })
    }

    /// GET a page, retrying transient failures up to the configured budget.
    pub async fn get(&self, url: &str, params: &[(String, String)]) -> Result<FetchResponse> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.get_once_with_params(url, params).await {
                Ok(response) => return Ok(response),
                Err(error) if error.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        url,
                        attempt,
                        max_retries = self.max_retries,
                        error = %error,
                        backoff_ms = delay.as_millis() as u64,
                        "transient fetch failure, backing off"
                    );
                    sleep(delay).await;
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::Internal {
            message: "retry loop exited without an error".to_string(),
        }))
    }

    /// Single-attempt GET, used by the connectivity probe where the caller
    /// iterates alternative URLs itself.
    pub async fn get_once(&self, url: &str) -> Result<FetchResponse> {
        self.get_once_with_params(url, &[]).await
    }

    async fn get_once_with_params(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<FetchResponse> {
        debug!(url, "GET");
        let mut request = self.http.get(url).header(REFERER, &self.referer);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|e| classify(e, url))?;
        read_text(response, url).await
    }

    /// Submit a search form. Form submissions are not idempotent and are never
    /// replayed; a transient failure surfaces to the caller, which moves on to
    /// the next search strategy.
    pub async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<FetchResponse> {
        debug!(url, fields = form.len(), "POST form");
        let response = self
            .http
            .post(url)
            .header(REFERER, &self.referer)
            .form(form)
            .send()
            .await
            .map_err(|e| classify(e, url))?;
        read_text(response, url).await
    }

    /// Fetch binary content, used to proxy order documents to the browser.
    pub async fn get_bytes(&self, url: &str) -> Result<BinaryResponse> {
        debug!(url, "GET bytes");
        let response = self
            .http
            .get(url)
            .header(REFERER, &self.referer)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                kind: FetchKind::HttpStatus(status.as_u16()),
                url: url.to_string(),
                details: format!("server answered {status}"),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, url))?
            .to_vec();

        Ok(BinaryResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

async fn read_text(response: reqwest::Response, url: &str) -> Result<FetchResponse> {
    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(AppError::Fetch {
            kind: FetchKind::HttpStatus(status.as_u16()),
            url: url.to_string(),
            details: format!("server answered {status}"),
        });
    }

    let body = response.text().await.map_err(|e| classify(e, url))?;
    Ok(FetchResponse {
        status: status.as_u16(),
        body,
        final_url,
    })
}

/// Map a transport-level error onto the fetch taxonomy.
fn classify(error: reqwest::Error, url: &str) -> AppError {
    let kind = if error.is_timeout() {
        FetchKind::Timeout
    } else {
        FetchKind::Connection
    };
    AppError::Fetch {
        kind,
        url: url.to_string(),
        details: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(max_retries: u32) -> HttpClientConfig {
        HttpClientConfig {
            timeout_seconds: 1,
            max_retries,
            retry_backoff_ms: 10,
            user_agent: "court-search-tests".to_string(),
        }
    }

    fn client(max_retries: u32) -> CourtClient {
        CourtClient::new(&test_config(max_retries), "http://localhost")
            .expect("client should build")
    }

    #[tokio::test]
    async fn get_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/case-status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let response = client(3)
            .get(&format!("{}/case-status", server.uri()), &[])
            .await
            .expect("fetch should succeed");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn timeout_budget_is_respected() {
        let server = MockServer::start().await;
        // Every attempt times out; with a budget of 3 there must be no 4th.
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .expect(3)
            .mount(&server)
            .await;

        let error = client(3)
            .get(&format!("{}/slow", server.uri()), &[])
            .await
            .expect_err("fetch should exhaust its retries");
        match error {
            AppError::Fetch { kind, .. } => assert_eq!(kind, FetchKind::Timeout),
            other => panic!("expected fetch error, got {other:?}"),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let response = client(3)
            .get(&format!("{}/flaky", server.uri()), &[])
            .await
            .expect("third attempt should succeed");
        assert_eq!(response.body, "recovered");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let error = client(3)
            .get(&format!("{}/missing", server.uri()), &[])
            .await
            .expect_err("404 should fail immediately");
        match error {
            AppError::Fetch { kind, .. } => assert_eq!(kind, FetchKind::HttpStatus(404)),
            other => panic!("expected fetch error, got {other:?}"),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn post_is_never_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let form = vec![("case_no".to_string(), "45".to_string())];
        let error = client(3)
            .post_form(&format!("{}/search", server.uri()), &form)
            .await
            .expect_err("500 on POST should fail without retry");
        assert!(matches!(error, AppError::Fetch { .. }));
        server.verify().await;
    }

    #[tokio::test]
    async fn get_bytes_reports_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]),
            )
            .mount(&server)
            .await;

        let response = client(3)
            .get_bytes(&format!("{}/doc.pdf", server.uri()))
            .await
            .expect("download should succeed");
        assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(&response.body[..4], b"%PDF");
    }
}
