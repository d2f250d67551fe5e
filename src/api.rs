//! # API Server Module
//!
//! ## Purpose
//! Web surface of the application: the search form, the rendered result and
//! dashboard pages, a document-download proxy and a small set of JSON
//! endpoints over the orchestrator and the query store.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests (search form posts, JSON API calls)
//! - **Output**: Rendered HTML pages and JSON responses
//! - **Endpoints**: `/`, `/search`, `/dashboard`, `/download_pdf`,
//!   `/api/case_types`, `/api/test_connection`, `/api/stats`, `/health`
//!
//! HTML is rendered inline from small helper functions; there is no template
//! layer. All user-controlled text is escaped before it reaches a page.

use crate::catalog;
use crate::config::CourtConfig;
use crate::errors::{AppError, Result};
use crate::orchestrator::QueryInput;
use crate::probe;
use crate::{AppState, CaseRecord};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use tracing::{error, info, warn};

/// Search form payload
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: String,
}

/// Document download parameters
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub url: String,
    pub filename: Option<String>,
}

/// Web server over the shared application state.
pub struct ApiServer {
    app_state: AppState,
}

impl ApiServer {
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the server until it is shut down.
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;
        let state = self.app_state;

        info!(bind_addr = bind_addr.as_str(), "starting web server");

        HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .route("/", web::get().to(index_handler))
                .route("/search", web::post().to(search_handler))
                .route("/dashboard", web::get().to(dashboard_handler))
                .route("/download_pdf", web::get().to(download_pdf_handler))
                .route("/api/case_types", web::get().to(case_types_handler))
                .route("/api/test_connection", web::get().to(test_connection_handler))
                .route("/api/stats", web::get().to(stats_handler))
                .route("/health", web::get().to(health_handler))
                .default_service(web::route().to(not_found_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| AppError::Internal {
            message: format!("failed to bind server to {bind_addr}: {e}"),
        })?
        .run()
        .await
        .map_err(|e| AppError::Internal {
            message: format!("server error: {e}"),
        })
    }
}

/// Search form page
async fn index_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(html_response(render_index(&state.config.court.name, None)))
}

/// Handle a search submission and render the outcome.
async fn search_handler(
    state: web::Data<AppState>,
    form: web::Form<SearchForm>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let requester = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    // A non-numeric year becomes 0, which input validation rejects and logs
    // like any other invalid submission.
    let input = QueryInput {
        case_type: form.case_type.trim().to_string(),
        case_number: form.case_number.trim().to_string(),
        filing_year: form.filing_year.trim().parse().unwrap_or(0),
    };

    let outcome = state.orchestrator.run(input, &requester).await;

    let page = match &outcome.record {
        Some(record) => render_result(record, outcome.message.as_deref()),
        None => render_index(
            &state.config.court.name,
            Some(
                outcome
                    .message
                    .as_deref()
                    .unwrap_or("The search could not be completed. Please try again."),
            ),
        ),
    };
    Ok(html_response(page))
}

/// Aggregate statistics page
async fn dashboard_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.store.aggregate_stats().await {
        Ok(stats) => Ok(html_response(render_dashboard(
            &state.config.court.name,
            &stats,
        ))),
        Err(e) => {
            error!(error = %e, "failed to build dashboard");
            Ok(html_response(render_index(
                &state.config.court.name,
                Some("Dashboard temporarily unavailable"),
            )))
        }
    }
}

/// Proxy a court document to the browser as a file download.
async fn download_pdf_handler(
    state: web::Data<AppState>,
    params: web::Query<DownloadParams>,
) -> ActixResult<HttpResponse> {
    if params.url.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "PDF URL is required"
        })));
    }

    if !is_allowed_document_url(&params.url, &state.config.court) {
        warn!(url = params.url.as_str(), "rejected document URL outside court hosts");
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Document URL must point at the court website"
        })));
    }

    let filename = sanitize_filename(params.filename.as_deref());

    match state.client.get_bytes(&params.url).await {
        Ok(response) => {
            let looks_like_pdf = response
                .content_type
                .as_deref()
                .map(|ct| ct.to_lowercase().contains("pdf"))
                .unwrap_or(false)
                || response.body.starts_with(b"%PDF");

            if !looks_like_pdf || response.body.len() < 100 {
                warn!(
                    url = params.url.as_str(),
                    bytes = response.body.len(),
                    "document response does not look like a PDF"
                );
                return Ok(HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Invalid PDF or file not found on the court website"
                })));
            }

            info!(url = params.url.as_str(), bytes = response.body.len(), "document proxied");
            Ok(HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(response.body))
        }
        Err(e) => {
            error!(url = params.url.as_str(), error = %e, "document download failed");
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to download document from the court website"
            })))
        }
    }
}

/// Case-type catalog for the search form
async fn case_types_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog::CASE_TYPES))
}

/// On-demand connectivity check against the court website
async fn test_connection_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let court = &state.config.court;
    match probe::find_working_url(&state.client, court, &state.store).await {
        Some(url) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "accessible_url": url,
            "message": format!("{} website is accessible", court.name),
            "court": court.name,
        }))),
        None => Ok(HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "error",
            "message": format!("{} website is not accessible", court.name),
            "court": court.name,
        }))),
    }
}

/// Query statistics as JSON
async fn stats_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let stats = state.store.aggregate_stats().await;
    let recent = state.store.list_recent_queries(10).await;

    match (stats, recent) {
        (Ok(stats), Ok(recent_queries)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "total_queries": stats.total_queries,
            "status_counts": stats.status_counts,
            "case_type_counts": stats.case_type_counts,
            "daily_counts": stats.daily_counts,
            "recent_queries": recent_queries,
            "court_status_history": stats.recent_checks,
            "court": state.config.court.name,
        }))),
        (stats, recent) => {
            if let Err(e) = stats {
                error!(error = %e, "failed to aggregate stats");
            }
            if let Err(e) = recent {
                error!(error = %e, "failed to list recent queries");
            }
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unable to fetch statistics"
            })))
        }
    }
}

/// Liveness endpoint
async fn health_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "court": state.config.court.name,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn not_found_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(render_index(&state.config.court.name, Some("Page not found"))))
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Only documents hosted on the configured court sites may be proxied.
fn is_allowed_document_url(url: &str, court: &CourtConfig) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };

    allowed_hosts(court).iter().any(|allowed| host == allowed)
}

fn allowed_hosts(court: &CourtConfig) -> Vec<String> {
    std::iter::once(&court.base_url)
        .chain(court.probe_urls.iter())
        .filter_map(|u| reqwest::Url::parse(u).ok())
        .filter_map(|u| u.host_str().map(|h| h.to_string()))
        .collect()
}

/// Strip path components and force a `.pdf` extension on the download name.
fn sanitize_filename(requested: Option<&str>) -> String {
    let base = requested
        .unwrap_or("court_document.pdf")
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("court_document.pdf")
        .trim();

    let mut name: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();
    if name.trim_matches(['.', ' ']).is_empty() {
        name = "court_document".to_string();
    }
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

/// Escape text destined for HTML content or attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Percent-encode a value for use inside a query string.
fn encode_query_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

fn render_index(court_name: &str, error: Option<&str>) -> String {
    let error_banner = error
        .map(|message| {
            format!(
                r#"<div class="banner error">{}</div>"#,
                escape_html(message)
            )
        })
        .unwrap_or_default();

    let options: String = catalog::CASE_TYPES
        .iter()
        .map(|entry| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(entry.value),
                escape_html(entry.label)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{court} - Case Status Search</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .banner.error {{ padding: 12px; background: #fdecea; color: #b71c1c; border-radius: 4px; margin-bottom: 20px; }}
        label {{ display: block; margin-top: 12px; }}
        input, select {{ padding: 6px; min-width: 280px; }}
        button {{ margin-top: 16px; padding: 8px 24px; }}
    </style>
</head>
<body>
    <h1>{court}</h1>
    <p>Search the public case-status records. When the court website is unavailable,
       clearly marked demo data is shown instead.</p>
    {error_banner}
    <form method="post" action="/search">
        <label>Case type
            <select name="case_type">{options}</select>
        </label>
        <label>Case number
            <input type="text" name="case_number" placeholder="e.g. 45" required>
        </label>
        <label>Filing year
            <input type="text" name="filing_year" placeholder="e.g. 2023" required>
        </label>
        <button type="submit">Search</button>
    </form>
    <p><a href="/dashboard">Dashboard</a></p>
</body>
</html>"#,
        court = escape_html(court_name),
    )
}

fn render_result(record: &CaseRecord, message: Option<&str>) -> String {
    let warning = match (record.synthetic, message) {
        (true, Some(message)) => format!(
            r#"<div class="banner warning"><strong>Synthetic data:</strong> {}</div>"#,
            escape_html(message)
        ),
        (true, None) => r#"<div class="banner warning"><strong>Synthetic data</strong></div>"#
            .to_string(),
        (false, Some(message)) => {
            format!(r#"<div class="banner warning">{}</div>"#, escape_html(message))
        }
        (false, None) => String::new(),
    };

    let field_rows: String = [
        ("Court", Some(record.court_name.as_str())),
        ("Petitioner(s)", non_empty_joined(&record.petitioners).as_deref()),
        ("Respondent(s)", non_empty_joined(&record.respondents).as_deref()),
        ("Filing date", record.filing_date.as_deref()),
        ("Next hearing date", record.next_hearing_date.as_deref()),
        ("Status", record.status.as_deref()),
        ("Stage", record.stage.as_deref()),
        ("Judge", record.judge.as_deref()),
    ]
    .iter()
    .filter_map(|(label, value)| {
        value.map(|value| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(label),
                escape_html(value)
            )
        })
    })
    .collect();

    let document_rows: String = record
        .document_links
        .iter()
        .map(|link| {
            let date = link.order_date.as_deref().unwrap_or("-");
            let action = match &link.url {
                Some(url) => format!(
                    r#"<a href="/download_pdf?url={}&filename={}">Download</a>"#,
                    encode_query_component(url),
                    encode_query_component(&format!("{}.pdf", record.case_number)),
                ),
                None => "-".to_string(),
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(date),
                escape_html(&link.label),
                action
            )
        })
        .collect();

    let documents_section = if document_rows.is_empty() {
        "<p>No orders or documents listed.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Date</th><th>Description</th><th>Document</th></tr>{document_rows}</table>"
        )
    };

    let note = record
        .note
        .as_deref()
        .map(|note| format!("<p><em>{}</em></p>", escape_html(note)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .banner.warning {{ padding: 12px; background: #fff8e1; color: #8d6e00; border-radius: 4px; margin-bottom: 20px; }}
        table {{ border-collapse: collapse; margin-top: 12px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px 12px; text-align: left; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {warning}
    <table>{field_rows}</table>
    <h2>Orders and documents</h2>
    {documents_section}
    {note}
    <p><a href="/">New search</a></p>
</body>
</html>"#,
        title = escape_html(&record.title),
    )
}

fn render_dashboard(court_name: &str, stats: &crate::storage::QueryStats) -> String {
    let status_rows: String = stats
        .status_counts
        .iter()
        .map(|c| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(&c.key), c.count))
        .collect();
    let case_type_rows: String = stats
        .case_type_counts
        .iter()
        .map(|c| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(&c.key), c.count))
        .collect();
    let daily_rows: String = stats
        .daily_counts
        .iter()
        .map(|c| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(&c.key), c.count))
        .collect();
    let check_rows: String = stats
        .recent_checks
        .iter()
        .map(|check| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{} ms</td><td>{}</td></tr>",
                escape_html(&check.url),
                escape_html(&check.status),
                check.response_time_ms,
                escape_html(check.error_details.as_deref().unwrap_or("-")),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{court} - Dashboard</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        table {{ border-collapse: collapse; margin: 12px 0 24px; }}
        th, td {{ border: 1px solid #ddd; padding: 6px 12px; text-align: left; }}
    </style>
</head>
<body>
    <h1>{court} - Dashboard</h1>
    <p>Total queries: <strong>{total}</strong></p>
    <h2>Queries by status</h2>
    <table><tr><th>Status</th><th>Count</th></tr>{status_rows}</table>
    <h2>Top case types</h2>
    <table><tr><th>Case type</th><th>Count</th></tr>{case_type_rows}</table>
    <h2>Queries in the last 7 days</h2>
    <table><tr><th>Date</th><th>Count</th></tr>{daily_rows}</table>
    <h2>Recent connectivity checks</h2>
    <table><tr><th>URL</th><th>Status</th><th>Response time</th><th>Details</th></tr>{check_rows}</table>
    <p><a href="/">New search</a></p>
</body>
</html>"#,
        court = escape_html(court_name),
        total = stats.total_queries,
    )
}

fn non_empty_joined(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}
