//! # District Court Case Search
//!
//! ## Overview
//! This library implements a small web application for looking up case records
//! on the Wardha District Court's public website. Live lookups are scraped from
//! the court site; when the site is unreachable or protected by a CAPTCHA the
//! application falls back to deterministic demo data so the user always gets a
//! rendered result.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `client`: pooled HTTP client with timeout, retry and backoff handling
//! - `captcha`: CAPTCHA marker detection over fetched markup
//! - `parser`: case-detail extraction from court result pages
//! - `demo`: deterministic synthetic case records for fallback
//! - `orchestrator`: strategy-driven search loop tying the above together
//! - `probe`: court-site connectivity checks
//! - `storage`: append-only query and status logs in SQLite
//! - `api`: web endpoints (search form, dashboard, JSON APIs)
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: case type, case number and filing year from the search form
//! - **Output**: rendered case details (live or synthetic), query statistics
//! - **Persistence**: every search and connectivity probe is logged

// Core modules
pub mod api;
pub mod captcha;
pub mod catalog;
pub mod client;
pub mod config;
pub mod demo;
pub mod errors;
pub mod orchestrator;
pub mod parser;
pub mod probe;
pub mod storage;

// Re-exports for convenience
pub use config::Config;
pub use errors::{AppError, Result};
pub use orchestrator::{QueryInput, QueryOrchestrator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Terminal outcome of one search submission.
///
/// Every query log row carries exactly one of these; a parsed or synthetic
/// [`CaseRecord`] is attached only for `Success` and `DemoFallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Success,
    CaptchaBlocked,
    NotFound,
    DemoFallback,
    ValidationError,
    Error,
}

impl QueryStatus {
    /// Stable string form used in the database and JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Success => "success",
            QueryStatus::CaptchaBlocked => "captcha_blocked",
            QueryStatus::NotFound => "not_found",
            QueryStatus::DemoFallback => "demo_fallback",
            QueryStatus::ValidationError => "validation_error",
            QueryStatus::Error => "error",
        }
    }

    /// Whether a case record accompanies this status.
    pub fn carries_record(&self) -> bool {
        matches!(self, QueryStatus::Success | QueryStatus::DemoFallback)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A court order or judgment entry attached to a case, with an optional
/// downloadable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    /// Human-readable description of the order
    pub label: String,
    /// Absolute URL of the document, if one was published
    pub url: Option<String>,
    /// Order date in `YYYY-MM-DD` form when it could be determined
    pub order_date: Option<String>,
}

/// Structured representation of a court case's public metadata.
///
/// Produced either by the parser (live scrape) or the demo generator
/// (synthetic); `synthetic` distinguishes the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub title: String,
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i32,
    pub court_name: String,
    pub petitioners: Vec<String>,
    pub respondents: Vec<String>,
    pub filing_date: Option<String>,
    pub next_hearing_date: Option<String>,
    pub status: Option<String>,
    pub stage: Option<String>,
    pub judge: Option<String>,
    pub document_links: Vec<DocumentLink>,
    /// True when this record was generated locally rather than scraped
    pub synthetic: bool,
    /// Caveat shown to the user alongside synthetic or partial records
    pub note: Option<String>,
}

/// One row of the append-only query log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseQuery {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i32,
    pub queried_at: DateTime<Utc>,
    pub status: QueryStatus,
    pub raw_response: Option<String>,
    pub parsed_data: Option<CaseRecord>,
    pub error_message: Option<String>,
    pub requester_address: String,
    pub court_name: String,
}

/// Availability classification from one connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtStatus {
    Up,
    Down,
    Degraded,
}

impl CourtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtStatus::Up => "up",
            CourtStatus::Down => "down",
            CourtStatus::Degraded => "degraded",
        }
    }
}

/// One row of the append-only court-status log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtStatusCheck {
    pub court_name: String,
    pub url: String,
    pub status: CourtStatus,
    pub response_time_ms: i64,
    pub checked_at: DateTime<Utc>,
    pub error_details: Option<String>,
}

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub client: Arc<client::CourtClient>,
    pub store: Arc<storage::QueryStore>,
    pub orchestrator: Arc<orchestrator::QueryOrchestrator>,
}
