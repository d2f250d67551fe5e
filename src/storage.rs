//! # Storage Module
//!
//! ## Purpose
//! Append-only persistence for the two logs the application keeps: one row per
//! search submission (`case_queries`) and one row per connectivity probe
//! (`court_status_checks`), in a local SQLite database.
//!
//! ## Input/Output Specification
//! - **Input**: [`CaseQuery`] and [`CourtStatusCheck`] rows
//! - **Output**: recent-query listings and aggregate statistics
//! - **Concurrency**: a single connection guarded by an async mutex; writes
//!   from concurrent requests are serialized, reads share the same path
//!
//! Rows are never updated or deleted by the application. Storage failures are
//! surfaced as errors for the caller to log; they must never abort the
//! user-facing response.

use crate::errors::Result;
use crate::{CaseQuery, CourtStatusCheck};
use chrono::SecondsFormat;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS case_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    case_type TEXT NOT NULL,
    case_number TEXT NOT NULL,
    filing_year INTEGER NOT NULL,
    queried_at TEXT NOT NULL,
    status TEXT NOT NULL,
    raw_response TEXT,
    parsed_data TEXT,
    error_message TEXT,
    requester_address TEXT,
    court_name TEXT
);

CREATE TABLE IF NOT EXISTS court_status_checks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    court_name TEXT NOT NULL,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    response_time_ms INTEGER,
    checked_at TEXT NOT NULL,
    error_details TEXT
);
";

/// One row of the recent-queries listing.
#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    pub case_type: String,
    pub case_number: String,
    pub filing_year: i64,
    pub queried_at: String,
    pub status: String,
}

/// One row of the status-check history, as rendered by the API.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCheckSummary {
    pub url: String,
    pub status: String,
    pub response_time_ms: i64,
    pub checked_at: String,
    pub error_details: Option<String>,
}

/// A labelled count used by the statistics endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LabelledCount {
    pub key: String,
    pub count: i64,
}

/// Aggregate view over both logs.
#[derive(Debug, Clone, Serialize)]
pub struct QueryStats {
    pub total_queries: i64,
    pub status_counts: Vec<LabelledCount>,
    pub case_type_counts: Vec<LabelledCount>,
    pub daily_counts: Vec<LabelledCount>,
    pub recent_checks: Vec<StatusCheckSummary>,
}

/// Append-only store over the local SQLite database.
pub struct QueryStore {
    conn: Mutex<Connection>,
}

impl QueryStore {
    /// Open (creating if necessary) the database and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!(db_path = %path.display(), "query store initialized");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one query-log row. Returns the new row id.
    pub async fn record_query(&self, query: &CaseQuery) -> Result<i64> {
        let parsed_data = query
            .parsed_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO case_queries
                (case_type, case_number, filing_year, queried_at, status,
                 raw_response, parsed_data, error_message, requester_address, court_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                query.case_type,
                query.case_number,
                query.filing_year,
                // Whole-second RFC 3339 with a Z suffix keeps SQLite's date
                // functions happy in the aggregate queries below.
                query.queried_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                query.status.as_str(),
                query.raw_response,
                parsed_data,
                query.error_message,
                query.requester_address,
                query.court_name,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Append one status-check row.
    pub async fn record_status_check(&self, check: &CourtStatusCheck) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO court_status_checks
                (court_name, url, status, response_time_ms, checked_at, error_details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                check.court_name,
                check.url,
                check.status.as_str(),
                check.response_time_ms,
                check.checked_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                check.error_details,
            ],
        )?;
        Ok(())
    }

    /// The most recent queries, newest first.
    pub async fn list_recent_queries(&self, limit: u32) -> Result<Vec<QuerySummary>> {
        let conn = self.conn.lock().await;
        let mut statement = conn.prepare(
            "SELECT case_type, case_number, filing_year, queried_at, status
             FROM case_queries
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let rows = statement.query_map([limit], |row| {
            Ok(QuerySummary {
                case_type: row.get(0)?,
                case_number: row.get(1)?,
                filing_year: row.get(2)?,
                queried_at: row.get(3)?,
                status: row.get(4)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Aggregate statistics for the dashboard and stats endpoints.
    pub async fn aggregate_stats(&self) -> Result<QueryStats> {
        let conn = self.conn.lock().await;

        let total_queries: i64 =
            conn.query_row("SELECT COUNT(*) FROM case_queries", [], |row| row.get(0))?;

        let status_counts = labelled_counts(
            &conn,
            "SELECT status, COUNT(*) FROM case_queries
             GROUP BY status ORDER BY COUNT(*) DESC",
        )?;

        let case_type_counts = labelled_counts(
            &conn,
            "SELECT case_type, COUNT(*) FROM case_queries
             GROUP BY case_type ORDER BY COUNT(*) DESC LIMIT 10",
        )?;

        let daily_counts = labelled_counts(
            &conn,
            "SELECT DATE(queried_at), COUNT(*) FROM case_queries
             WHERE queried_at >= date('now', '-7 days')
             GROUP BY DATE(queried_at) ORDER BY DATE(queried_at) DESC",
        )?;

        let mut statement = conn.prepare(
            "SELECT url, status, response_time_ms, checked_at, error_details
             FROM court_status_checks
             ORDER BY id DESC
             LIMIT 5",
        )?;
        let rows = statement.query_map([], |row| {
            Ok(StatusCheckSummary {
                url: row.get(0)?,
                status: row.get(1)?,
                response_time_ms: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                checked_at: row.get(3)?,
                error_details: row.get(4)?,
            })
        })?;
        let mut recent_checks = Vec::new();
        for row in rows {
            recent_checks.push(row?);
        }

        Ok(QueryStats {
            total_queries,
            status_counts,
            case_type_counts,
            daily_counts,
            recent_checks,
        })
    }
}

fn labelled_counts(conn: &Connection, sql: &str) -> Result<Vec<LabelledCount>> {
    let mut statement = conn.prepare(sql)?;
    let rows = statement.query_map([], |row| {
        Ok(LabelledCount {
            key: row.get(0)?,
            count: row.get(1)?,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}
