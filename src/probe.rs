//! # Connectivity Probe Module
//!
//! ## Purpose
//! Checks whether the court website is reachable before a search is attempted
//! and on demand via the `/api/test_connection` endpoint. District-court URLs
//! move around between the district portal and the central e-courts services,
//! so a probe walks an ordered list of candidates and returns the first one
//! that actually looks like a court site.
//!
//! ## Input/Output Specification
//! - **Input**: the configured probe URL list
//! - **Output**: the first usable URL (if any); one [`CourtStatusCheck`] row
//!   per probed URL is appended to the status log
//!
//! A 200 response alone is not enough: parked domains and maintenance pages
//! also answer 200, so the body must look like a court site before a URL is
//! accepted.

use crate::client::CourtClient;
use crate::config::CourtConfig;
use crate::storage::QueryStore;
use crate::{CourtStatus, CourtStatusCheck};
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};

/// Keywords expected somewhere in a genuine court page.
const SITE_INDICATORS: &[&str] = &[
    "case", "court", "wardha", "district", "ecourts", "case status", "petitioner", "judicial",
    "maharashtra", "search",
];

/// Minimum indicator hits for a page to count as a court site.
const MIN_INDICATORS: usize = 3;

/// Minimum body size; error stubs and redirect shells are smaller.
const MIN_BODY_BYTES: usize = 1000;

/// Probe the configured URLs in order and return the first usable one.
///
/// Every probed URL gets a status row: `up` when usable, `degraded` when it
/// answered 200 but does not look like a court site, `down` on fetch failure.
/// Status-log write failures are logged and ignored.
pub async fn find_working_url(
    client: &CourtClient,
    court: &CourtConfig,
    store: &QueryStore,
) -> Option<String> {
    for url in &court.probe_urls {
        let started = Instant::now();
        let outcome = client.get_once(url).await;
        let response_time_ms = started.elapsed().as_millis() as i64;

        let (status, error_details) = match &outcome {
            Ok(response) if looks_like_court_site(&response.body) => (CourtStatus::Up, None),
            Ok(response) => (
                CourtStatus::Degraded,
                Some(format!(
                    "answered {} but content validation failed ({} bytes)",
                    response.status,
                    response.body.len()
                )),
            ),
            Err(error) => (CourtStatus::Down, Some(error.to_string())),
        };

        let check = CourtStatusCheck {
            court_name: court.name.clone(),
            url: url.clone(),
            status,
            response_time_ms,
            checked_at: Utc::now(),
            error_details,
        };
        if let Err(error) = store.record_status_check(&check).await {
            warn!(url = url.as_str(), error = %error, "failed to record status check");
        }

        if status == CourtStatus::Up {
            info!(url = url.as_str(), response_time_ms, "court website accessible");
            return Some(url.clone());
        }
        warn!(
            url = url.as_str(),
            status = status.as_str(),
            "probe did not find a usable court page"
        );
    }

    warn!(court = court.name.as_str(), "no probe URL is accessible");
    None
}

/// Heuristic body validation for a probed page.
fn looks_like_court_site(body: &str) -> bool {
    if body.len() < MIN_BODY_BYTES {
        return false;
    }
    let lowered = body.to_lowercase();
    let hits = SITE_INDICATORS
        .iter()
        .filter(|indicator| lowered.contains(*indicator))
        .count();
    hits >= MIN_INDICATORS
}
