//! # HTML Parser Module
//!
//! ## Purpose
//! Extracts structured case details from court result pages. District e-courts
//! pages render case data as label/value table rows with inconsistent field
//! names (English and Marathi), so extraction is keyword-driven and tolerant:
//! a missing optional field becomes an empty value, and only the absence of
//! any recognizable result structure is an error.
//!
//! ## Input/Output Specification
//! - **Input**: Raw HTML of a search-result page plus the originating query
//! - **Output**: A [`CaseRecord`], or a parse error classified as
//!   `NotFound` (the site reports no matching case) or `Malformed` (the page
//!   has no recognizable result structure at all)

use crate::config::CourtConfig;
use crate::errors::{AppError, ParseReason, Result};
use crate::orchestrator::QueryInput;
use crate::{CaseRecord, DocumentLink};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Phrases the court site uses to report a missing case, in English and
/// Marathi.
const ERROR_INDICATORS: &[&str] = &[
    "no record found",
    "record not found",
    "case not found",
    "no records found",
    "no data available",
    "case does not exist",
    "invalid case number",
    "रेकॉर्ड आढळला नाही",
    "केस सापडला नाही",
    "कोणताही डेटा उपलब्ध नाही",
];

const PETITIONER_KEYWORDS: &[&str] = &["petitioner", "applicant", "plaintiff", "अर्जदार", "फिर्यादी"];
const RESPONDENT_KEYWORDS: &[&str] = &["respondent", "defendant", "प्रतिवादी", "बचावपक्ष"];
const JUDGE_KEYWORDS: &[&str] = &["judge", "न्यायाधीश", "न्यायमूर्ती"];

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("static selector"));
static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("static selector"));
static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
static HEADER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4").expect("static selector"));
static PDF_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*=".pdf"]"#).expect("static selector"));

/// Date fragments in link or row text, e.g. `15-03-2023` or `2023/03/15`.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,4}[-/.]\d{1,2}[-/.]\d{2,4}\b").expect("static regex"));

static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

/// Parse a search-result page into a case record.
///
/// Classification rules:
/// - an explicit "no record" message, or a structurally valid page without any
///   meaningful case fields, yields [`ParseReason::NotFound`];
/// - a page with no result structure at all (no tables, nearly no text)
///   yields [`ParseReason::Malformed`].
pub fn parse(html: &str, query: &QueryInput, court: &CourtConfig) -> Result<CaseRecord> {
    let document = Html::parse_document(html);
    let page_text: String = document.root_element().text().collect::<String>();
    let lowered = page_text.to_lowercase();

    for indicator in ERROR_INDICATORS {
        if lowered.contains(indicator) {
            return Err(AppError::parse(
                ParseReason::NotFound,
                format!("court site reported: {indicator}"),
            ));
        }
    }

    let mut record = CaseRecord {
        title: format!(
            "{} {}/{}",
            query.case_type, query.case_number, query.filing_year
        ),
        case_type: query.case_type.clone(),
        case_number: query.case_number.clone(),
        filing_year: query.filing_year,
        court_name: court.name.clone(),
        petitioners: Vec::new(),
        respondents: Vec::new(),
        filing_date: None,
        next_hearing_date: None,
        status: None,
        stage: None,
        judge: None,
        document_links: Vec::new(),
        synthetic: false,
        note: None,
    };

    extract_table_fields(&document, &mut record);
    record.document_links = extract_document_links(&document, &court.base_url);
    extract_title(&document, query, &mut record);

    if is_meaningful(&record) {
        return Ok(record);
    }

    if document.select(&TABLE_SEL).next().is_none() && lowered.trim().len() < 200 {
        return Err(AppError::parse(
            ParseReason::Malformed,
            "page has no result structure",
        ));
    }

    Err(AppError::parse(
        ParseReason::NotFound,
        "no case information could be extracted from the response",
    ))
}

/// Walk label/value table rows and fill in whatever fields are recognized.
fn extract_table_fields(document: &Html, record: &mut CaseRecord) {
    for row in document.select(&ROW_SEL) {
        let cells: Vec<String> = row.select(&CELL_SEL).map(cell_text).collect();
        if cells.len() < 2 {
            continue;
        }

        let label = cells[0].to_lowercase();
        let value = cells[1].trim().to_string();
        if value.is_empty() {
            continue;
        }

        if PETITIONER_KEYWORDS.iter().any(|k| label.contains(k)) {
            push_unique(&mut record.petitioners, value);
        } else if RESPONDENT_KEYWORDS.iter().any(|k| label.contains(k)) {
            push_unique(&mut record.respondents, value);
        } else if (label.contains("filing") || label.contains("दाखल")) && label.contains("date") {
            record.filing_date = parse_court_date(&value);
        } else if (label.contains("next") || label.contains("hearing") || label.contains("सुनावणी"))
            && label.contains("date")
        {
            record.next_hearing_date = parse_court_date(&value);
        } else if label.contains("status") || label.contains("स्थिती") {
            record.status = Some(value);
        } else if label.contains("stage") || label.contains("टप्पा") {
            record.stage = Some(value);
        } else if JUDGE_KEYWORDS.iter().any(|k| label.contains(k)) {
            record.judge = Some(value);
        }
    }
}

/// Collect order/judgment documents: PDF anchors first, then order rows that
/// carry only a description.
fn extract_document_links(document: &Html, base_url: &str) -> Vec<DocumentLink> {
    let mut links: Vec<DocumentLink> = Vec::new();

    for anchor in document.select(&PDF_LINK_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = absolutize(base_url, href);

        let mut label = cell_text(anchor);
        if label.is_empty() {
            label = "Court document".to_string();
        }

        // The order date usually sits in the link text or the surrounding row.
        let order_date = sniff_date(&label).or_else(|| {
            anchor
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| sniff_date(&cell_text(parent)))
        });

        links.push(DocumentLink {
            label,
            url: Some(url),
            order_date,
        });
    }

    for row in document.select(&ROW_SEL) {
        let cells: Vec<String> = row.select(&CELL_SEL).map(cell_text).collect();
        if cells.len() < 2 {
            continue;
        }
        let first = cells[0].to_lowercase();
        if !(first.contains("order") || first.contains("judgment") || first.contains("आदेश")) {
            continue;
        }

        let description = cells[1..].join(" - ");
        if description.len() < 15 || links.iter().any(|l| l.label == description) {
            continue;
        }

        let order_date = sniff_date(&cells.join(" "));
        links.push(DocumentLink {
            label: description,
            url: None,
            order_date,
        });
    }

    links.truncate(10);
    links
}

/// Prefer a page heading that names the case over the reconstructed title.
fn extract_title(document: &Html, query: &QueryInput, record: &mut CaseRecord) {
    let year = query.filing_year.to_string();
    for header in document.select(&HEADER_SEL) {
        let text = cell_text(header);
        if text.contains(&query.case_number) && text.contains(&year) {
            record.title = text;
            return;
        }
    }
}

/// A record is worth returning when it carries at least one substantive field.
fn is_meaningful(record: &CaseRecord) -> bool {
    !record.petitioners.is_empty()
        || !record.respondents.is_empty()
        || record.filing_date.is_some()
        || record.next_hearing_date.is_some()
        || record.status.is_some()
        || record.stage.is_some()
        || record.judge.is_some()
        || !record.document_links.is_empty()
}

fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Find the first date-looking fragment in free text and normalize it.
fn sniff_date(text: &str) -> Option<String> {
    DATE_RE
        .find_iter(text)
        .find_map(|m| parse_court_date(m.as_str()))
}

/// Normalize the date formats used by Indian court sites to `YYYY-MM-DD`.
///
/// Day-first forms dominate (`15-03-2023`, `15/03/2023`, `15.03.2023`), but
/// ISO-style and spelled-out month forms appear on some pages. Years outside
/// 1950..=2030 are rejected as OCR noise or placeholder values.
pub fn parse_court_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%d %m %Y", "%d %B %Y",
        "%d %b %Y", "%B %d, %Y", "%b %d, %Y",
    ];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if plausible_year(date) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }
    }

    // Fall back to raw digit extraction, assuming the day-first convention.
    let numbers: Vec<u32> = NUM_RE
        .find_iter(trimmed)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if numbers.len() >= 3 {
        let (day, month, mut year) = (numbers[0], numbers[1], numbers[2] as i32);
        if year < 100 {
            year += if year < 30 { 2000 } else { 1900 };
        }
        if (1..=31).contains(&day) && (1..=12).contains(&month) && (1950..=2030).contains(&year) {
            return NaiveDate::from_ymd_opt(year, month, day)
                .map(|d| d.format("%Y-%m-%d").to_string());
        }
    }

    None
}

fn plausible_year(date: NaiveDate) -> bool {
    use chrono::Datelike;
    (1950..=2030).contains(&date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> QueryInput {
        QueryInput {
            case_type: "Civil Suit".to_string(),
            case_number: "45".to_string(),
            filing_year: 2023,
        }
    }

    fn court() -> CourtConfig {
        CourtConfig::default()
    }

    /// A reduced version of an eCourts case-status result page.
    fn result_page() -> &'static str {
        r#"<html><body>
        <h2>Civil Suit 45/2023 - District and Sessions Court, Wardha</h2>
        <table>
            <tr><td>Petitioner Name</td><td>Ramesh Kumar</td></tr>
            <tr><td>Respondent Name</td><td>Suresh Patil</td></tr>
            <tr><td>Filing Date</td><td>15-03-2023</td></tr>
            <tr><td>Next Hearing Date</td><td>20/12/2024</td></tr>
            <tr><td>Case Status</td><td>Pending for evidence</td></tr>
            <tr><td>Case Stage</td><td>Evidence stage</td></tr>
            <tr><td>Judge</td><td>Shri A. B. Deshmukh</td></tr>
        </table>
        <table>
            <tr><td>Order</td><td><a href="/orders/45-2023.pdf">Interim order dated 01-05-2023</a></td></tr>
        </table>
        </body></html>"#
    }

    #[test]
    fn parses_full_result_page() {
        let record = parse(result_page(), &query(), &court()).expect("page should parse");

        assert_eq!(record.petitioners, vec!["Ramesh Kumar".to_string()]);
        assert_eq!(record.respondents, vec!["Suresh Patil".to_string()]);
        assert_eq!(record.filing_date.as_deref(), Some("2023-03-15"));
        assert_eq!(record.next_hearing_date.as_deref(), Some("2024-12-20"));
        assert_eq!(record.status.as_deref(), Some("Pending for evidence"));
        assert_eq!(record.stage.as_deref(), Some("Evidence stage"));
        assert_eq!(record.judge.as_deref(), Some("Shri A. B. Deshmukh"));
        assert!(!record.synthetic);
        assert!(record.title.contains("45/2023"));
    }

    #[test]
    fn extracts_pdf_links_with_absolute_urls() {
        let record = parse(result_page(), &query(), &court()).expect("page should parse");
        let link = record
            .document_links
            .iter()
            .find(|l| l.url.is_some())
            .expect("a PDF link should be extracted");
        assert_eq!(
            link.url.as_deref(),
            Some("https://wardha.dcourts.gov.in/orders/45-2023.pdf")
        );
        assert_eq!(link.order_date.as_deref(), Some("2023-05-01"));
    }

    #[test]
    fn no_record_message_maps_to_not_found() {
        let html = r#"<html><body>
            <table><tr><td colspan="2">No record found for the given case details</td></tr></table>
        </body></html>"#;
        let err = parse(html, &query(), &court()).unwrap_err();
        match err {
            AppError::Parse { reason, .. } => assert_eq!(reason, ParseReason::NotFound),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn marathi_no_record_message_maps_to_not_found() {
        let html = "<html><body><p>रेकॉर्ड आढळला नाही</p></body></html>";
        let err = parse(html, &query(), &court()).unwrap_err();
        match err {
            AppError::Parse { reason, .. } => assert_eq!(reason, ParseReason::NotFound),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_page_maps_to_malformed() {
        let err = parse("<html><body></body></html>", &query(), &court()).unwrap_err();
        match err {
            AppError::Parse { reason, .. } => assert_eq!(reason, ParseReason::Malformed),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn prose_page_without_case_fields_maps_to_not_found() {
        let html = format!(
            "<html><body><table><tr><td>Notice</td><td>{}</td></tr></table></body></html>",
            "The court registry publishes cause lists every evening. ".repeat(10)
        );
        let err = parse(&html, &query(), &court()).unwrap_err();
        match err {
            AppError::Parse { reason, .. } => assert_eq!(reason, ParseReason::NotFound),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_optional_fields_are_empty_not_errors() {
        let html = r#"<html><body><table>
            <tr><td>Petitioner</td><td>Ramesh Kumar</td></tr>
        </table></body></html>"#;
        let record = parse(html, &query(), &court()).expect("partial page should parse");
        assert_eq!(record.petitioners.len(), 1);
        assert!(record.filing_date.is_none());
        assert!(record.status.is_none());
        assert!(record.document_links.is_empty());
    }

    #[test]
    fn duplicate_parties_are_collapsed() {
        let html = r#"<html><body><table>
            <tr><td>Petitioner</td><td>Ramesh Kumar</td></tr>
            <tr><td>Petitioner Name</td><td>Ramesh Kumar</td></tr>
        </table></body></html>"#;
        let record = parse(html, &query(), &court()).expect("page should parse");
        assert_eq!(record.petitioners, vec!["Ramesh Kumar".to_string()]);
    }

    #[test]
    fn date_format_grid() {
        for (raw, expected) in [
            ("15-03-2023", "2023-03-15"),
            ("15/03/2023", "2023-03-15"),
            ("15.03.2023", "2023-03-15"),
            ("2023-03-15", "2023-03-15"),
            ("15-03-23", "2023-03-15"),
            ("15 March 2023", "2023-03-15"),
        ] {
            assert_eq!(
                parse_court_date(raw).as_deref(),
                Some(expected),
                "failed for {raw}"
            );
        }
    }

    #[test]
    fn implausible_dates_are_rejected() {
        assert_eq!(parse_court_date("15-03-1800"), None);
        assert_eq!(parse_court_date("45-13-2023"), None);
        assert_eq!(parse_court_date(""), None);
        assert_eq!(parse_court_date("hearing adjourned"), None);
    }
}
