//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the court search application, providing
//! structured error types for every subsystem.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from fetching, parsing, storage, config
//! - **Output**: Structured error types with context for logging and rendering
//! - **Error Categories**: Fetch, CAPTCHA, Parse, Storage, Config, Validation
//!
//! ## Key Features
//! - One enum covering the whole application, with struct variants for context
//! - Transience classification driving the HTTP client's retry decisions
//! - Category labels for structured logging and statistics

use crate::captcha::CaptchaKind;
use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Classification of a failed fetch after the retry budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The request exceeded the configured timeout
    Timeout,
    /// Connection could not be established or was dropped
    Connection,
    /// The server answered with a non-success HTTP status
    HttpStatus(u16),
}

impl std::fmt::Display for FetchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchKind::Timeout => f.write_str("timeout"),
            FetchKind::Connection => f.write_str("connection"),
            FetchKind::HttpStatus(code) => write!(f, "http status {code}"),
        }
    }
}

/// Why a court result page could not be turned into a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseReason {
    /// The page is well-formed but reports no matching case
    NotFound,
    /// The page lacks the expected result structure entirely
    Malformed,
}

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// A fetch against the court site failed after retries
    #[error("fetch failed ({kind}) for {url}: {details}")]
    Fetch {
        kind: FetchKind,
        url: String,
        details: String,
    },

    /// The court page demands CAPTCHA verification
    #[error("CAPTCHA verification required ({kind})")]
    CaptchaBlocked { kind: CaptchaKind },

    /// A result page could not be parsed into a case record
    #[error("could not extract case details: {details}")]
    Parse { reason: ParseReason, details: String },

    /// Database errors
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal system errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Check if the error is transient (worth retrying at the fetch layer).
    ///
    /// Client errors (4xx) are permanent; server errors and network failures
    /// may resolve on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Fetch { kind, .. } => match kind {
                FetchKind::Timeout | FetchKind::Connection => true,
                FetchKind::HttpStatus(code) => *code >= 500,
            },
            _ => false,
        }
    }

    /// Get error category for logging and statistics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch { .. } => "fetch",
            AppError::CaptchaBlocked { .. } => "captcha",
            AppError::Parse { .. } => "parse",
            AppError::Storage(_) => "storage",
            AppError::Config { .. } => "configuration",
            AppError::Validation { .. } => "validation",
            AppError::Serialization(_) => "serialization",
            AppError::Io(_) => "io",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse(reason: ParseReason, details: impl Into<String>) -> Self {
        AppError::Parse {
            reason,
            details: details.into(),
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
