//! Form input validation and numeric parsing.
//!
//! # Invariants
//! - Numeric text uses leading-prefix parsing: leading whitespace is skipped
//!   and trailing garbage after a valid number is ignored (`"7.5 pts"` -> 7.5).
//! - Only finite numbers are accepted for grades and thresholds.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NUMBER_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("valid number prefix regex")
});

/// Rejected user input. Display text is suitable for a user-facing prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyYearLabel,
    DuplicateYear(String),
    EmptySubjectName,
    EmptyThreshold,
    InvalidThreshold(String),
    DuplicateSubject { year: String, name: String },
    EmptyGrade,
    InvalidGrade(String),
    EmptyNoteText,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyYearLabel => write!(f, "year label must not be blank"),
            Self::DuplicateYear(label) => write!(f, "year `{label}` already exists"),
            Self::EmptySubjectName => write!(f, "subject name must not be blank"),
            Self::EmptyThreshold => write!(f, "passing grade must not be blank"),
            Self::InvalidThreshold(raw) => write!(f, "passing grade `{raw}` is not a number"),
            Self::DuplicateSubject { year, name } => {
                write!(f, "subject `{name}` already exists in year `{year}`")
            }
            Self::EmptyGrade => write!(f, "grade must not be blank"),
            Self::InvalidGrade(raw) => write!(f, "grade `{raw}` is not a number"),
            Self::EmptyNoteText => write!(f, "note text must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Parses the longest numeric prefix of `raw`.
///
/// Returns `None` when no prefix parses. Infinite values are returned as-is;
/// callers decide whether to accept them.
pub fn parse_number_prefix(raw: &str) -> Option<f64> {
    let candidate = raw.trim_start();
    let matched = NUMBER_PREFIX_RE.find(candidate)?;
    matched.as_str().parse::<f64>().ok()
}

/// Validates grade form input.
pub fn parse_grade(raw: &str) -> Result<f64, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyGrade);
    }
    parse_number_prefix(raw)
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidGrade(raw.to_string()))
}

/// Validates passing-threshold form input.
pub fn parse_threshold(raw: &str) -> Result<f64, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyThreshold);
    }
    parse_number_prefix(raw)
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidThreshold(raw.to_string()))
}

/// Trims a required label; blank input yields `None`.
pub fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
