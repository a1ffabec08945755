//! Grade entries and pass/fail arithmetic.
//!
//! # Invariants
//! - The average of an empty ledger is `0.0`, meaning "no data".
//! - Passing is non-strict: `average >= threshold`.
//! - Any comparison against a NaN threshold fails.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One recorded grade. Persisted as `{valor}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    #[serde(rename = "valor")]
    pub value: f64,
}

impl GradeEntry {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

/// Grade as found in storage: the `{valor}` object, or a bare number
/// written by older builds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredGrade {
    Entry(GradeEntry),
    Bare(f64),
}

impl StoredGrade {
    pub(crate) fn value(self) -> f64 {
        match self {
            Self::Entry(entry) => entry.value,
            Self::Bare(value) => value,
        }
    }
}

/// Pass/fail outcome. Display text is the label shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeStatus {
    #[serde(rename = "Aprovado")]
    Passing,
    #[serde(rename = "Reprovado")]
    Failing,
}

impl GradeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Passing => "Aprovado",
            Self::Failing => "Reprovado",
        }
    }

    pub fn is_passing(self) -> bool {
        self == Self::Passing
    }
}

impl Display for GradeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Arithmetic mean of `values`; `0.0` when empty.
pub fn average_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Arithmetic mean of a grade ledger; `0.0` when empty.
pub fn average(entries: &[GradeEntry]) -> f64 {
    let values = entries.iter().map(|entry| entry.value).collect::<Vec<_>>();
    average_of(&values)
}

pub fn status(average: f64, threshold: f64) -> GradeStatus {
    if average >= threshold {
        GradeStatus::Passing
    } else {
        GradeStatus::Failing
    }
}

/// Rounds to two decimals for display and summary rows.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
