//! Cross-year pass/fail summary.
//!
//! # Invariants
//! - Years come from `materias_` keys only, never from the year registry.
//! - Every call is a full sequential rescan; nothing is cached.
//! - Row order follows the store's key enumeration order, then subject
//!   registry order.

use crate::model::grade::{average_of, round2, status, GradeStatus};
use crate::repo::gradebook_repo::GradebookRepository;
use crate::service::ServiceResult;
use crate::store::KvStore;
use log::info;
use serde::Serialize;
use std::time::Instant;

/// One subject line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "ano")]
    pub year: String,
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "mediaMinima")]
    pub passing_threshold: f64,
    /// Mean grade rounded to two decimals; `0` without grades.
    #[serde(rename = "mediaAtual")]
    pub current_average: f64,
    pub status: GradeStatus,
}

pub struct SummaryService<S: KvStore> {
    repo: GradebookRepository<S>,
}

impl<S: KvStore> SummaryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: GradebookRepository::new(store),
        }
    }

    /// Scans every subject registry and grade ledger.
    pub fn run(&self) -> ServiceResult<Vec<SummaryRow>> {
        let started_at = Instant::now();
        let mut rows = Vec::new();

        for year in self.repo.years_with_subject_registry()? {
            for subject in self.repo.load_subjects(&year)? {
                let grades = self.repo.load_grade_values(&year, &subject.name)?;
                let average = average_of(&grades);
                rows.push(SummaryRow {
                    year: year.clone(),
                    subject: subject.name,
                    passing_threshold: subject.passing_threshold,
                    current_average: round2(average),
                    // Status compares the unrounded mean.
                    status: status(average, subject.passing_threshold),
                });
            }
        }

        info!(
            "event=summary_run module=summary status=ok rows={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(rows)
    }
}
