//! Grade ledger use-case service.
//!
//! # Invariants
//! - Only finite numeric input is persisted.
//! - Ledger order is insertion order; positions are 0-based.
//! - Removing an out-of-range position leaves the ledger unchanged.

use crate::model::grade::{average, round2, status, GradeEntry, GradeStatus};
use crate::model::input::parse_grade;
use crate::repo::gradebook_repo::GradebookRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::KvStore;
use log::{debug, info};

/// One plotted grade, labelled by its 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Subject screen projection of a grade ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub entries: Vec<GradeEntry>,
    pub passing_threshold: f64,
    pub average: f64,
    /// Average with exactly two decimals.
    pub average_label: String,
    pub status: GradeStatus,
    pub chart: Vec<ChartPoint>,
}

impl GradeReport {
    pub fn from_entries(entries: Vec<GradeEntry>, passing_threshold: f64) -> Self {
        let average = average(&entries);
        let chart = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| ChartPoint {
                label: (index + 1).to_string(),
                value: entry.value,
            })
            .collect();
        Self {
            passing_threshold,
            average,
            average_label: format!("{:.2}", round2(average)),
            status: status(average, passing_threshold),
            chart,
            entries,
        }
    }
}

pub struct GradeService<S: KvStore> {
    repo: GradebookRepository<S>,
}

impl<S: KvStore> GradeService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: GradebookRepository::new(store),
        }
    }

    pub fn load(&self, year: &str, subject: &str) -> ServiceResult<Vec<GradeEntry>> {
        Ok(self.repo.load_grades(year, subject)?)
    }

    /// Appends a grade parsed from form input.
    pub fn add(&self, year: &str, subject: &str, raw_value: &str) -> ServiceResult<Vec<GradeEntry>> {
        let value = parse_grade(raw_value)?;
        let mut grades = self.repo.load_grades(year, subject)?;
        grades.push(GradeEntry::new(value));
        self.repo.save_grades(year, subject, &grades)?;
        info!(
            "event=grade_add module=grade status=ok count={}",
            grades.len()
        );
        Ok(grades)
    }

    /// Overwrites the grade at `index` in place.
    pub fn update_at(
        &self,
        year: &str,
        subject: &str,
        index: usize,
        raw_value: &str,
    ) -> ServiceResult<Vec<GradeEntry>> {
        let value = parse_grade(raw_value)?;
        let mut grades = self.repo.load_grades(year, subject)?;
        let len = grades.len();
        let slot = grades
            .get_mut(index)
            .ok_or(ServiceError::GradeIndexOutOfRange { index, len })?;
        *slot = GradeEntry::new(value);
        self.repo.save_grades(year, subject, &grades)?;
        info!("event=grade_update module=grade status=ok index={index}");
        Ok(grades)
    }

    /// Removes the grade at `index`; out-of-range positions are a no-op.
    pub fn remove_at(
        &self,
        year: &str,
        subject: &str,
        index: usize,
    ) -> ServiceResult<Vec<GradeEntry>> {
        let mut grades = self.repo.load_grades(year, subject)?;
        if index < grades.len() {
            grades.remove(index);
        } else {
            debug!(
                "event=grade_remove module=grade status=skipped index={index} len={}",
                grades.len()
            );
        }
        self.repo.save_grades(year, subject, &grades)?;
        Ok(grades)
    }

    /// Loads the ledger and derives average, status and chart series.
    pub fn report(
        &self,
        year: &str,
        subject: &str,
        passing_threshold: f64,
    ) -> ServiceResult<GradeReport> {
        let grades = self.repo.load_grades(year, subject)?;
        Ok(GradeReport::from_entries(grades, passing_threshold))
    }
}
