//! Subject registry use-case service.
//!
//! # Invariants
//! - Name and threshold are required; the threshold must parse to a finite
//!   number before anything is persisted.
//! - Names are unique within one year.
//! - Removal filters out every subject with the matching name.
//! - Year and subject labels are trimmed on every path.

use crate::model::input::{normalize_label, parse_threshold, ValidationError};
use crate::model::subject::Subject;
use crate::repo::gradebook_repo::GradebookRepository;
use crate::service::{cascade_ledgers, DeleteMode, ServiceResult};
use crate::store::KvStore;
use log::info;

/// Form input for a new subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubject {
    pub name: String,
    /// Raw threshold text as typed by the user.
    pub threshold: String,
    pub banner: Option<String>,
}

pub struct SubjectService<S: KvStore> {
    repo: GradebookRepository<S>,
}

impl<S: KvStore> SubjectService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: GradebookRepository::new(store),
        }
    }

    pub fn load(&self, year: &str) -> ServiceResult<Vec<Subject>> {
        Ok(self.repo.load_subjects(year.trim())?)
    }

    /// Validates and appends one subject to `year`.
    pub fn add(&self, year: &str, input: &NewSubject) -> ServiceResult<Vec<Subject>> {
        let name = normalize_label(&input.name).ok_or(ValidationError::EmptySubjectName)?;
        let threshold = parse_threshold(&input.threshold)?;
        let year = year.trim();

        let mut subjects = self.repo.load_subjects(year)?;
        if subjects.iter().any(|subject| subject.name == name) {
            return Err(ValidationError::DuplicateSubject {
                year: year.to_string(),
                name,
            }
            .into());
        }

        subjects.push(Subject::new(name, threshold, input.banner.clone()));
        self.repo.save_subjects(year, &subjects)?;
        info!(
            "event=subject_add module=subject status=ok count={}",
            subjects.len()
        );
        Ok(subjects)
    }

    /// Removes a subject keeping its grade/note ledgers orphaned.
    pub fn remove(&self, year: &str, name: &str) -> ServiceResult<Vec<Subject>> {
        self.remove_with_mode(year, name, DeleteMode::KeepLedgers)
    }

    pub fn remove_with_mode(
        &self,
        year: &str,
        name: &str,
        mode: DeleteMode,
    ) -> ServiceResult<Vec<Subject>> {
        let (year, name) = (year.trim(), name.trim());
        let mut subjects = self.repo.load_subjects(year)?;
        let before = subjects.len();
        subjects.retain(|subject| subject.name != name);
        self.repo.save_subjects(year, &subjects)?;

        let kept = if mode == DeleteMode::Cascade {
            cascade_ledgers(&self.repo, year, &[name.to_string()])?
        } else {
            0
        };
        info!(
            "event=subject_remove module=subject status=ok removed={} cascade={} kept_ledgers={}",
            before - subjects.len(),
            mode == DeleteMode::Cascade,
            kept
        );
        Ok(subjects)
    }
}
