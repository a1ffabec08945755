//! Gradebook use-case services.
//!
//! # Responsibility
//! - Validate user input before anything is persisted.
//! - Orchestrate read-modify-write cycles over the repository.
//! - Keep UI/FFI layers decoupled from storage keys and JSON.
//!
//! # Invariants
//! - Rejected input never reaches the store.
//! - Every mutation returns the collection as persisted.

use crate::model::input::ValidationError;
use crate::model::keys::StorageKey;
use crate::model::note::NoteId;
use crate::repo::gradebook_repo::GradebookRepository;
use crate::store::{KvStore, StoreError, StoreResult};
use log::warn;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod grade_service;
pub mod note_service;
pub mod subject_service;
pub mod summary_service;
pub mod theme_state;
pub mod year_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for gradebook use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// User input rejected before persistence.
    Validation(ValidationError),
    /// Grade position does not exist in the ledger.
    GradeIndexOutOfRange { index: usize, len: usize },
    /// Target note does not exist in the ledger.
    NoteNotFound(NoteId),
    /// Storage-layer failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::GradeIndexOutOfRange { index, len } => {
                write!(f, "grade position {index} is out of range for {len} grade(s)")
            }
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// What happens to dependent ledgers when a year or subject is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove only the registry entry; grade and note ledgers stay orphaned
    /// under their old keys.
    #[default]
    KeepLedgers,
    /// Also remove grade and note ledgers of every affected subject.
    Cascade,
}

/// Deletes the grade and note ledgers of `subjects` under `year`.
///
/// Labels may contain `_`, so two distinct pairs can render the same key
/// (`2024`/`A_B` and `2024_A`/`B`). A key still owned by a registered pair
/// is kept. Must run after the registries reflect the removal. Returns the
/// number of subjects whose ledgers were kept.
pub(crate) fn cascade_ledgers<S: KvStore>(
    repo: &GradebookRepository<S>,
    year: &str,
    subjects: &[String],
) -> StoreResult<usize> {
    let mut claimed = BTreeSet::new();
    for owner_year in repo.years_with_subject_registry()? {
        for owner in repo.load_subjects(&owner_year)? {
            claimed.insert(
                StorageKey::Grades {
                    year: &owner_year,
                    subject: &owner.name,
                }
                .render(),
            );
        }
    }

    let mut kept = 0;
    for subject in subjects {
        // Grade and note keys share the `{year}_{subject}` suffix.
        if claimed.contains(&StorageKey::Grades { year, subject }.render()) {
            kept += 1;
            warn!("event=cascade_skip module=service status=skipped reason=key_shared");
            continue;
        }
        repo.delete_grades(year, subject)?;
        repo.delete_notes(year, subject)?;
    }
    Ok(kept)
}
