//! Year registry use-case service.
//!
//! # Invariants
//! - Labels are trimmed and must be non-blank.
//! - A label already present in the registry is rejected on add.
//! - Removal deletes every matching entry plus that year's subject registry.
//! - Cascade never deletes a ledger key another registered pair renders to.

use crate::model::input::{normalize_label, ValidationError};
use crate::repo::gradebook_repo::GradebookRepository;
use crate::service::{cascade_ledgers, DeleteMode, ServiceResult};
use crate::store::KvStore;
use log::info;

pub struct YearService<S: KvStore> {
    repo: GradebookRepository<S>,
}

impl<S: KvStore> YearService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: GradebookRepository::new(store),
        }
    }

    /// Returns year labels in insertion order.
    pub fn load(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.load_years()?)
    }

    /// Appends one year label and returns the persisted registry.
    pub fn add(&self, label: &str) -> ServiceResult<Vec<String>> {
        let label = normalize_label(label).ok_or(ValidationError::EmptyYearLabel)?;
        let mut years = self.repo.load_years()?;
        if years.iter().any(|existing| existing == &label) {
            return Err(ValidationError::DuplicateYear(label).into());
        }

        years.push(label);
        self.repo.save_years(&years)?;
        info!(
            "event=year_add module=year status=ok count={}",
            years.len()
        );
        Ok(years)
    }

    /// Removes a year keeping its grade/note ledgers orphaned.
    pub fn remove(&self, label: &str) -> ServiceResult<Vec<String>> {
        self.remove_with_mode(label, DeleteMode::KeepLedgers)
    }

    /// Removes every entry equal to `label` and its subject registry.
    ///
    /// With `DeleteMode::Cascade` the grade and note ledgers of the year's
    /// subjects are removed too, unless another registered year/subject pair
    /// renders the same key.
    pub fn remove_with_mode(&self, label: &str, mode: DeleteMode) -> ServiceResult<Vec<String>> {
        let label = label.trim();
        let cascade = mode == DeleteMode::Cascade;
        let names = if cascade {
            self.repo
                .load_subjects(label)?
                .into_iter()
                .map(|subject| subject.name)
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        self.repo.delete_subjects(label)?;
        let kept = if cascade {
            cascade_ledgers(&self.repo, label, &names)?
        } else {
            0
        };

        let mut years = self.repo.load_years()?;
        let before = years.len();
        years.retain(|existing| existing != label);
        self.repo.save_years(&years)?;
        info!(
            "event=year_remove module=year status=ok removed={} cascade={} kept_ledgers={}",
            before - years.len(),
            cascade,
            kept
        );
        Ok(years)
    }
}
