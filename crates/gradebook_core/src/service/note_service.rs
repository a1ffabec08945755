//! Note ledger use-case service.
//!
//! # Responsibility
//! - Create, edit and delete free-text notes of one subject.
//! - Enforce the confirmation gate before deletion.
//!
//! # Invariants
//! - Blank text is rejected for both create and edit.
//! - New notes are prepended (newest first).
//! - Editing replaces text only; id and creation date are preserved.
//! - Note text never appears in log events.

use crate::model::input::ValidationError;
use crate::model::note::{format_note_date, next_note_id, DeleteConfirmation, Note};
use crate::repo::gradebook_repo::GradebookRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::KvStore;
use chrono::{DateTime, Local};
use log::info;

pub struct NoteService<S: KvStore> {
    repo: GradebookRepository<S>,
}

impl<S: KvStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: GradebookRepository::new(store),
        }
    }

    pub fn load(&self, year: &str, subject: &str) -> ServiceResult<Vec<Note>> {
        Ok(self.repo.load_notes(year, subject)?)
    }

    /// Creates a note, or edits `editing_id` when set.
    pub fn add_or_update(
        &self,
        year: &str,
        subject: &str,
        text: &str,
        editing_id: Option<&str>,
    ) -> ServiceResult<Vec<Note>> {
        self.add_or_update_at(year, subject, text, editing_id, Local::now())
    }

    /// Same as `add_or_update` with an explicit creation time.
    pub fn add_or_update_at(
        &self,
        year: &str,
        subject: &str,
        text: &str,
        editing_id: Option<&str>,
        now: DateTime<Local>,
    ) -> ServiceResult<Vec<Note>> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyNoteText.into());
        }

        let mut notes = self.repo.load_notes(year, subject)?;
        match editing_id {
            Some(id) => {
                let note = notes
                    .iter_mut()
                    .find(|note| note.id == id)
                    .ok_or_else(|| ServiceError::NoteNotFound(id.to_string()))?;
                note.text = text.to_string();
                self.repo.save_notes(year, subject, &notes)?;
                info!("event=note_update module=note status=ok");
            }
            None => {
                let note = Note {
                    id: next_note_id(&notes, now.timestamp_millis()),
                    text: text.to_string(),
                    created_date: format_note_date(&now),
                };
                notes.insert(0, note);
                self.repo.save_notes(year, subject, &notes)?;
                info!(
                    "event=note_create module=note status=ok count={}",
                    notes.len()
                );
            }
        }
        Ok(notes)
    }

    /// Deletes note `id` once the user confirmed; `Cancel` changes nothing.
    pub fn remove(
        &self,
        year: &str,
        subject: &str,
        id: &str,
        confirmation: DeleteConfirmation,
    ) -> ServiceResult<Vec<Note>> {
        let mut notes = self.repo.load_notes(year, subject)?;
        if confirmation == DeleteConfirmation::Cancel {
            info!("event=note_delete module=note status=cancelled");
            return Ok(notes);
        }

        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Err(ServiceError::NoteNotFound(id.to_string()));
        }
        self.repo.save_notes(year, subject, &notes)?;
        info!("event=note_delete module=note status=ok");
        Ok(notes)
    }
}
