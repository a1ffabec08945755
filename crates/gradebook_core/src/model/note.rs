//! Free-text notes attached to a subject.
//!
//! # Invariants
//! - `id` is unique within one ledger and never changes after creation.
//! - `created_date` is display-only text fixed at creation.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format for note creation dates (`dd/mm/yyyy`).
pub const NOTE_DATE_FORMAT: &str = "%d/%m/%Y";

pub type NoteId = String;

/// One note. Persisted as `{id, texto, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "data")]
    pub created_date: String,
}

/// Two-choice gate the UI must pass before a note is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Cancel,
    Confirm,
}

impl DeleteConfirmation {
    pub fn from_confirmed(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirm
        } else {
            Self::Cancel
        }
    }
}

/// Prompt shown before deleting a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletePrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub cancel_label: &'static str,
    pub confirm_label: &'static str,
}

pub const NOTE_DELETE_PROMPT: DeletePrompt = DeletePrompt {
    title: "Confirmar",
    message: "Deseja excluir essa anotação?",
    cancel_label: "Cancelar",
    confirm_label: "Excluir",
};

/// Picks a note id from the creation time in epoch milliseconds.
///
/// When another note in `existing` already uses that millisecond, the value
/// is bumped until it is free.
pub fn next_note_id(existing: &[Note], created_at_ms: i64) -> NoteId {
    let mut candidate = created_at_ms;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|note| note.id == id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn format_note_date<Tz>(created_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    created_at.format(NOTE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_note_date, next_note_id, Note};
    use chrono::{TimeZone, Utc};

    fn note(id: &str) -> Note {
        Note {
            id: id.to_string(),
            text: "t".to_string(),
            created_date: "01/01/2024".to_string(),
        }
    }

    #[test]
    fn next_note_id_bumps_on_collision() {
        let existing = vec![note("1000"), note("1001")];
        assert_eq!(next_note_id(&existing, 1000), "1002");
        assert_eq!(next_note_id(&existing, 999), "999");
    }

    #[test]
    fn note_date_is_day_month_year() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(format_note_date(&at), "09/03/2024");
    }

    #[test]
    fn note_uses_wire_field_names() {
        let json = serde_json::to_string(&note("42")).unwrap();
        assert_eq!(json, r#"{"id":"42","texto":"t","data":"01/01/2024"}"#);
    }
}
