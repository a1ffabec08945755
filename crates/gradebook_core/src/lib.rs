//! Core domain logic for the Gradebook app.
//! Years, subjects, grades, notes, summary and theme live here; the UI shell
//! only renders what these services return.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{
    active_log_settings, default_log_level, init_logging, LogSettings, LoggingError,
};
pub use model::grade::{average, round2, status, GradeEntry, GradeStatus};
pub use model::input::ValidationError;
pub use model::keys::StorageKey;
pub use model::note::{DeleteConfirmation, DeletePrompt, Note, NoteId, NOTE_DELETE_PROMPT};
pub use model::subject::Subject;
pub use model::theme::Theme;
pub use repo::gradebook_repo::GradebookRepository;
pub use service::grade_service::{ChartPoint, GradeReport, GradeService};
pub use service::note_service::NoteService;
pub use service::subject_service::{NewSubject, SubjectService};
pub use service::summary_service::{SummaryRow, SummaryService};
pub use service::theme_state::ThemeState;
pub use service::year_service::YearService;
pub use service::{DeleteMode, ServiceError, ServiceResult};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
