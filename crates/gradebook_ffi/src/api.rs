//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose gradebook use-cases to Dart via FRB.
//! - Translate core errors into response envelopes with user-facing messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Storage-backed functions are not `sync`: FRB runs them off the UI thread
//!   and Dart awaits them.
//! - Each call opens its own connection; the UI serializes mutations.

use gradebook_core::db::open_db;
use gradebook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DeleteConfirmation, DeleteMode, GradeEntry, GradeReport, GradeService, LogSettings,
    NewSubject, Note, NoteService, SqliteKvStore, StoreError, Subject, SubjectService, SummaryRow,
    SummaryService, Theme, ThemeState, YearService, NOTE_DELETE_PROMPT,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "gradebook.sqlite3";
const DB_PATH_ENV: &str = "GRADEBOOK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// A blank `level` uses the build default. A blank `log_dir` writes into
/// `logs/` beside the database, so call `init_storage` first.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let settings = if log_dir.trim().is_empty() {
        LogSettings::beside_database(&level, &resolve_db_path())
    } else {
        LogSettings::new(&level, log_dir.trim())
    };
    match settings.and_then(|settings| init_logging_inner(&settings)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every storage-backed call.
///
/// Must run before the first storage call; later calls with the same path
/// are accepted, a different path is rejected. Returns empty string on
/// success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path must not be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Subject item for list screens.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectItem {
    pub name: String,
    pub passing_threshold: f64,
    pub banner: Option<String>,
}

/// Note item for the notes screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub text: String,
    pub created_date: String,
}

/// Subject screen projection.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReportItem {
    pub grades: Vec<f64>,
    pub average: f64,
    pub average_label: String,
    /// `Aprovado` or `Reprovado`.
    pub status: String,
    pub chart_labels: Vec<String>,
}

/// One summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryItem {
    pub year: String,
    pub subject: String,
    pub passing_threshold: f64,
    pub current_average: f64,
    pub status: String,
    pub passing: bool,
}

/// Delete confirmation dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePromptItem {
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

/// Response envelope for year registry calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearsResponse {
    pub ok: bool,
    pub message: String,
    pub years: Vec<String>,
}

/// Response envelope for subject registry calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectsResponse {
    pub ok: bool,
    pub message: String,
    pub subjects: Vec<SubjectItem>,
}

/// Response envelope for grade ledger mutations and lists.
#[derive(Debug, Clone, PartialEq)]
pub struct GradesResponse {
    pub ok: bool,
    pub message: String,
    pub grades: Vec<f64>,
}

/// Response envelope for the subject screen report.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReportResponse {
    pub ok: bool,
    pub message: String,
    pub report: Option<GradeReportItem>,
}

/// Response envelope for note ledger calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    pub message: String,
    pub notes: Vec<NoteItem>,
}

/// Response envelope for the summary screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    pub ok: bool,
    pub message: String,
    pub rows: Vec<SummaryItem>,
}

/// Response envelope for theme calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub ok: bool,
    pub message: String,
    /// `light` or `dark`; `light` on failure.
    pub theme: String,
}

/// Lists year labels in insertion order.
pub fn years_list() -> YearsResponse {
    years_response("years_list", with_store(|store| YearService::new(store).load()))
}

/// Adds a year label; blank or duplicate labels are rejected.
pub fn years_add(label: String) -> YearsResponse {
    years_response(
        "years_add",
        with_store(|store| YearService::new(store).add(&label)),
    )
}

/// Removes a year. `cascade` also deletes its subjects' grades and notes.
pub fn years_remove(label: String, cascade: bool) -> YearsResponse {
    years_response(
        "years_remove",
        with_store(|store| YearService::new(store).remove_with_mode(&label, delete_mode(cascade))),
    )
}

pub fn subjects_list(year: String) -> SubjectsResponse {
    subjects_response(
        "subjects_list",
        with_store(|store| SubjectService::new(store).load(&year)),
    )
}

/// Adds a subject; `threshold` is the raw text typed by the user.
pub fn subjects_add(
    year: String,
    name: String,
    threshold: String,
    banner: Option<String>,
) -> SubjectsResponse {
    let input = NewSubject {
        name,
        threshold,
        banner,
    };
    subjects_response(
        "subjects_add",
        with_store(|store| SubjectService::new(store).add(&year, &input)),
    )
}

pub fn subjects_remove(year: String, name: String, cascade: bool) -> SubjectsResponse {
    subjects_response(
        "subjects_remove",
        with_store(|store| {
            SubjectService::new(store).remove_with_mode(&year, &name, delete_mode(cascade))
        }),
    )
}

pub fn grades_list(year: String, subject: String) -> GradesResponse {
    grades_response(
        "grades_list",
        with_store(|store| GradeService::new(store).load(&year, &subject)),
    )
}

pub fn grades_add(year: String, subject: String, value: String) -> GradesResponse {
    grades_response(
        "grades_add",
        with_store(|store| GradeService::new(store).add(&year, &subject, &value)),
    )
}

pub fn grades_update(year: String, subject: String, index: u32, value: String) -> GradesResponse {
    grades_response(
        "grades_update",
        with_store(|store| {
            GradeService::new(store).update_at(&year, &subject, index as usize, &value)
        }),
    )
}

pub fn grades_remove(year: String, subject: String, index: u32) -> GradesResponse {
    grades_response(
        "grades_remove",
        with_store(|store| GradeService::new(store).remove_at(&year, &subject, index as usize)),
    )
}

/// Average, status and chart series for the subject screen.
pub fn grades_report(year: String, subject: String, passing_threshold: f64) -> GradeReportResponse {
    match with_store(|store| GradeService::new(store).report(&year, &subject, passing_threshold)) {
        Ok(report) => GradeReportResponse {
            ok: true,
            message: format!("{} grade(s).", report.entries.len()),
            report: Some(to_report_item(report)),
        },
        Err(err) => GradeReportResponse {
            ok: false,
            message: format!("grades_report failed: {err}"),
            report: None,
        },
    }
}

pub fn notes_list(year: String, subject: String) -> NotesResponse {
    notes_response(
        "notes_list",
        with_store(|store| NoteService::new(store).load(&year, &subject)),
    )
}

/// Creates a note, or edits `editing_id` when provided.
pub fn notes_save(
    year: String,
    subject: String,
    text: String,
    editing_id: Option<String>,
) -> NotesResponse {
    notes_response(
        "notes_save",
        with_store(|store| {
            NoteService::new(store).add_or_update(&year, &subject, &text, editing_id.as_deref())
        }),
    )
}

/// Deletes a note. `confirmed=false` is the user choosing cancel.
pub fn notes_delete(year: String, subject: String, id: String, confirmed: bool) -> NotesResponse {
    notes_response(
        "notes_delete",
        with_store(|store| {
            NoteService::new(store).remove(
                &year,
                &subject,
                &id,
                DeleteConfirmation::from_confirmed(confirmed),
            )
        }),
    )
}

/// Dialog the UI shows before calling `notes_delete`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete_prompt() -> DeletePromptItem {
    DeletePromptItem {
        title: NOTE_DELETE_PROMPT.title.to_string(),
        message: NOTE_DELETE_PROMPT.message.to_string(),
        cancel_label: NOTE_DELETE_PROMPT.cancel_label.to_string(),
        confirm_label: NOTE_DELETE_PROMPT.confirm_label.to_string(),
    }
}

/// Full rescan of every year's subjects and grades.
pub fn summary_run() -> SummaryResponse {
    match with_store(|store| SummaryService::new(store).run()) {
        Ok(rows) => {
            let message = if rows.is_empty() {
                "No subjects.".to_string()
            } else {
                format!("{} subject(s).", rows.len())
            };
            SummaryResponse {
                ok: true,
                message,
                rows: rows.into_iter().map(to_summary_item).collect(),
            }
        }
        Err(err) => SummaryResponse {
            ok: false,
            message: format!("summary_run failed: {err}"),
            rows: Vec::new(),
        },
    }
}

/// Theme saved at last toggle; `light` when none.
pub fn theme_get() -> ThemeResponse {
    theme_response(
        "theme_get",
        with_store(|store| Ok::<_, StoreError>(ThemeState::load(store)?.theme())),
    )
}

pub fn theme_toggle() -> ThemeResponse {
    theme_response(
        "theme_toggle",
        with_store(|store| ThemeState::load(store)?.toggle()),
    )
}

fn delete_mode(cascade: bool) -> DeleteMode {
    if cascade {
        DeleteMode::Cascade
    } else {
        DeleteMode::KeepLedgers
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T, E: std::fmt::Display>(
    f: impl FnOnce(&SqliteKvStore<'_>) -> Result<T, E>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("storage open failed: {err}"))?;
    let store =
        SqliteKvStore::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn years_response(operation: &str, result: Result<Vec<String>, String>) -> YearsResponse {
    match result {
        Ok(years) => YearsResponse {
            ok: true,
            message: format!("{} year(s).", years.len()),
            years,
        },
        Err(err) => YearsResponse {
            ok: false,
            message: failure_message(operation, err),
            years: Vec::new(),
        },
    }
}

fn subjects_response(operation: &str, result: Result<Vec<Subject>, String>) -> SubjectsResponse {
    match result {
        Ok(subjects) => SubjectsResponse {
            ok: true,
            message: format!("{} subject(s).", subjects.len()),
            subjects: subjects.into_iter().map(to_subject_item).collect(),
        },
        Err(err) => SubjectsResponse {
            ok: false,
            message: failure_message(operation, err),
            subjects: Vec::new(),
        },
    }
}

fn grades_response(operation: &str, result: Result<Vec<GradeEntry>, String>) -> GradesResponse {
    match result {
        Ok(grades) => GradesResponse {
            ok: true,
            message: format!("{} grade(s).", grades.len()),
            grades: grades.into_iter().map(|entry| entry.value).collect(),
        },
        Err(err) => GradesResponse {
            ok: false,
            message: failure_message(operation, err),
            grades: Vec::new(),
        },
    }
}

fn notes_response(operation: &str, result: Result<Vec<Note>, String>) -> NotesResponse {
    match result {
        Ok(notes) => NotesResponse {
            ok: true,
            message: format!("{} note(s).", notes.len()),
            notes: notes.into_iter().map(to_note_item).collect(),
        },
        Err(err) => NotesResponse {
            ok: false,
            message: failure_message(operation, err),
            notes: Vec::new(),
        },
    }
}

fn theme_response(
    operation: &str,
    result: Result<Theme, String>,
) -> ThemeResponse {
    match result {
        Ok(theme) => ThemeResponse {
            ok: true,
            message: String::new(),
            theme: theme.as_str().to_string(),
        },
        Err(err) => ThemeResponse {
            ok: false,
            message: failure_message(operation, err),
            theme: Theme::default().as_str().to_string(),
        },
    }
}

fn failure_message(operation: &str, err: String) -> String {
    warn!("event=ffi_call module=ffi status=error op={operation}");
    format!("{operation} failed: {err}")
}

fn to_subject_item(subject: Subject) -> SubjectItem {
    let banner = subject.banner().map(str::to_string);
    SubjectItem {
        name: subject.name,
        passing_threshold: subject.passing_threshold,
        banner,
    }
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        id: note.id,
        text: note.text,
        created_date: note.created_date,
    }
}

fn to_report_item(report: GradeReport) -> GradeReportItem {
    GradeReportItem {
        grades: report.entries.iter().map(|entry| entry.value).collect(),
        average: report.average,
        average_label: report.average_label,
        status: report.status.label().to_string(),
        chart_labels: report.chart.into_iter().map(|point| point.label).collect(),
    }
}

fn to_summary_item(row: SummaryRow) -> SummaryItem {
    SummaryItem {
        year: row.year,
        subject: row.subject,
        passing_threshold: row.passing_threshold,
        current_average: row.current_average,
        status: row.status.label().to_string(),
        passing: row.status.is_passing(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, grades_add, grades_remove, grades_report, grades_update, init_logging,
        init_storage, note_delete_prompt, notes_delete, notes_list, notes_save, ping,
        resolve_db_path, subjects_add, subjects_list, summary_run, theme_get, theme_toggle,
        years_add, years_list, years_remove,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
        let relative = init_logging("info".to_string(), "logs".to_string());
        assert!(relative.contains("absolute"));
    }

    #[test]
    fn init_storage_rejects_switching_paths() {
        let active = resolve_db_path();
        let same = init_storage(active.to_string_lossy().into_owned());
        assert!(same.is_empty(), "{same}");

        let other = init_storage(format!("{}.other", active.display()));
        assert!(other.contains("refusing to switch"));
        assert!(!init_storage("  ".to_string()).is_empty());
    }

    #[test]
    fn year_and_subject_flow_reports_validation_messages() {
        let year = unique_token("ffi-year");
        let added = years_add(year.clone());
        assert!(added.ok, "{}", added.message);
        assert!(years_list().years.contains(&year));

        let duplicate = years_add(year.clone());
        assert!(!duplicate.ok);
        assert!(duplicate.message.contains("already exists"));

        let invalid = subjects_add(year.clone(), "Math".to_string(), "abc".to_string(), None);
        assert!(!invalid.ok);
        assert!(invalid.message.contains("not a number"));

        let subjects = subjects_add(year.clone(), "Math".to_string(), "7".to_string(), None);
        assert!(subjects.ok, "{}", subjects.message);
        assert_eq!(subjects_list(year.clone()).subjects.len(), 1);

        let removed = years_remove(year.clone(), false);
        assert!(removed.ok, "{}", removed.message);
        assert!(!removed.years.contains(&year));
        assert!(subjects_list(year).subjects.is_empty());
    }

    #[test]
    fn grade_flow_updates_report_and_summary() {
        let year = unique_token("ffi-grades");
        let subject = "Physics".to_string();
        assert!(subjects_add(year.clone(), subject.clone(), "7".to_string(), None).ok);

        assert!(grades_add(year.clone(), subject.clone(), "5".to_string()).ok);
        assert!(grades_add(year.clone(), subject.clone(), "8".to_string()).ok);
        let updated = grades_update(year.clone(), subject.clone(), 0, "6".to_string());
        assert_eq!(updated.grades, vec![6.0, 8.0]);
        let rejected = grades_add(year.clone(), subject.clone(), "x".to_string());
        assert!(!rejected.ok);

        let report = grades_report(year.clone(), subject.clone(), 7.0)
            .report
            .expect("report should be present");
        assert_eq!(report.average_label, "7.00");
        assert_eq!(report.status, "Aprovado");
        assert_eq!(report.chart_labels, vec!["1".to_string(), "2".to_string()]);

        let summary = summary_run();
        assert!(summary.ok, "{}", summary.message);
        let row = summary
            .rows
            .iter()
            .find(|row| row.year == year)
            .expect("summary row for year");
        assert_eq!(row.current_average, 7.0);
        assert!(row.passing);

        let after_remove = grades_remove(year, subject, 5);
        assert_eq!(after_remove.grades.len(), 2);
    }

    #[test]
    fn note_flow_requires_confirmation_before_delete() {
        let year = unique_token("ffi-notes");
        let subject = "History".to_string();
        let saved = notes_save(year.clone(), subject.clone(), "x".to_string(), None);
        assert!(saved.ok, "{}", saved.message);
        let id = saved.notes[0].id.clone();

        let edited = notes_save(year.clone(), subject.clone(), "y".to_string(), Some(id.clone()));
        assert_eq!(edited.notes[0].text, "y");

        let cancelled = notes_delete(year.clone(), subject.clone(), id.clone(), false);
        assert_eq!(cancelled.notes.len(), 1);
        let deleted = notes_delete(year.clone(), subject.clone(), id, true);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(notes_list(year, subject).notes.is_empty());

        assert_eq!(note_delete_prompt().confirm_label, "Excluir");
    }

    #[test]
    fn theme_toggle_round_trips() {
        let before = theme_get();
        assert!(before.ok, "{}", before.message);
        let toggled = theme_toggle();
        assert_ne!(toggled.theme, before.theme);
        let restored = theme_toggle();
        assert_eq!(restored.theme, before.theme);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
