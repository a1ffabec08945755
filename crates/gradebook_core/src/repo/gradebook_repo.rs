//! Gradebook repository over any `KvStore`.

use crate::model::grade::{GradeEntry, StoredGrade};
use crate::model::keys::{year_from_subjects_key, StorageKey};
use crate::model::note::Note;
use crate::model::subject::Subject;
use crate::model::theme::Theme;
use crate::store::{KvStore, StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed accessor for every persisted registry and ledger.
pub struct GradebookRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> GradebookRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_years(&self) -> StoreResult<Vec<String>> {
        self.read_list(StorageKey::Years)
    }

    pub fn save_years(&self, years: &[String]) -> StoreResult<()> {
        self.write_list(StorageKey::Years, years)
    }

    pub fn load_subjects(&self, year: &str) -> StoreResult<Vec<Subject>> {
        self.read_list(StorageKey::Subjects { year })
    }

    pub fn save_subjects(&self, year: &str, subjects: &[Subject]) -> StoreResult<()> {
        self.write_list(StorageKey::Subjects { year }, subjects)
    }

    pub fn delete_subjects(&self, year: &str) -> StoreResult<()> {
        self.delete(StorageKey::Subjects { year })
    }

    /// Loads a grade ledger accepting both `{valor}` objects and bare numbers.
    ///
    /// The next save rewrites bare numbers as `{valor}` objects.
    pub fn load_grades(&self, year: &str, subject: &str) -> StoreResult<Vec<GradeEntry>> {
        Ok(self
            .load_grade_values(year, subject)?
            .into_iter()
            .map(GradeEntry::new)
            .collect())
    }

    pub fn load_grade_values(&self, year: &str, subject: &str) -> StoreResult<Vec<f64>> {
        let stored: Vec<StoredGrade> = self.read_list(StorageKey::Grades { year, subject })?;
        Ok(stored.into_iter().map(StoredGrade::value).collect())
    }

    pub fn save_grades(&self, year: &str, subject: &str, grades: &[GradeEntry]) -> StoreResult<()> {
        self.write_list(StorageKey::Grades { year, subject }, grades)
    }

    pub fn delete_grades(&self, year: &str, subject: &str) -> StoreResult<()> {
        self.delete(StorageKey::Grades { year, subject })
    }

    pub fn load_notes(&self, year: &str, subject: &str) -> StoreResult<Vec<Note>> {
        self.read_list(StorageKey::Notes { year, subject })
    }

    pub fn save_notes(&self, year: &str, subject: &str, notes: &[Note]) -> StoreResult<()> {
        self.write_list(StorageKey::Notes { year, subject }, notes)
    }

    pub fn delete_notes(&self, year: &str, subject: &str) -> StoreResult<()> {
        self.delete(StorageKey::Notes { year, subject })
    }

    /// Returns the persisted theme, or `None` when absent or unrecognized.
    pub fn load_theme(&self) -> StoreResult<Option<Theme>> {
        let raw = self.store.get(&StorageKey::Theme.render())?;
        Ok(raw.as_deref().and_then(Theme::parse))
    }

    pub fn save_theme(&self, theme: Theme) -> StoreResult<()> {
        self.store.set(&StorageKey::Theme.render(), theme.as_str())
    }

    /// Years recovered from subject registry keys, in store enumeration order.
    ///
    /// This does not consult the year registry: a registered year without a
    /// subject key is absent, an orphaned subject key is present.
    pub fn years_with_subject_registry(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .store
            .keys()?
            .iter()
            .filter_map(|key| year_from_subjects_key(key))
            .map(str::to_string)
            .collect())
    }

    fn read_list<T: DeserializeOwned>(&self, key: StorageKey<'_>) -> StoreResult<Vec<T>> {
        let key = key.render();
        match self.store.get(&key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| StoreError::InvalidData {
                key,
                message: err.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&self, key: StorageKey<'_>, items: &[T]) -> StoreResult<()> {
        let key = key.render();
        let raw = serde_json::to_string(items).map_err(|err| StoreError::InvalidData {
            key: key.clone(),
            message: err.to_string(),
        })?;
        self.store.set(&key, &raw)
    }

    fn delete(&self, key: StorageKey<'_>) -> StoreResult<()> {
        self.store.remove(&key.render())
    }
}

#[cfg(test)]
mod tests {
    use super::GradebookRepository;
    use crate::model::grade::GradeEntry;
    use crate::model::theme::Theme;
    use crate::store::{KvStore, MemoryKvStore, StoreError};

    #[test]
    fn missing_keys_load_as_empty() {
        let repo = GradebookRepository::new(MemoryKvStore::new());
        assert!(repo.load_years().unwrap().is_empty());
        assert!(repo.load_subjects("2024").unwrap().is_empty());
        assert!(repo.load_grades("2024", "Math").unwrap().is_empty());
        assert!(repo.load_notes("2024", "Math").unwrap().is_empty());
        assert_eq!(repo.load_theme().unwrap(), None);
    }

    #[test]
    fn malformed_json_reports_key() {
        let store = MemoryKvStore::new();
        store.set("anos", "not json").unwrap();
        let repo = GradebookRepository::new(&store);

        match repo.load_years().unwrap_err() {
            StoreError::InvalidData { key, .. } => assert_eq!(key, "anos"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ledger_and_summary_views_decode_the_same_grades() {
        let store = MemoryKvStore::new();
        store.set("notas_2024_Math", r#"[6,{"valor":8}]"#).unwrap();
        let repo = GradebookRepository::new(&store);

        let entries = repo.load_grades("2024", "Math").unwrap();
        assert_eq!(entries, vec![GradeEntry::new(6.0), GradeEntry::new(8.0)]);
        assert_eq!(repo.load_grade_values("2024", "Math").unwrap(), vec![6.0, 8.0]);

        repo.save_grades("2024", "Math", &entries).unwrap();
        assert_eq!(
            store.get("notas_2024_Math").unwrap().as_deref(),
            Some(r#"[{"valor":6.0},{"valor":8.0}]"#)
        );
    }

    #[test]
    fn theme_is_stored_as_raw_text() {
        let store = MemoryKvStore::new();
        let repo = GradebookRepository::new(&store);
        repo.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.get("appTheme").unwrap().as_deref(), Some("dark"));

        store.set("appTheme", "purple").unwrap();
        assert_eq!(repo.load_theme().unwrap(), None);
    }
}
