//! Storage key derivation.
//!
//! Every registry and ledger lives under exactly one key. The year/subject
//! relationship is encoded in the key text, so renaming either would orphan
//! the dependent ledgers; no rename operation exists.

use std::fmt::{Display, Formatter};

pub const YEARS_KEY: &str = "anos";
pub const SUBJECTS_KEY_PREFIX: &str = "materias_";
pub const GRADES_KEY_PREFIX: &str = "notas_";
pub const NOTES_KEY_PREFIX: &str = "anotacoes_";
pub const THEME_KEY: &str = "appTheme";

/// Typed storage key for one registry or ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    /// Year registry.
    Years,
    /// Subject registry of one year.
    Subjects { year: &'a str },
    /// Grade ledger of one subject.
    Grades { year: &'a str, subject: &'a str },
    /// Note ledger of one subject.
    Notes { year: &'a str, subject: &'a str },
    /// Theme preference.
    Theme,
}

impl StorageKey<'_> {
    /// Renders the persisted key text.
    pub fn render(&self) -> String {
        match self {
            Self::Years => YEARS_KEY.to_string(),
            Self::Subjects { year } => format!("{SUBJECTS_KEY_PREFIX}{year}"),
            Self::Grades { year, subject } => format!("{GRADES_KEY_PREFIX}{year}_{subject}"),
            Self::Notes { year, subject } => format!("{NOTES_KEY_PREFIX}{year}_{subject}"),
            Self::Theme => THEME_KEY.to_string(),
        }
    }
}

impl Display for StorageKey<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Recovers the year label from a subject registry key.
///
/// Returns `None` for keys outside the `materias_` namespace.
pub fn year_from_subjects_key(key: &str) -> Option<&str> {
    key.strip_prefix(SUBJECTS_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::{year_from_subjects_key, StorageKey};

    #[test]
    fn keys_render_persisted_layout() {
        assert_eq!(StorageKey::Years.render(), "anos");
        assert_eq!(StorageKey::Subjects { year: "2024" }.render(), "materias_2024");
        assert_eq!(
            StorageKey::Grades {
                year: "2024",
                subject: "Math"
            }
            .render(),
            "notas_2024_Math"
        );
        assert_eq!(
            StorageKey::Notes {
                year: "2024",
                subject: "Math"
            }
            .to_string(),
            "anotacoes_2024_Math"
        );
        assert_eq!(StorageKey::Theme.render(), "appTheme");
    }

    #[test]
    fn year_is_recovered_only_from_subject_keys() {
        assert_eq!(year_from_subjects_key("materias_2024"), Some("2024"));
        assert_eq!(year_from_subjects_key("materias_"), Some(""));
        assert_eq!(year_from_subjects_key("notas_2024_Math"), None);
        assert_eq!(year_from_subjects_key("anos"), None);
    }
}
