//! Subject registry record.

use serde::{Deserialize, Deserializer, Serialize};

/// One subject tracked under a year.
///
/// Persisted as `{nome, media, banner?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "nome")]
    pub name: String,
    /// Minimum average required to pass. Legacy records may hold `null`
    /// (an unparseable threshold), which loads as NaN and never passes.
    #[serde(rename = "media", deserialize_with = "nullable_f64")]
    pub passing_threshold: f64,
    /// Banner image reference chosen in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl Subject {
    pub fn new(name: impl Into<String>, passing_threshold: f64, banner: Option<String>) -> Self {
        Self {
            name: name.into(),
            passing_threshold,
            banner: banner.filter(|value| !value.trim().is_empty()),
        }
    }

    /// Banner reference when one is set and non-empty.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref().filter(|value| !value.is_empty())
    }
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::Subject;

    #[test]
    fn subject_uses_wire_field_names() {
        let subject = Subject::new("Math", 7.0, None);
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"nome":"Math","media":7.0}"#);
    }

    #[test]
    fn legacy_null_threshold_loads_as_nan() {
        let subject: Subject =
            serde_json::from_str(r#"{"nome":"Art","media":null,"banner":""}"#).unwrap();
        assert!(subject.passing_threshold.is_nan());
        assert_eq!(subject.banner(), None);
    }
}
