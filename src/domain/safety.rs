//! Safety - Device Safety Precautions

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::lenient_timestamp;
use super::{normalize_token, null_as_default};

/// Precaution severity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    Other(String),
}

impl Severity {
    pub fn token(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::Other(raw) => raw,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Other(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.token().to_string()
    }
}

/// A safety precaution attached to a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyPrecaution {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub device_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    /// warning, procedure, caution, note
    #[serde(rename = "type")]
    pub precaution_type: Option<String>,
    /// thermal_hazard, electrical_hazard, ...
    pub category: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: Severity,
    pub recommended_action: Option<String>,
    #[serde(alias = "active")]
    pub is_active: bool,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl Default for SafetyPrecaution {
    fn default() -> Self {
        Self {
            id: String::new(),
            device_id: None,
            title: String::new(),
            description: None,
            precaution_type: None,
            category: None,
            severity: Severity::default(),
            recommended_action: None,
            is_active: true,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precaution_defaults() {
        let precaution: SafetyPrecaution = serde_json::from_str(
            r#"{"id":"s-1","title":"Hot surface","type":"warning","category":"thermal_hazard"}"#,
        )
        .expect("parses");
        assert!(precaution.is_active);
        assert_eq!(precaution.severity, Severity::Medium);
        assert_eq!(precaution.precaution_type.as_deref(), Some("warning"));
    }

    #[test]
    fn test_severity_case_insensitive() {
        let precaution: SafetyPrecaution =
            serde_json::from_str(r#"{"id":"s-2","severity":"critical","isActive":false}"#)
                .expect("parses");
        assert!(precaution.severity.is_critical());
        assert!(!precaution.is_active);
    }
}
