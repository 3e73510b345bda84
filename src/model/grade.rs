//! Flattened grade rows.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How a grade row should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeStatus {
    /// The raw value parsed as a grade on the 0-20 scale
    Numeric,
    /// A value is present but is not a number (e.g. "Validé", "ABS")
    Status,
    /// The grade type has no grade yet
    Pending,
}

impl GradeStatus {
    /// Label shown when a row has no display value.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Numeric | Self::Status => "Status",
        }
    }
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Status => write!(f, "status"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// One `(module, course, grade_type)` observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedGrade {
    pub year: String,
    pub semester: String,
    pub module: String,
    pub course: String,
    pub grade_type: String,
    /// Display string as recorded by the school portal
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade_value: Option<String>,
    /// Parsed grade, only present for values inside 0-20
    #[serde(default)]
    pub grade_numeric: Option<f64>,
    /// Per-entry coefficient, as displayed
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade_coef: Option<String>,
    /// Coefficient of the whole grade type
    #[serde(default, deserialize_with = "lenient_f64")]
    pub type_coefficient: Option<f64>,
    pub status: GradeStatus,
}

impl FlattenedGrade {
    /// Text shown in a table cell: the raw value, or a status placeholder.
    #[must_use]
    pub fn display_value(&self) -> &str {
        self.grade_value
            .as_deref()
            .unwrap_or_else(|| self.status.placeholder())
    }

    /// Coefficient summary shown next to a selected cell.
    #[must_use]
    pub fn coefficient_summary(&self) -> String {
        format!(
            "Entry coef: {} | Type coef: {}",
            self.grade_coef.as_deref().unwrap_or("-"),
            self.type_coefficient
                .map_or_else(|| "-".to_string(), |c| c.to_string())
        )
    }

    /// Key identifying the course this row belongs to.
    #[must_use]
    pub fn course_key(&self) -> String {
        format!("{}::{}", self.module, self.course)
    }
}

/// Render a JSON scalar as the string the backend would display.
///
/// Strings pass through, numbers keep their JSON spelling, `null` is absent.
pub(crate) fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Accept a string, a number or null where a display string is expected.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Accept a number or a numeric string where a coefficient is expected.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.replace(',', ".").trim().parse().ok(),
        _ => None,
    })
}
