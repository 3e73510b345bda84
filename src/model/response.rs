//! API payloads and the loaded grade set.

use super::grade::FlattenedGrade;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/grades`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradesResponse {
    /// The nested document, passed through untouched
    #[serde(default)]
    pub years: Vec<serde_json::Value>,
    pub flattened: Vec<FlattenedGrade>,
}

/// Body of `GET /api/meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// ISO-8601 timestamp of the last grades refresh
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub filters: MetaFilters,
}

/// Option lists for the year/semester/module selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaFilters {
    pub years: Vec<String>,
    pub semesters: Vec<String>,
    pub modules: Vec<String>,
}

impl Meta {
    /// Human-readable last update in local time, or `Unknown`.
    #[must_use]
    pub fn last_updated_display(&self) -> String {
        format_timestamp(self.last_updated.as_deref())
    }
}

/// Format an ISO-8601 timestamp for display, falling back to `Unknown`.
#[must_use]
pub fn format_timestamp(iso: Option<&str>) -> String {
    iso.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(
            || "Unknown".to_string(),
            |dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        )
}

/// Everything a dashboard needs after a successful load.
#[derive(Debug, Clone, Default)]
pub struct GradeSet {
    pub rows: Vec<FlattenedGrade>,
    pub meta: Meta,
}
