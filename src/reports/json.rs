//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::NewGrade;
use crate::model::{FlattenedGrade, Meta};
use crate::table::{GradeFilters, GradeTable, TableStats};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn serialize<T: Serialize>(&self, report: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_grades_report(
        &self,
        table: &GradeTable,
        meta: &Meta,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonGradesReport {
            metadata: JsonReportMetadata::from_config(config),
            last_updated: meta.last_updated.as_deref(),
            filters: &config.filters,
            summary: table.stats(),
            grade_types: &table.grade_types,
            modules: table
                .module_groups
                .iter()
                .map(|group| JsonModule {
                    module: &group.module_name,
                    courses: group
                        .courses
                        .iter()
                        .map(|course| JsonCourse {
                            course: &course.course,
                            grades: course
                                .grades_by_type
                                .iter()
                                .map(|(grade_type, grade)| (grade_type.as_str(), grade))
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        };

        self.serialize(&report)
    }

    fn generate_new_grades_report(
        &self,
        new_grades: &[NewGrade],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonNewGradesReport {
            metadata: JsonReportMetadata::from_config(config),
            count: new_grades.len(),
            new_grades,
        };

        self.serialize(&report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structures for serialization

#[derive(Serialize)]
struct JsonGradesReport<'a> {
    metadata: JsonReportMetadata,
    last_updated: Option<&'a str>,
    filters: &'a GradeFilters,
    summary: TableStats,
    grade_types: &'a [String],
    modules: Vec<JsonModule<'a>>,
}

#[derive(Serialize)]
struct JsonNewGradesReport<'a> {
    metadata: JsonReportMetadata,
    count: usize,
    new_grades: &'a [NewGrade],
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl JsonReportMetadata {
    fn from_config(config: &ReportConfig) -> Self {
        Self {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            generated_at: config
                .metadata
                .generated_at
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            source: config.metadata.source.clone(),
            title: config.title.clone(),
        }
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct JsonModule<'a> {
    module: &'a str,
    courses: Vec<JsonCourse<'a>>,
}

#[derive(Serialize)]
struct JsonCourse<'a> {
    course: &'a str,
    grades: IndexMap<&'a str, &'a FlattenedGrade>,
}
