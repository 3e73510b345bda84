//! CSV report generator.
//!
//! One line per course, one column per grade type, suitable for
//! spreadsheet import.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::NewGrade;
use crate::model::Meta;
use crate::table::GradeTable;

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate_grades_report(
        &self,
        table: &GradeTable,
        _meta: &Meta,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::new();

        let mut header = vec!["Module".to_string(), "Course".to_string()];
        header.extend(table.grade_types.iter().map(|t| quote(t)));
        content.push_str(&header.join(","));
        content.push('\n');

        for group in &table.module_groups {
            for course in &group.courses {
                let mut fields = vec![quote(&group.module_name), quote(&course.course)];
                fields.extend(table.grade_types.iter().map(|grade_type| {
                    course
                        .grade(grade_type)
                        .map(|g| quote(g.display_value()))
                        .unwrap_or_default()
                }));
                content.push_str(&fields.join(","));
                content.push('\n');
            }
        }

        Ok(content)
    }

    fn generate_new_grades_report(
        &self,
        new_grades: &[NewGrade],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::from("Course,Grade Type,Value,Coef\n");

        for grade in new_grades {
            content.push_str(&format!(
                "{},{},{},{}\n",
                quote(&grade.course),
                quote(&grade.grade_type),
                quote(&grade.value),
                quote(&grade.coef)
            ));
        }

        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Quote a field only when it needs it (RFC 4180).
fn quote(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", escape_csv(s))
    } else {
        s.to_string()
    }
}

/// Double embedded quotes and flatten newlines.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace(['\n', '\r'], " ")
}
