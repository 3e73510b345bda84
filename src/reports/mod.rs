//! Report generation for grade tables and new-grade lists.
//!
//! This module provides the non-interactive output formats:
//! - Table: aligned terminal table with grade cells colored per theme
//! - JSON: structured data for programmatic integration
//! - CSV: one row per course, one column per grade type
//! - Summary: compact shell-friendly counts

mod csv;
mod json;
mod summary;
mod types;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::diff::NewGrade;
use crate::model::Meta;
use crate::table::GradeTable;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for a grouped grade table
    fn generate_grades_report(
        &self,
        table: &GradeTable,
        meta: &Meta,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report listing newly detected grades
    fn generate_new_grades_report(
        &self,
        new_grades: &[NewGrade],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write a grades report to a writer
    fn write_grades_report(
        &self,
        table: &GradeTable,
        meta: &Meta,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_grades_report(table, meta, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
///
/// `Auto` and `Tui` fall back to the table reporter; callers that can run
/// the dashboard resolve them before getting here.
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Tui | ReportFormat::Table => {
            if use_color {
                Box::new(TableReporter::new())
            } else {
                Box::new(TableReporter::new().no_color())
            }
        }
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}
