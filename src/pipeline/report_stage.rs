//! Report output stage.
//!
//! Filters and groups loaded grades, then renders them in the configured
//! format to a file or stdout.

use crate::config::AppConfig;
use crate::diff::NewGrade;
use crate::model::GradeSet;
use crate::palette::ThemeName;
use crate::reports::{create_reporter_with_options, ReportConfig, ReportFormat, ReportMetadata};
use crate::table::{filter_rows, group_rows};
use anyhow::Result;

use super::{auto_detect_format, should_use_color, write_output, OutputTarget};

/// Resolve the non-interactive format for the configured output.
///
/// The dashboard is started by the caller, so a `Tui` resolution falls back
/// to the plain table here.
fn report_format(config: &AppConfig, target: &OutputTarget) -> ReportFormat {
    match auto_detect_format(config.output.format, target) {
        ReportFormat::Auto | ReportFormat::Tui => ReportFormat::Table,
        other => other,
    }
}

/// Output a grades report to the configured destination.
pub fn output_grades_report(
    config: &AppConfig,
    set: &GradeSet,
    origin: &str,
    theme: ThemeName,
    quiet: bool,
) -> Result<()> {
    let output_target = OutputTarget::from_option(config.output.file.clone());
    let format = report_format(config, &output_target);

    let rows = filter_rows(&set.rows, &config.filters);
    let table = group_rows(&rows);
    tracing::debug!(
        "{} of {} rows kept by filters, {} courses in {} modules",
        rows.len(),
        set.rows.len(),
        table.course_count(),
        table.module_groups.len()
    );

    let report_config = ReportConfig {
        metadata: ReportMetadata::new(origin),
        ..ReportConfig::default()
    }
    .with_theme(theme)
    .with_filters(config.filters.clone());

    let use_color = should_use_color(config.output.no_color) && output_target.is_terminal();
    let reporter = create_reporter_with_options(format, use_color);
    let report = reporter.generate_grades_report(&table, &set.meta, &report_config)?;

    write_output(&report, &output_target, quiet)
}

/// Output the list of newly detected grades.
pub fn output_new_grades_report(
    config: &AppConfig,
    new_grades: &[NewGrade],
    origin: &str,
    quiet: bool,
) -> Result<()> {
    let output_target = OutputTarget::from_option(config.output.file.clone());
    let format = report_format(config, &output_target);

    let report_config = ReportConfig {
        metadata: ReportMetadata::new(origin),
        ..ReportConfig::default()
    };

    let use_color = should_use_color(config.output.no_color) && output_target.is_terminal();
    let reporter = create_reporter_with_options(format, use_color);
    let report = reporter.generate_new_grades_report(new_grades, &report_config)?;

    write_output(&report, &output_target, quiet)
}
