//! View command handler.
//!
//! Implements the `view` subcommand: the interactive dashboard on a
//! terminal, or a one-shot report otherwise.

use crate::config::{AppConfig, TuiPreferences};
use crate::palette::{initial_theme, ThemeName};
use crate::pipeline::{
    auto_detect_format, exit_codes, load_grades, open_source, output_grades_report, OutputTarget,
};
use crate::reports::ReportFormat;
use crate::tui::{run_dashboard_tui, DashboardApp};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the view command. `theme` is a `--theme` given for this run and
/// outranks the saved dashboard choice.
#[allow(clippy::needless_pass_by_value)]
pub fn run_view(config: AppConfig, theme: Option<ThemeName>, quiet: bool) -> Result<i32> {
    super::ensure_valid(&config)?;

    let source = open_source(&config.source)?;
    let origin = source.describe();
    let theme = initial_theme(theme, TuiPreferences::load().theme, config.tui.theme);

    let output_target = OutputTarget::from_option(config.output.file.clone());
    let effective_output = auto_detect_format(config.output.format, &output_target);

    if effective_output == ReportFormat::Tui {
        tracing::debug!("Starting dashboard for {origin} ({theme} theme)");
        let mut app = DashboardApp::new(origin, config.filters.clone(), theme);
        run_dashboard_tui(&mut app, Arc::from(source), config.tui.tick_rate_ms)
            .context("dashboard terminal error")?;
        return Ok(exit_codes::SUCCESS);
    }

    let set = load_grades(source.as_ref())?;
    output_grades_report(&config, &set, &origin, theme, quiet)?;

    Ok(exit_codes::SUCCESS)
}
