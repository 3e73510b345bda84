//! New-grades command handler.
//!
//! Compares two grades documents, reports the grades that appeared in the
//! newer one and pushes them to the configured notification sinks.

use crate::config::AppConfig;
use crate::diff::find_new_grades;
use crate::notify::build_sinks;
use crate::pipeline::{exit_codes, output_new_grades_report};
use crate::source::load_years;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Inputs for the `new-grades` subcommand.
#[derive(Debug, Clone)]
pub struct NewGradesConfig {
    /// Previous grades document
    pub old: PathBuf,
    /// Current grades document
    pub new: PathBuf,
    /// Exit with [`exit_codes::NEW_GRADES`] when anything is new
    pub fail_on_new: bool,
    pub quiet: bool,
    /// Output, notify and the rest of the merged configuration
    pub app: AppConfig,
}

/// Run the new-grades command
#[allow(clippy::needless_pass_by_value)]
pub fn run_new_grades(config: NewGradesConfig) -> Result<i32> {
    super::ensure_valid(&config.app.output)?;
    super::ensure_valid(&config.app.notify)?;

    let old_years = load_years(&config.old)
        .with_context(|| format!("Failed to read {}", config.old.display()))?;
    let new_years = load_years(&config.new)
        .with_context(|| format!("Failed to read {}", config.new.display()))?;

    let new_grades = find_new_grades(&old_years, &new_years);
    if !config.quiet {
        tracing::info!(
            "{} new grade(s) between {} and {}",
            new_grades.len(),
            config.old.display(),
            config.new.display()
        );
    }

    let origin = config.new.display().to_string();
    output_new_grades_report(&config.app, &new_grades, &origin, config.quiet)?;

    if !new_grades.is_empty() {
        let sinks = build_sinks(&config.app.notify, config.quiet)
            .context("Failed to set up notifications")?;
        for mut sink in sinks {
            match sink.notify_all(&new_grades) {
                Ok(sent) => tracing::debug!("{} sink handled {sent} grade(s)", sink.name()),
                Err(e) => tracing::warn!("{} notifications failed: {e}", sink.name()),
            }
        }
    }

    if config.fail_on_new && !new_grades.is_empty() {
        return Ok(exit_codes::NEW_GRADES);
    }
    Ok(exit_codes::SUCCESS)
}
