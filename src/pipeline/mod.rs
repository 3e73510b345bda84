//! Pipeline orchestration for grade operations.
//!
//! This module provides shared orchestration logic for load → filter → group →
//! report workflows, reducing duplication across CLI command handlers.

mod load;
mod output;
mod report_stage;

pub use load::{load_grades, open_source};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use report_stage::{output_grades_report, output_new_grades_report};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Grades could not be loaded from the configured source
    #[error("Loading grades from {origin} failed: {source}")]
    LoadFailed {
        origin: String,
        #[source]
        source: crate::error::GradesError,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for scripting and cron integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// New grades were found (with --fail-on-new)
    pub const NEW_GRADES: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
