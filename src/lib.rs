//! **Browse, filter and color-code grade records from the terminal.**
//!
//! `grades-dashboard` reads grades from a running grades API (`/api/grades`,
//! `/api/meta`) or straight from the nested grades document the backend
//! serves, flattens them into one row per grade, and presents them as a
//! module/course table with one column per grade type. Grade cells are
//! colored on a red-to-green scale that adapts to a light or dark theme.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the nested document ([`YearRecord`] and friends), the
//!   flattened [`FlattenedGrade`] row and the API envelopes.
//! - **[`source`]**: the [`GradeSource`] trait with an HTTP client and a
//!   local file reader.
//! - **[`table`]**: filtering ([`GradeFilters`]) and module/course grouping
//!   ([`GradeTable`]).
//! - **[`palette`]**: the grade color mapper and theme selection.
//! - **[`diff`]**: new-grade detection between two snapshots.
//! - **[`notify`]**: stdout and ntfy notification sinks.
//! - **[`reports`]**: table, JSON, CSV and summary reports.
//! - **[`tui`]**: the interactive dashboard.
//!
//! ## Getting Started
//!
//! ```no_run
//! use grades_dashboard::source::{FileSource, GradeSource};
//! use grades_dashboard::table::{filter_rows, group_rows, GradeFilters};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let set = FileSource::new("grades.json").load()?;
//!
//!     let filters = GradeFilters::default().with_semester("S1");
//!     let table = group_rows(&filter_rows(&set.rows, &filters));
//!
//!     for group in &table.module_groups {
//!         println!("{} ({} courses)", group.module_name, group.courses.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Detecting new grades
//!
//! ```no_run
//! use std::path::Path;
//! use grades_dashboard::diff::find_new_grades;
//! use grades_dashboard::source::load_years;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = load_years(Path::new("grades_old.json"))?;
//!     let new = load_years(Path::new("grades.json"))?;
//!
//!     for grade in find_new_grades(&old, &new) {
//!         println!("{}: {}", grade.title, grade.details);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default): the API client and ntfy notifications, via `reqwest`.
//!   Without it only file sources are available.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // TUI layout math and color blending cast between usize, u16 and f64
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Render functions are long
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod notify;
pub mod palette;
pub mod pipeline;
pub mod reports;
pub mod source;
pub mod table;
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use diff::{find_new_grades, NewGrade};
pub use error::{ErrorContext, GradesError, OptionContext, Result};
pub use model::{flatten_grades, FlattenedGrade, GradeSet, GradeStatus, Meta, YearRecord};
pub use palette::{grade_color, GradeColor, ThemeName};
pub use reports::{ReportFormat, ReportGenerator};
#[cfg(feature = "http")]
pub use source::ApiClient;
pub use source::{FileSource, GradeSource};
pub use table::{filter_rows, group_rows, GradeFilters, GradeTable};
