//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod new_grades;
mod view;

pub use new_grades::{run_new_grades, NewGradesConfig};
pub use view::run_view;

use crate::config::{ConfigError, Validatable};

/// Fail with every validation problem listed, one per line.
pub(crate) fn ensure_valid(config: &impl Validatable) -> anyhow::Result<()> {
    let errors: Vec<ConfigError> = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
    anyhow::bail!("Invalid configuration:\n{}", details.join("\n"))
}
