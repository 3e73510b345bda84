//! Report type definitions.

use crate::palette::ThemeName;
use crate::table::GradeFilters;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: TUI if TTY, table otherwise
    #[default]
    Auto,
    /// Interactive TUI dashboard
    Tui,
    /// Grade table for the terminal (colored)
    Table,
    /// Structured JSON output
    Json,
    /// CSV for spreadsheet import
    Csv,
    /// Brief summary output
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Tui => write!(f, "tui"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Custom title for the report
    pub title: Option<String>,
    /// Theme used to color grade cells
    pub theme: ThemeName,
    /// Filters that produced the reported table
    pub filters: GradeFilters,
    /// Report metadata
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeName) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: GradeFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// API base URL or grades file the data came from
    pub source: Option<String>,
    /// Tool version
    pub tool_version: String,
    /// Generation timestamp
    pub generated_at: Option<String>,
}

impl ReportMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}
