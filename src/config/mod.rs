//! Configuration module for grades-dashboard.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - Command-line overrides layered over the file
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use grades_dashboard::config::AppConfig;
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .api_base("https://grades.example")
//!     .ntfy_topic(Some("my-grades".into()))
//!     .build();
//!
//! // Load from file
//! use grades_dashboard::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.grades-dashboard.yaml` file in the current directory or
//! `~/.config/grades-dashboard/`:
//!
//! ```yaml
//! source:
//!   api_base: https://grades.example
//! filters:
//!   year: 2024-2025
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, NotifyConfig, OutputConfig, SourceConfig, TuiConfig,
    TuiPreferences, DEFAULT_API_BASE, DEFAULT_NTFY_PRIORITY, DEFAULT_NTFY_SERVER,
    DEFAULT_TICK_RATE_MS, DEFAULT_TIMEOUT_SECS,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_config_path, discover_config_file, generate_example_config, load_config_file,
    load_or_default, ConfigFileError, ConfigOverrides, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.grades-dashboard.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
