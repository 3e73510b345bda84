//! Configuration validation for grades-dashboard.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, NotifyConfig, OutputConfig, SourceConfig, TuiConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("http://") && url.len() > "http://".len())
        || (url.starts_with("https://") && url.len() > "https://".len())
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.source.validate());
        errors.extend(self.output.validate());
        errors.extend(self.tui.validate());
        errors.extend(self.notify.validate());
        errors
    }
}

impl Validatable for SourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // The API base only matters when no file is given
        if self.file.is_none() && !is_http_url(&self.api_base) {
            errors.push(ConfigError::new(
                "source.api_base",
                format!(
                    "Expected an http:// or https:// URL, got '{}'",
                    self.api_base
                ),
            ));
        }

        if !(1..=600).contains(&self.timeout_secs) {
            errors.push(ConfigError::new(
                "source.timeout_secs",
                format!(
                    "Timeout must be between 1 and 600 seconds, got {}",
                    self.timeout_secs
                ),
            ));
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

impl Validatable for TuiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(16..=5000).contains(&self.tick_rate_ms) {
            errors.push(ConfigError::new(
                "tui.tick_rate_ms",
                format!(
                    "Tick rate must be between 16 and 5000 ms, got {}",
                    self.tick_rate_ms
                ),
            ));
        }
        errors
    }
}

impl Validatable for NotifyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !is_http_url(&self.server) {
            errors.push(ConfigError::new(
                "notify.server",
                format!("Expected an http:// or https:// URL, got '{}'", self.server),
            ));
        }

        if !(1..=5).contains(&self.priority) {
            errors.push(ConfigError::new(
                "notify.priority",
                format!("Priority must be between 1 and 5, got {}", self.priority),
            ));
        }

        if let Some(topic) = &self.topic {
            if topic.trim().is_empty() || topic.contains('/') {
                errors.push(ConfigError::new(
                    "notify.topic",
                    format!("Invalid topic '{topic}'"),
                ));
            }
        }

        errors
    }
}
