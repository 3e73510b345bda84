//! Configuration types for grades-dashboard.
//!
//! Provides structured configuration for the dashboard, report output and
//! new-grade notifications.

use crate::palette::ThemeName;
use crate::reports::ReportFormat;
use crate::table::GradeFilters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default TUI tick rate in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 250;
/// Public ntfy instance.
pub const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";
/// ntfy "max" priority.
pub const DEFAULT_NTFY_PRIORITY: u8 = 5;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where grades come from
    pub source: SourceConfig,
    /// Filters applied on startup
    pub filters: GradeFilters,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// TUI-specific configuration
    pub tui: TuiConfig,
    /// New-grade notifications
    pub notify: NotifyConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the API base URL.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.source.api_base = api_base.into();
        self
    }

    /// Read grades from a local file instead of the API.
    pub fn grades_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.source.file = file;
        self
    }

    /// Set the HTTP timeout.
    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.source.timeout_secs = secs;
        self
    }

    /// Set the startup filters.
    pub fn filters(mut self, filters: GradeFilters) -> Self {
        self.config.filters = filters;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Force a theme.
    pub const fn theme(mut self, theme: Option<ThemeName>) -> Self {
        self.config.tui.theme = theme;
        self
    }

    /// Publish new grades to an ntfy topic.
    pub fn ntfy_topic(mut self, topic: Option<String>) -> Self {
        self.config.notify.topic = topic;
        self
    }

    /// Set the ntfy server.
    pub fn ntfy_server(mut self, server: impl Into<String>) -> Self {
        self.config.notify.server = server.into();
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Source Configuration
// ============================================================================

/// Grade source selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the grades API, without the `/api` suffix
    pub api_base: String,
    /// Nested grades JSON file; takes precedence over `api_base`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// HTTP timeout in seconds
    #[schemars(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

// ============================================================================
// TUI Configuration
// ============================================================================

/// TUI-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TuiConfig {
    /// Starting theme when none was saved from the dashboard; when unset
    /// the terminal's own background decides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeName>,
    /// Event loop tick in milliseconds
    #[schemars(range(min = 16, max = 5000))]
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: None,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

// ============================================================================
// TUI Preferences (persisted)
// ============================================================================

/// TUI preferences that persist across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TuiPreferences {
    /// Last theme chosen in the dashboard
    #[serde(default)]
    pub theme: Option<ThemeName>,
}

impl TuiPreferences {
    /// Get the path to the preferences file.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("grades-dashboard").join("preferences.json"))
    }

    /// Load preferences from disk, or return defaults if not found.
    #[must_use]
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load preferences from a specific file; unreadable files give defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save preferences to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

// ============================================================================
// Notification Configuration
// ============================================================================

/// ntfy push notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NotifyConfig {
    /// ntfy server URL
    pub server: String,
    /// Topic to publish to; notifications are off when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Message priority (1-5)
    #[schemars(range(min = 1, max = 5))]
    pub priority: u8,
    /// ntfy tags (emoji shortcodes)
    pub tags: Vec<String>,
    /// URL opened when the notification is tapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_NTFY_SERVER.to_string(),
            topic: None,
            priority: DEFAULT_NTFY_PRIORITY,
            tags: vec!["face_in_clouds".to_string()],
            click: None,
            timeout_secs: 10,
        }
    }
}
