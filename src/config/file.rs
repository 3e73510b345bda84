//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".grades-dashboard.yaml",
    ".grades-dashboard.yml",
    "grades-dashboard.yaml",
    "grades-dashboard.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/grades-dashboard/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist, searching defaults", path.display());
    }

    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("grades-dashboard"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home);
    }

    candidates.iter().find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Default location for `config init`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("grades-dashboard"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grades-dashboard.yaml")
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Command-line Overrides
// ============================================================================

/// Settings given on the command line.
///
/// `None` leaves the file value alone; `Some` replaces it, so an empty
/// filter string resets a filter from the file back to "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    /// Drop a grades file configured in the file so the API is used
    pub prefer_api: bool,
    pub grades_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub search: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub module: Option<String>,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
    pub ntfy_topic: Option<String>,
    pub ntfy_server: Option<String>,
}

fn replace<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

impl AppConfig {
    /// Apply command-line settings on top of this config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        replace(&mut self.source.api_base, overrides.api_base.as_ref());
        if overrides.prefer_api {
            self.source.file = None;
        }
        if overrides.grades_file.is_some() {
            self.source.file.clone_from(&overrides.grades_file);
        }
        replace(&mut self.source.timeout_secs, overrides.timeout_secs.as_ref());

        replace(&mut self.filters.search, overrides.search.as_ref());
        replace(&mut self.filters.year, overrides.year.as_ref());
        replace(&mut self.filters.semester, overrides.semester.as_ref());
        replace(&mut self.filters.module, overrides.module.as_ref());

        replace(&mut self.output.format, overrides.format.as_ref());
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        self.output.no_color |= overrides.no_color;

        if overrides.ntfy_topic.is_some() {
            self.notify.topic.clone_from(&overrides.ntfy_topic);
        }
        replace(&mut self.notify.server, overrides.ntfy_server.as_ref());
    }

    /// Load from file and apply CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_overrides(overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# grades-dashboard configuration
# ===============================
#
# Place this file at:
#   - .grades-dashboard.yaml in the current directory
#   - ~/.config/grades-dashboard/grades-dashboard.yaml for global config
#
# CLI arguments always override file settings.

# Where grades come from
source:
  # Base URL of the grades API (without /api)
  api_base: http://127.0.0.1:8000
  # Read a nested grades JSON file instead of the API
  # file: ./grades.json
  # HTTP timeout in seconds (1-600)
  timeout_secs: 30

# Filters applied on startup (empty = all)
filters:
  search: ''
  year: ''
  semester: ''
  module: ''

# Output configuration
output:
  # Format: auto, tui, table, json, csv, summary
  format: auto
  # Output file path (omit for stdout)
  # file: grades.csv
  # Disable colored output
  no_color: false

# TUI configuration
tui:
  # Theme used until one is picked in the dashboard with T; the saved
  # choice and --theme both take precedence. Omit to follow the terminal.
  # theme: dark
  tick_rate_ms: 250

# New-grade notifications through ntfy
notify:
  server: https://ntfy.sh
  # topic: my-grades
  priority: 5
  tags:
    - face_in_clouds
  # click: https://school.example/grades
  timeout_secs: 10
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
    use crate::palette::ThemeName;
    use crate::table::GradeFilters;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".grades-dashboard.yaml");
        std::fs::write(&config_path, "source:\n  timeout_secs: 5\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r#"
source:
  api_base: https://grades.example
filters:
  year: "2024-2025"
tui:
  theme: light
notify:
  topic: my-grades
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.source.api_base, "https://grades.example");
        assert_eq!(config.source.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.filters.year, "2024-2025");
        assert_eq!(config.tui.theme, Some(ThemeName::Light));
        assert_eq!(config.notify.topic.as_deref(), Some("my-grades"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "source: [unclosed").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides_replace_only_what_was_given() {
        let mut config = AppConfig::builder()
            .api_base("https://from-file.example")
            .filters(GradeFilters::default().with_year("Y1").with_module("Maths"))
            .build();
        config.apply_overrides(&ConfigOverrides {
            module: Some("Physics".to_string()),
            format: Some(ReportFormat::Json),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.source.api_base, "https://from-file.example");
        assert_eq!(config.filters.year, "Y1");
        assert_eq!(config.filters.module, "Physics");
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_overrides_equal_to_defaults_still_win() {
        let mut config = AppConfig::builder()
            .api_base("https://from-file.example")
            .timeout_secs(5)
            .filters(GradeFilters::default().with_semester("S2"))
            .output_format(ReportFormat::Csv)
            .build();
        config.apply_overrides(&ConfigOverrides {
            api_base: Some(DEFAULT_API_BASE.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            semester: Some(String::new()),
            format: Some(ReportFormat::Auto),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.source.api_base, DEFAULT_API_BASE);
        assert_eq!(config.source.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.filters.semester, "");
        assert_eq!(config.output.format, ReportFormat::Auto);
    }

    #[test]
    fn test_prefer_api_drops_file_but_cli_file_wins() {
        let mut config = AppConfig::builder()
            .grades_file(Some("from-file.json".into()))
            .build();
        config.apply_overrides(&ConfigOverrides {
            api_base: Some("https://cli.example".to_string()),
            prefer_api: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.source.file, None);

        config.apply_overrides(&ConfigOverrides {
            prefer_api: true,
            grades_file: Some("cli.json".into()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.source.file, Some(PathBuf::from("cli.json")));
    }

    #[test]
    fn test_api_base_without_preference_keeps_file() {
        let mut config = AppConfig::builder()
            .grades_file(Some("from-file.json".into()))
            .build();
        config.apply_overrides(&ConfigOverrides {
            api_base: Some("https://env.example".to_string()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.source.api_base, "https://env.example");
        assert_eq!(config.source.file, Some(PathBuf::from("from-file.json")));
    }

    #[test]
    fn test_example_config_parses() {
        let example = generate_example_config();
        let config: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "output:\n  no_color: true").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
