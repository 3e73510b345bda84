//! Configuration file, merge and validation tests.

use grades_dashboard::config::{
    generate_example_config, generate_json_schema, load_config_file, AppConfig, ConfigFileError,
    ConfigOverrides, TuiPreferences, Validatable, DEFAULT_API_BASE,
};
use grades_dashboard::palette::ThemeName;
use grades_dashboard::reports::ReportFormat;
use tempfile::TempDir;

fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join(".grades-dashboard.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn partial_file_keeps_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        "source:\n  file: grades.json\nfilters:\n  semester: S1\ntui:\n  theme: light\n",
    );

    let config = load_config_file(&path).unwrap();
    assert_eq!(config.source.api_base, DEFAULT_API_BASE);
    assert_eq!(config.source.file.as_deref(), Some(std::path::Path::new("grades.json")));
    assert_eq!(config.filters.semester, "S1");
    assert_eq!(config.tui.theme, Some(ThemeName::Light));
    assert!(config.validate().is_empty());
}

#[test]
fn empty_file_is_default_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, "  \n");
    assert_eq!(load_config_file(&path).unwrap(), AppConfig::default());
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, "source: [unclosed");
    assert!(matches!(
        load_config_file(&path),
        Err(ConfigFileError::Parse(_))
    ));
}

#[test]
fn missing_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        load_config_file(&tmp.path().join("nope.yaml")),
        Err(ConfigFileError::NotFound(_))
    ));
}

#[test]
fn cli_values_override_file_values() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        "source:\n  api_base: https://grades.example\nfilters:\n  year: '2023-2024'\n  module: Maths\n",
    );

    let overrides = ConfigOverrides {
        year: Some("2024-2025".to_string()),
        format: Some(ReportFormat::Csv),
        ..ConfigOverrides::default()
    };
    let (config, loaded_from) = AppConfig::from_file_with_overrides(Some(&path), &overrides);

    assert_eq!(loaded_from.as_deref(), Some(path.as_path()));
    // untouched by the CLI
    assert_eq!(config.source.api_base, "https://grades.example");
    assert_eq!(config.filters.module, "Maths");
    // overridden
    assert_eq!(config.filters.year, "2024-2025");
    assert_eq!(config.output.format, ReportFormat::Csv);
}

#[test]
fn cli_can_restore_defaults_over_file_values() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        "source:\n  api_base: https://grades.example\n  file: grades.json\nfilters:\n  module: Maths\n",
    );

    let overrides = ConfigOverrides {
        api_base: Some(DEFAULT_API_BASE.to_string()),
        prefer_api: true,
        module: Some(String::new()),
        ..ConfigOverrides::default()
    };
    let (config, _) = AppConfig::from_file_with_overrides(Some(&path), &overrides);

    assert_eq!(config.source.api_base, DEFAULT_API_BASE);
    assert_eq!(config.source.file, None);
    assert!(config.filters.module.is_empty());
}

#[test]
fn validation_lists_every_problem() {
    let mut config = AppConfig::builder()
        .api_base("grades.example")
        .timeout_secs(0)
        .build();
    config.tui.tick_rate_ms = 1;

    let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
    assert!(fields.contains(&"source.api_base".to_string()));
    assert!(fields.contains(&"source.timeout_secs".to_string()));
    assert!(fields.contains(&"tui.tick_rate_ms".to_string()));
}

#[test]
fn grades_file_makes_api_base_irrelevant() {
    let config = AppConfig::builder()
        .api_base("")
        .grades_file(Some("grades.json".into()))
        .build();
    assert!(config.validate().is_empty());
}

#[test]
fn example_config_parses_and_validates() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, &generate_example_config());

    let config = load_config_file(&path).unwrap();
    assert!(config.validate().is_empty());
    assert_eq!(config, AppConfig::default());
}

#[test]
fn schema_documents_sections() {
    let schema: serde_json::Value = serde_json::from_str(&generate_json_schema().unwrap()).unwrap();
    let properties = &schema["properties"];
    for section in ["source", "filters", "output", "tui", "notify"] {
        assert!(properties.get(section).is_some(), "missing {section}");
    }
}

#[test]
fn preferences_round_trip_through_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("preferences.json");

    TuiPreferences {
        theme: Some(ThemeName::Light),
    }
    .save_to(&path)
    .unwrap();

    assert_eq!(TuiPreferences::load_from(&path).theme, Some(ThemeName::Light));
    assert_eq!(
        TuiPreferences::load_from(&tmp.path().join("missing.json")),
        TuiPreferences::default()
    );
}
