//! Report generator tests over the fixture grades document.

use grades_dashboard::model::GradeSet;
use grades_dashboard::palette::ThemeName;
use grades_dashboard::reports::{
    create_reporter_with_options, ReportConfig, ReportFormat, ReportMetadata,
};
use grades_dashboard::source::{FileSource, GradeSource};
use grades_dashboard::table::{filter_rows, group_rows, GradeFilters, GradeTable};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/grades.json");

fn load() -> GradeSet {
    FileSource::new(FIXTURE).load().unwrap()
}

fn table(set: &GradeSet, filters: &GradeFilters) -> GradeTable {
    group_rows(&filter_rows(&set.rows, filters))
}

fn render(format: ReportFormat, filters: &GradeFilters) -> String {
    let set = load();
    let config = ReportConfig {
        metadata: ReportMetadata::new("grades.json"),
        ..ReportConfig::default()
    }
    .with_theme(ThemeName::Dark)
    .with_filters(filters.clone());

    create_reporter_with_options(format, false)
        .generate_grades_report(&table(&set, filters), &set.meta, &config)
        .unwrap()
}

#[test]
fn csv_one_line_per_course() {
    let csv = render(ReportFormat::Csv, &GradeFilters::default());
    insta::assert_snapshot!(csv, @r#"
    Module,Course,Examen,Oral,Projet,TP
    Anglais,English,,ABS,,
    Informatique,Programmation,,,Validé,
    Maths,Calcul différentiel / Calculus,"15,5",,,Pending
    Maths,Algèbre,8,,,
    Maths,Probabilités,18,,,
    "#);
}

#[test]
fn csv_respects_filters() {
    let csv = render(
        ReportFormat::Csv,
        &GradeFilters::default().with_semester("S2"),
    );
    insta::assert_snapshot!(csv, @r"
    Module,Course,Examen
    Maths,Probabilités,18
    ");
}

#[test]
fn json_report_carries_summary_and_modules() {
    let json = render(ReportFormat::Json, &GradeFilters::default());
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(report["summary"]["modules"], 3);
    assert_eq!(report["summary"]["courses"], 5);
    assert_eq!(report["summary"]["pending"], 1);
    assert_eq!(report["grade_types"].as_array().unwrap().len(), 4);
    assert_eq!(report["modules"].as_array().unwrap().len(), 3);
}

#[test]
fn table_report_without_color_is_plain_text() {
    let text = render(ReportFormat::Table, &GradeFilters::default());

    assert!(!text.contains('\u{1b}'));
    assert!(text.contains("Probabilités"));
    assert!(text.contains("Pending"));
}

#[test]
fn table_report_with_color_paints_grades() {
    let set = load();
    let filters = GradeFilters::default();
    let text = create_reporter_with_options(ReportFormat::Table, true)
        .generate_grades_report(&table(&set, &filters), &set.meta, &ReportConfig::default())
        .unwrap();

    // Truecolor escape for at least one grade cell
    assert!(text.contains("\u{1b}[38;2;"));
}

#[test]
fn empty_table_reports_the_empty_message() {
    let text = render(
        ReportFormat::Table,
        &GradeFilters::default().with_module("Chimie"),
    );
    assert!(text.contains("No grades match the current filters."));
}

#[test]
fn summary_counts_statuses() {
    let text = render(ReportFormat::Summary, &GradeFilters::default());
    assert!(text.contains("3 modules, 5 courses, 4 grade types"));
    assert!(text.contains("3 numeric, 2 status, 1 pending"));
}
