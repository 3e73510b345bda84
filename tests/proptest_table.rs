//! Property-based tests for filtering, grouping and the color mapper.
//!
//! Ensures the pure table functions hold their invariants for arbitrary
//! rows and filter values, and that color mapping never panics.

use grades_dashboard::model::{parse_grade, FlattenedGrade, GradeStatus};
use grades_dashboard::palette::{grade_color, ThemeName};
use grades_dashboard::table::{filter_rows, group_rows, GradeFilters};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn row_strategy() -> impl Strategy<Value = FlattenedGrade> {
    (
        prop::sample::select(vec!["Y1", "Y2"]),
        prop::sample::select(vec!["S1", "S2", ""]),
        prop::sample::select(vec!["Maths", "Physique", "Anglais", ""]),
        "[A-Za-zé ]{0,12}",
        prop::sample::select(vec!["Examen", "TP", "Projet", "Oral"]),
        prop::option::of(-5.0f64..25.0),
    )
        .prop_map(|(year, semester, module, course, grade_type, value)| {
            let grade_numeric = value.filter(|v| (0.0..=20.0).contains(v));
            FlattenedGrade {
                year: year.to_string(),
                semester: semester.to_string(),
                module: module.to_string(),
                course,
                grade_type: grade_type.to_string(),
                grade_value: value.map(|v| format!("{v:.1}")),
                grade_numeric,
                grade_coef: None,
                type_coefficient: None,
                status: match (value, grade_numeric) {
                    (None, _) => GradeStatus::Pending,
                    (Some(_), Some(_)) => GradeStatus::Numeric,
                    (Some(_), None) => GradeStatus::Status,
                },
            }
        })
}

fn filters_strategy() -> impl Strategy<Value = GradeFilters> {
    (
        "[a-zé ]{0,4}",
        prop::sample::select(vec!["", "Y1", "Y3"]),
        prop::sample::select(vec!["", "S1", "S2"]),
        prop::sample::select(vec!["", "Maths", "Anglais"]),
    )
        .prop_map(|(search, year, semester, module)| {
            GradeFilters::default()
                .with_search(search)
                .with_year(year)
                .with_semester(semester)
                .with_module(module)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn filtering_is_idempotent(
        rows in prop::collection::vec(row_strategy(), 0..40),
        filters in filters_strategy(),
    ) {
        let once = filter_rows(&rows, &filters);
        let twice = filter_rows(&once, &filters);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_filters_keep_every_row(rows in prop::collection::vec(row_strategy(), 0..40)) {
        prop_assert_eq!(filter_rows(&rows, &GradeFilters::default()), rows);
    }

    #[test]
    fn filtered_rows_satisfy_every_criterion(
        rows in prop::collection::vec(row_strategy(), 0..40),
        filters in filters_strategy(),
    ) {
        for row in filter_rows(&rows, &filters) {
            prop_assert!(filters.matches(&row));
            prop_assert!(filters.year.is_empty() || row.year == filters.year);
            prop_assert!(filters.semester.is_empty() || row.semester == filters.semester);
            prop_assert!(filters.module.is_empty() || row.module == filters.module);
        }
    }

    #[test]
    fn grouping_sorts_modules_and_columns(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let table = group_rows(&rows);

        let modules: Vec<_> = table.module_groups.iter().map(|g| g.module_name.clone()).collect();
        let mut sorted_modules = modules.clone();
        sorted_modules.sort();
        prop_assert_eq!(modules, sorted_modules);

        let expected_types: Vec<String> = rows
            .iter()
            .map(|r| r.grade_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        prop_assert_eq!(&table.grade_types, &expected_types);
    }

    #[test]
    fn grouping_has_one_row_per_course(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let table = group_rows(&rows);
        let distinct: BTreeSet<_> = rows.iter().map(FlattenedGrade::course_key).collect();

        prop_assert_eq!(table.course_count(), distinct.len());
        for group in &table.module_groups {
            for course in &group.courses {
                prop_assert_eq!(&course.module, &group.module_name);
                prop_assert!(!course.grades_by_type.is_empty());
            }
        }
    }

    #[test]
    fn color_mapping_clamps_out_of_range(grade in -1000.0f64..1000.0) {
        for theme in ThemeName::ALL {
            let clamped = grade.clamp(0.0, 20.0);
            prop_assert_eq!(grade_color(Some(grade), theme), grade_color(Some(clamped), theme));
            prop_assert!(!grade_color(Some(grade), theme).is_neutral());
        }
    }

    #[test]
    fn parse_grade_stays_on_scale(s in "\\PC{0,12}") {
        if let Some(value) = parse_grade(&serde_json::Value::String(s)) {
            prop_assert!((0.0..=20.0).contains(&value));
        }
    }
}

#[test]
fn missing_grade_is_neutral() {
    for theme in ThemeName::ALL {
        assert!(grade_color(None, theme).is_neutral());
        assert!(grade_color(Some(f64::NAN), theme).is_neutral());
    }
}
