//! Course and module grouping.

use crate::model::{FlattenedGrade, GradeStatus};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// One table row: a course with its grades keyed by grade type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRow {
    /// `"module::course"`
    pub key: String,
    pub module: String,
    pub course: String,
    pub grades_by_type: IndexMap<String, FlattenedGrade>,
}

impl CourseRow {
    /// The grade recorded for a column, if any.
    #[must_use]
    pub fn grade(&self, grade_type: &str) -> Option<&FlattenedGrade> {
        self.grades_by_type.get(grade_type)
    }
}

/// A module heading with its courses in first-encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleGroup {
    pub module_name: String,
    pub courses: Vec<CourseRow>,
}

/// Grouped rows plus the grade-type columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeTable {
    /// Sorted by module name
    pub module_groups: Vec<ModuleGroup>,
    /// Distinct grade types, sorted; these are the table columns
    pub grade_types: Vec<String>,
}

impl GradeTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module_groups.is_empty()
    }

    /// Total number of course rows across modules.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.module_groups.iter().map(|g| g.courses.len()).sum()
    }

    /// Iterate every course row in display order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseRow> {
        self.module_groups.iter().flat_map(|g| g.courses.iter())
    }

    /// Cell counts by status and numeric spread over the visible cells.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            modules: self.module_groups.len(),
            courses: self.course_count(),
            grade_types: self.grade_types.len(),
            ..TableStats::default()
        };
        let mut total = 0.0;

        for grade in self.courses().flat_map(|c| c.grades_by_type.values()) {
            match grade.status {
                GradeStatus::Numeric => stats.numeric += 1,
                GradeStatus::Status => stats.status += 1,
                GradeStatus::Pending => stats.pending += 1,
            }
            if let Some(value) = grade.grade_numeric {
                total += value;
                stats.graded += 1;
                stats.lowest = Some(stats.lowest.map_or(value, |low: f64| low.min(value)));
                stats.highest = Some(stats.highest.map_or(value, |high: f64| high.max(value)));
            }
        }

        if stats.graded > 0 {
            stats.mean = Some(total / stats.graded as f64);
        }
        stats
    }
}

/// Aggregate figures over a [`GradeTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub modules: usize,
    pub courses: usize,
    pub grade_types: usize,
    pub numeric: usize,
    pub status: usize,
    pub pending: usize,
    /// Cells carrying a numeric grade
    pub graded: usize,
    /// Unweighted mean of numeric grades
    pub mean: Option<f64>,
    pub lowest: Option<f64>,
    pub highest: Option<f64>,
}

/// Group filtered rows by course, then by module.
///
/// When a course has several rows for the same grade type, the last one wins
/// and keeps the position of the first.
#[must_use]
pub fn group_rows(rows: &[FlattenedGrade]) -> GradeTable {
    let mut course_map: IndexMap<String, CourseRow> = IndexMap::new();
    let mut grade_types: BTreeSet<&str> = BTreeSet::new();

    for row in rows {
        let key = row.course_key();
        let course_row = course_map.entry(key.clone()).or_insert_with(|| CourseRow {
            key,
            module: row.module.clone(),
            course: row.course.clone(),
            grades_by_type: IndexMap::new(),
        });

        if let Some(previous) = course_row
            .grades_by_type
            .insert(row.grade_type.clone(), row.clone())
        {
            tracing::debug!(
                "Grade type '{}' repeated for {}; replacing {:?} with {:?}",
                row.grade_type,
                course_row.key,
                previous.grade_value,
                row.grade_value
            );
        }
        grade_types.insert(&row.grade_type);
    }

    let mut module_map: IndexMap<String, Vec<CourseRow>> = IndexMap::new();
    for course_row in course_map.into_values() {
        module_map
            .entry(course_row.module.clone())
            .or_default()
            .push(course_row);
    }

    let mut module_groups: Vec<ModuleGroup> = module_map
        .into_iter()
        .map(|(module_name, courses)| ModuleGroup {
            module_name,
            courses,
        })
        .collect();
    module_groups.sort_by(|a, b| a.module_name.cmp(&b.module_name));

    GradeTable {
        module_groups,
        grade_types: grade_types.into_iter().map(str::to_string).collect(),
    }
}
