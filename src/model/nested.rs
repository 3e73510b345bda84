//! The nested grades document and its flattening.

use super::grade::{lenient_f64, scalar_to_string, FlattenedGrade, GradeStatus};
use super::response::{Meta, MetaFilters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest grade on the scale.
pub const GRADE_MIN: f64 = 0.0;
/// Highest grade on the scale.
pub const GRADE_MAX: f64 = 20.0;

/// One academic year of the grades document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRecord {
    pub year_name: String,
    pub semesters: Vec<SemesterRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemesterRecord {
    pub semester_name: String,
    pub semester_modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleRecord {
    pub module_name: String,
    pub module_courses: Vec<CourseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRecord {
    pub course_name: String,
    pub course_grades_type: Vec<GradeTypeRecord>,
}

/// An assessment category inside a course, with its recorded grades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeTypeRecord {
    pub grade_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub coefficient: Option<f64>,
    pub grades: Vec<GradeEntry>,
}

/// A single recorded grade. Values are kept as raw JSON scalars since the
/// portal mixes numbers, decimal-comma strings and status words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeEntry {
    pub grade: serde_json::Value,
    pub coef: serde_json::Value,
}

impl GradeEntry {
    /// The grade as display text, absent for `null`.
    #[must_use]
    pub fn grade_text(&self) -> Option<String> {
        scalar_to_string(&self.grade)
    }

    /// The coefficient as display text, absent for `null`.
    #[must_use]
    pub fn coef_text(&self) -> Option<String> {
        scalar_to_string(&self.coef)
    }
}

/// Parse a raw grade into the 0-20 scale.
///
/// Accepts numbers and strings, with `,` as an alternative decimal
/// separator. Anything unparseable, non-finite or out of range is `None`.
#[must_use]
pub fn parse_grade(raw: &serde_json::Value) -> Option<f64> {
    let text = scalar_to_string(raw)?;
    let numeric: f64 = text.replace(',', ".").trim().parse().ok()?;
    (numeric.is_finite() && (GRADE_MIN..=GRADE_MAX).contains(&numeric)).then_some(numeric)
}

/// Flatten the nested document into one row per grade observation.
///
/// A grade type without grades still produces a single `pending` row so the
/// course shows up in the table.
#[must_use]
pub fn flatten_grades(years: &[YearRecord]) -> Vec<FlattenedGrade> {
    let mut flattened = Vec::new();

    for year in years {
        for semester in &year.semesters {
            for module in &semester.semester_modules {
                for course in &module.module_courses {
                    for grade_type in &course.course_grades_type {
                        let base = FlattenedGrade {
                            year: year.year_name.clone(),
                            semester: semester.semester_name.clone(),
                            module: module.module_name.clone(),
                            course: course.course_name.clone(),
                            grade_type: grade_type.grade_type.clone(),
                            grade_value: None,
                            grade_numeric: None,
                            grade_coef: None,
                            type_coefficient: grade_type.coefficient,
                            status: GradeStatus::Pending,
                        };

                        if grade_type.grades.is_empty() {
                            flattened.push(base);
                            continue;
                        }

                        for entry in &grade_type.grades {
                            let grade_numeric = parse_grade(&entry.grade);
                            flattened.push(FlattenedGrade {
                                grade_value: entry.grade_text(),
                                grade_numeric,
                                grade_coef: entry.coef_text(),
                                status: if grade_numeric.is_some() {
                                    GradeStatus::Numeric
                                } else {
                                    GradeStatus::Status
                                },
                                ..base.clone()
                            });
                        }
                    }
                }
            }
        }
    }

    flattened
}

/// Compute the filter option lists for a set of rows.
///
/// Each list holds the distinct non-empty values, sorted.
#[must_use]
pub fn derive_meta(rows: &[FlattenedGrade], last_updated: Option<String>) -> Meta {
    fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
        values
            .filter(|v| !v.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    Meta {
        last_updated,
        filters: MetaFilters {
            years: distinct(rows.iter().map(|r| &r.year)),
            semesters: distinct(rows.iter().map(|r| &r.semester)),
            modules: distinct(rows.iter().map(|r| &r.module)),
        },
    }
}
