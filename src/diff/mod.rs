//! New-grade detection between two snapshots of the grades document.
//!
//! A grade is identified by `(course, grade type, value, coefficient)`.
//! Anything present in the new snapshot and absent from the old one is
//! reported, which also catches a grade whose value was corrected.
//!
//! # Example
//!
//! ```ignore
//! use grades_dashboard::diff::find_new_grades;
//! use grades_dashboard::source::load_years;
//!
//! let old = load_years(Path::new("grades_old.json"))?;
//! let new = load_years(Path::new("grades.json"))?;
//! for grade in find_new_grades(&old, &new) {
//!     println!("{}: {}", grade.title, grade.details);
//! }
//! ```

use crate::model::YearRecord;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Status word that never counts as a new grade.
const VALIDATED: &str = "Validé";

/// A grade that appeared since the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGrade {
    /// `"<course> - <grade type>"`, with the course cut at its first `/`
    pub title: String,
    /// `"<value> - <coef>%"`
    pub details: String,
    pub course: String,
    pub grade_type: String,
    pub value: String,
    pub coef: String,
}

impl NewGrade {
    fn from_key(key: GradeKey) -> Self {
        let short_course = key.course.split('/').next().unwrap_or_default().trim();
        Self {
            title: format!("{short_course} - {}", key.grade_type),
            details: format!("{} - {}%", key.value, key.coef),
            course: key.course,
            grade_type: key.grade_type,
            value: key.value,
            coef: key.coef,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GradeKey {
    course: String,
    grade_type: String,
    value: String,
    coef: String,
}

/// Collect the identifying tuple of every recorded grade, in document order.
///
/// Empty values and the `Validé` status are skipped.
fn extract_grades(years: &[YearRecord]) -> IndexSet<GradeKey> {
    let mut grades = IndexSet::new();

    for year in years {
        for semester in &year.semesters {
            for module in &semester.semester_modules {
                for course in &module.module_courses {
                    for grade_type in &course.course_grades_type {
                        for entry in &grade_type.grades {
                            let Some(value) = entry.grade_text() else {
                                continue;
                            };
                            if value.is_empty() || value == VALIDATED {
                                continue;
                            }
                            grades.insert(GradeKey {
                                course: course.course_name.clone(),
                                grade_type: grade_type.grade_type.clone(),
                                value,
                                coef: entry.coef_text().unwrap_or_default(),
                            });
                        }
                    }
                }
            }
        }
    }

    grades
}

/// Grades present in `new` but not in `old`, in the order they appear in
/// `new`. Duplicates are reported once.
#[must_use]
pub fn find_new_grades(old: &[YearRecord], new: &[YearRecord]) -> Vec<NewGrade> {
    let old_grades: HashSet<GradeKey> = extract_grades(old).into_iter().collect();

    let new_grades: Vec<NewGrade> = extract_grades(new)
        .into_iter()
        .filter(|key| !old_grades.contains(key))
        .map(NewGrade::from_key)
        .collect();

    tracing::debug!("Found {} new grade(s)", new_grades.len());
    new_grades
}
