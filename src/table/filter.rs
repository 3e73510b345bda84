//! Row filter.

use crate::model::FlattenedGrade;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filter criteria. Empty fields act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GradeFilters {
    /// Case-insensitive substring over course, module and grade type
    pub search: String,
    /// Exact year match
    pub year: String,
    /// Exact semester match
    pub semester: String,
    /// Exact module match
    pub module: String,
}

impl GradeFilters {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    #[must_use]
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// True when no criterion restricts the rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.year.is_empty()
            && self.semester.is_empty()
            && self.module.is_empty()
    }

    /// Check a single row against every criterion.
    #[must_use]
    pub fn matches(&self, row: &FlattenedGrade) -> bool {
        self.matcher().matches(row)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            search: self.search.trim().to_lowercase(),
            filters: self,
        }
    }
}

/// Criteria with the search needle normalized once per pass.
struct Matcher<'a> {
    search: String,
    filters: &'a GradeFilters,
}

impl Matcher<'_> {
    fn matches(&self, row: &FlattenedGrade) -> bool {
        let matches_search = self.search.is_empty()
            || row.course.to_lowercase().contains(&self.search)
            || row.module.to_lowercase().contains(&self.search)
            || row.grade_type.to_lowercase().contains(&self.search);

        matches_search
            && exact_or_wildcard(&self.filters.year, &row.year)
            && exact_or_wildcard(&self.filters.semester, &row.semester)
            && exact_or_wildcard(&self.filters.module, &row.module)
    }
}

fn exact_or_wildcard(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted == actual
}

/// Return the rows matching every criterion, in input order.
#[must_use]
pub fn filter_rows(rows: &[FlattenedGrade], filters: &GradeFilters) -> Vec<FlattenedGrade> {
    let matcher = filters.matcher();
    rows.iter().filter(|row| matcher.matches(row)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GradeStatus;

    fn row(year: &str, semester: &str, module: &str, course: &str, grade_type: &str) -> FlattenedGrade {
        FlattenedGrade {
            year: year.to_string(),
            semester: semester.to_string(),
            module: module.to_string(),
            course: course.to_string(),
            grade_type: grade_type.to_string(),
            grade_value: None,
            grade_numeric: None,
            grade_coef: None,
            type_coefficient: None,
            status: GradeStatus::Pending,
        }
    }

    fn sample() -> Vec<FlattenedGrade> {
        vec![
            row("Y1", "S1", "Calculus I", "Limits", "Exam"),
            row("Y1", "S2", "Physics", "Mechanics", "TP"),
            row("Y2", "S1", "Physics", "Optics", "Calculation sheet"),
            row("Y2", "S2", "Algebra", "Matrices", "Exam"),
        ]
    }

    #[test]
    fn test_empty_filters_return_everything_in_order() {
        let rows = sample();
        let filters = GradeFilters::default();
        assert!(filters.is_empty());
        assert_eq!(filter_rows(&rows, &filters), rows);
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let rows = sample();
        let filtered = filter_rows(&rows, &GradeFilters::default().with_search("CALC"));
        let courses: Vec<_> = filtered.iter().map(|r| r.course.as_str()).collect();
        // module "Calculus I" and grade type "Calculation sheet"
        assert_eq!(courses, vec!["Limits", "Optics"]);
    }

    #[test]
    fn test_search_is_trimmed() {
        let rows = sample();
        let filtered = filter_rows(&rows, &GradeFilters::default().with_search("  optics "));
        assert_eq!(filtered.len(), 1);

        let blank = GradeFilters::default().with_search("   ");
        assert!(blank.is_empty());
        assert_eq!(filter_rows(&rows, &blank).len(), rows.len());
    }

    #[test]
    fn test_exact_match_fields() {
        let rows = sample();

        let by_year = filter_rows(&rows, &GradeFilters::default().with_year("Y2"));
        assert_eq!(by_year.len(), 2);

        let by_semester = filter_rows(&rows, &GradeFilters::default().with_semester("S1"));
        assert_eq!(by_semester.len(), 2);

        let by_module = filter_rows(&rows, &GradeFilters::default().with_module("Physics"));
        assert_eq!(by_module.len(), 2);

        // Module matching is exact, not substring
        let partial = filter_rows(&rows, &GradeFilters::default().with_module("Phys"));
        assert!(partial.is_empty());
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let rows = sample();
        let filters = GradeFilters::default()
            .with_year("Y2")
            .with_module("Physics")
            .with_search("opt");
        let filtered = filter_rows(&rows, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].course, "Optics");
        assert!(filters.matches(&filtered[0]));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let rows = sample();
        let filtered = filter_rows(&rows, &GradeFilters::default().with_year("Y9"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = sample();
        let filters = GradeFilters::default().with_search("s").with_semester("S2");
        let once = filter_rows(&rows, &filters);
        let twice = filter_rows(&once, &filters);
        assert_eq!(once, twice);
    }
}
