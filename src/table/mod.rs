//! Row filtering and course/module grouping.
//!
//! Both steps are pure: the same rows and criteria always produce the same
//! table. The dashboard recomputes them on every filter change.
//!
//! ```
//! use grades_dashboard::table::{filter_rows, group_rows, GradeFilters};
//!
//! let rows = Vec::new();
//! let filters = GradeFilters::default().with_search("calc");
//! let table = group_rows(&filter_rows(&rows, &filters));
//! assert!(table.is_empty());
//! ```

mod filter;
mod group;

pub use filter::{filter_rows, GradeFilters};
pub use group::{group_rows, CourseRow, GradeTable, ModuleGroup, TableStats};
