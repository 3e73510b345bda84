//! Data model for grade records.
//!
//! Two shapes exist side by side:
//!
//! - The nested grades document ([`YearRecord`] and friends) as stored by the
//!   backend: years contain semesters, modules, courses and grade types.
//! - The flattened form ([`FlattenedGrade`]) served by `/api/grades`, one row
//!   per `(module, course, grade_type)` observation, which every filter,
//!   grouping and rendering step works on.
//!
//! [`flatten_grades`] turns the former into the latter, and [`derive_meta`]
//! computes the filter option lists served by `/api/meta`.

mod grade;
mod nested;
mod response;

pub use grade::*;
pub use nested::*;
pub use response::*;
