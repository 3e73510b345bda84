//! Grade sources.
//!
//! A [`GradeSource`] produces the flattened rows and their filter metadata.
//! Two implementations exist:
//!
//! - [`ApiClient`] talks to a running backend over HTTP (`http` feature).
//! - [`FileSource`] reads the nested grades document from disk and flattens
//!   it locally, so the dashboard also works without a backend.

#[cfg(feature = "http")]
mod api;
mod file;

#[cfg(feature = "http")]
pub use api::{ApiClient, ApiClientConfig};
pub use file::{load_years, FileSource};

use crate::error::Result;
use crate::model::GradeSet;

/// Trait for anything that can load a [`GradeSet`].
///
/// # Example
///
/// ```ignore
/// use grades_dashboard::source::{FileSource, GradeSource};
///
/// let source: Box<dyn GradeSource> = Box::new(FileSource::new("grades.json"));
/// let set = source.load()?;
/// println!("{} rows from {}", set.rows.len(), source.describe());
/// ```
pub trait GradeSource: Send + Sync {
    /// Short description for logs and the dashboard header.
    fn describe(&self) -> String;

    /// Load every row plus metadata. Either everything loads or nothing does.
    fn load(&self) -> Result<GradeSet>;
}

impl<S: GradeSource + ?Sized> GradeSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load(&self) -> Result<GradeSet> {
        (**self).load()
    }
}
