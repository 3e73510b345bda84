//! Local grades document.

use super::GradeSource;
use crate::error::{GradesError, Result, SourceErrorKind};
use crate::model::{derive_meta, flatten_grades, GradeSet, YearRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Reads the nested grades document from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the file as an RFC 3339 UTC timestamp.
    fn modified_at(&self) -> Option<String> {
        let modified = std::fs::metadata(&self.path).ok()?.modified().ok()?;
        let modified: DateTime<Utc> = modified.into();
        Some(modified.to_rfc3339_opts(SecondsFormat::Micros, false))
    }
}

impl GradeSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<GradeSet> {
        let years = load_years(&self.path)?;
        let rows = flatten_grades(&years);
        tracing::debug!(
            "Flattened {} years into {} rows from {}",
            years.len(),
            rows.len(),
            self.path.display()
        );
        let meta = derive_meta(&rows, self.modified_at());
        Ok(GradeSet { rows, meta })
    }
}

/// Read and decode a nested grades document.
///
/// The top level must be a JSON list of years.
pub fn load_years(path: &Path) -> Result<Vec<YearRecord>> {
    let context = || format!("loading {}", path.display());

    if !path.exists() {
        return Err(GradesError::source(
            context(),
            SourceErrorKind::NotFound(path.display().to_string()),
        ));
    }

    let content = std::fs::read_to_string(path).map_err(|e| GradesError::io(path, e))?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        GradesError::source(context(), SourceErrorKind::InvalidJson(e.to_string()))
    })?;

    if !value.is_array() {
        return Err(GradesError::source(
            context(),
            SourceErrorKind::UnexpectedShape,
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        GradesError::source(context(), SourceErrorKind::InvalidJson(e.to_string()))
    })
}
