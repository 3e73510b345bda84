//! Unified error types for grades-dashboard.
//!
//! Loading grades is the only fallible part of the data path: filtering,
//! grouping and color mapping are total. The hierarchy below keeps enough
//! context to show the user a single verbatim message.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for grades-dashboard operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GradesError {
    /// Errors while talking to the grades API
    #[error("{context}: {source}")]
    Fetch {
        context: String,
        #[source]
        source: FetchErrorKind,
    },

    /// Errors while reading a local grades document
    #[error("{context}: {source}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors while rendering a report
    #[error("Report generation failed: {0}")]
    Report(String),

    /// Errors while delivering notifications
    #[error("Notification failed: {context}")]
    Notify { context: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific fetch error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchErrorKind {
    /// The endpoint answered with a non-2xx status
    #[error("{endpoint} API failed: {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Specific grades-document error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("Grades file not found: {0}")]
    NotFound(String),

    #[error("Invalid JSON in grades file: {0}")]
    InvalidJson(String),

    #[error("Unexpected grades payload shape: expected top-level list")]
    UnexpectedShape,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for grades-dashboard operations
pub type Result<T> = std::result::Result<T, GradesError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl GradesError {
    /// Create a fetch error with context
    pub fn fetch(context: impl Into<String>, source: FetchErrorKind) -> Self {
        Self::Fetch {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error for a non-success HTTP status
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        let endpoint = endpoint.into();
        Self::fetch(
            format!("GET /api/{}", endpoint.to_lowercase()),
            FetchErrorKind::Status { endpoint, status },
        )
    }

    /// Create a grades-document error with context
    pub fn source(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a notification error
    pub fn notify(context: impl Into<String>) -> Self {
        Self::Notify {
            context: context.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The message shown to the user when loading fails.
    ///
    /// Non-2xx statuses surface as `"<Endpoint> API failed: <status>"` and
    /// grades-document problems as their bare kind message, with no context.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch {
                source: source @ FetchErrorKind::Status { .. },
                ..
            } => source.to_string(),
            Self::Source { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for GradesError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GradesError {
    fn from(err: serde_json::Error) -> Self {
        Self::source(
            "JSON deserialization",
            SourceErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<crate::reports::ReportError> for GradesError {
    fn from(err: crate::reports::ReportError) -> Self {
        Self::Report(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outermost-first, so a failure three calls deep
/// reads `"outer: middle: inner"`.
///
/// # Example
///
/// ```ignore
/// use grades_dashboard::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<Vec<YearRecord>> {
///     let content = std::fs::read_to_string(path)
///         .with_context(|| format!("reading {}", path.display()))?;
///     parse_years(&content).context("parsing grades document")
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<GradesError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: GradesError, new_ctx: &str) -> GradesError {
    match err {
        GradesError::Fetch {
            context: existing,
            source,
        } => GradesError::Fetch {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GradesError::Source {
            context: existing,
            source,
        } => GradesError::Source {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GradesError::Notify { context: existing } => GradesError::Notify {
            context: chain_context(new_ctx, &existing),
        },
        GradesError::Io {
            path,
            message,
            source,
        } => GradesError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        GradesError::Report(msg) => GradesError::Report(chain_context(new_ctx, &msg)),
        GradesError::Config(msg) => GradesError::Config(chain_context(new_ctx, &msg)),
        GradesError::Validation(msg) => GradesError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| GradesError::Validation(context.into()))
    }
}
