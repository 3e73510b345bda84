//! Named constants for TUI layout and navigation.

/// Number of rows to scroll per page-up/page-down action.
pub(crate) const PAGE_SIZE: usize = 10;

/// Width of the module/course column.
pub(crate) const COURSE_COLUMN_WIDTH: u16 = 32;

/// Narrowest grade-type column; wider headers widen their column.
pub(crate) const MIN_GRADE_COLUMN_WIDTH: u16 = 9;

/// Widest grade-type column.
pub(crate) const MAX_GRADE_COLUMN_WIDTH: u16 = 18;

/// How long transient status messages stay in the status bar.
pub(crate) const STATUS_MESSAGE_SECS: u64 = 4;
