//! Dashboard application state.
//!
//! `DashboardApp` owns everything the UI draws: load state, the filter
//! inputs, the grouped table and the cursor. Filtering and grouping are
//! recomputed synchronously whenever an input changes.

use super::constants::STATUS_MESSAGE_SECS;
use super::state::{TableCursor, TableLine};
use super::status::StatusMessage;
use super::theme::{set_theme, Theme};
use crate::config::TuiPreferences;
use crate::model::{FlattenedGrade, GradeSet, Meta};
use crate::palette::ThemeName;
use crate::table::{filter_rows, group_rows, CourseRow, GradeFilters, GradeTable, ModuleGroup};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Shown while the first load is in flight.
pub const LOADING_MESSAGE: &str = "Loading grades...";
/// Shown when the filters leave nothing to display.
pub const EMPTY_MESSAGE: &str = "No grades match the current filters.";

/// Where the dashboard's data stands.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    /// Load failed; the message is shown verbatim
    Failed(String),
    Ready(GradeSet),
}

/// Which selector a key cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Year,
    Semester,
    Module,
}

impl FilterField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Semester => "Semester",
            Self::Module => "Module",
        }
    }
}

/// A selector over a fixed option list. `None` is "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceFilter {
    options: Vec<String>,
    index: Option<usize>,
}

impl ChoiceFilter {
    /// Value fed to the row filter; empty for "All".
    pub fn value(&self) -> &str {
        self.index
            .and_then(|i| self.options.get(i))
            .map_or("", String::as_str)
    }

    /// Label for the filter bar.
    pub fn display(&self) -> &str {
        match self.value() {
            "" => "All",
            value => value,
        }
    }

    pub fn is_all(&self) -> bool {
        self.index.is_none()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// All -> first -> ... -> last -> All
    pub fn cycle_next(&mut self) {
        self.index = match self.index {
            None if self.options.is_empty() => None,
            None => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            Some(_) => None,
        };
    }

    /// All -> last -> ... -> first -> All
    pub fn cycle_prev(&mut self) {
        self.index = match self.index {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Select an exact option; returns false (and selects All) when it is
    /// not one of the options.
    pub fn select(&mut self, value: &str) -> bool {
        self.index = self.options.iter().position(|o| o == value);
        self.index.is_some() || value.is_empty()
    }

    /// Replace the option list, keeping the current value when still offered.
    pub fn set_options(&mut self, options: Vec<String>) {
        let current = self.value().to_string();
        self.options = options;
        self.index = self.options.iter().position(|o| *o == current);
    }
}

/// Main application state for the grades dashboard.
#[derive(Debug)]
pub struct DashboardApp {
    /// API base URL or grades file, shown in the header
    pub source_label: String,
    pub load_state: LoadState,
    /// Search text, applied live
    pub search: String,
    pub search_active: bool,
    pub year: ChoiceFilter,
    pub semester: ChoiceFilter,
    pub module: ChoiceFilter,
    /// Grouped view of the filtered rows
    pub table: GradeTable,
    /// Number of rows left after filtering
    pub filtered_count: usize,
    /// Visible rows, module headers included, and the selected one
    pub cursor: TableCursor,
    /// Module names whose courses are hidden
    pub collapsed: HashSet<String>,
    /// Grade-type column under the cell cursor
    pub column: usize,
    pub theme: ThemeName,
    pub status: StatusMessage,
    pub show_help: bool,
    pub should_quit: bool,
    /// Set when the user asks for a reload; the event loop picks it up
    pub reload_requested: bool,
    pub tick: u64,
    /// Filters to apply once option lists are known
    pending_filters: Option<GradeFilters>,
    /// Where the theme preference is written; None disables saving
    preferences_path: Option<PathBuf>,
}

impl DashboardApp {
    /// Create a dashboard in the loading state.
    pub fn new(source_label: impl Into<String>, filters: GradeFilters, theme: ThemeName) -> Self {
        set_theme(Theme::from_name(theme));
        Self {
            source_label: source_label.into(),
            load_state: LoadState::Loading,
            search: filters.search.clone(),
            search_active: false,
            year: ChoiceFilter::default(),
            semester: ChoiceFilter::default(),
            module: ChoiceFilter::default(),
            table: GradeTable::default(),
            filtered_count: 0,
            cursor: TableCursor::default(),
            collapsed: HashSet::new(),
            column: 0,
            theme,
            status: StatusMessage::with_auto_clear(Duration::from_secs(STATUS_MESSAGE_SECS)),
            show_help: false,
            should_quit: false,
            reload_requested: false,
            tick: 0,
            pending_filters: Some(filters),
            preferences_path: TuiPreferences::config_path(),
        }
    }

    /// Save theme changes to `path` instead of the default location.
    #[must_use]
    pub fn with_preferences_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences_path = path;
        self
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Apply the result of a background load.
    pub fn set_loaded(&mut self, result: Result<GradeSet, String>) {
        match result {
            Ok(set) => {
                self.apply_meta(&set.meta);
                self.load_state = LoadState::Ready(set);
                self.recompute();
            }
            Err(message) => {
                tracing::debug!("Load failed: {message}");
                self.load_state = LoadState::Failed(message);
                self.table = GradeTable::default();
                self.filtered_count = 0;
                self.rebuild_lines();
            }
        }
    }

    /// Go back to loading and ask the event loop for a fresh load.
    pub fn request_reload(&mut self) {
        if matches!(self.load_state, LoadState::Loading) {
            return;
        }
        self.load_state = LoadState::Loading;
        self.reload_requested = true;
    }

    fn apply_meta(&mut self, meta: &Meta) {
        self.year.set_options(meta.filters.years.clone());
        self.semester.set_options(meta.filters.semesters.clone());
        self.module.set_options(meta.filters.modules.clone());

        if let Some(initial) = self.pending_filters.take() {
            let mut unknown = Vec::new();
            for (field, value) in [
                (FilterField::Year, &initial.year),
                (FilterField::Semester, &initial.semester),
                (FilterField::Module, &initial.module),
            ] {
                if !self.choice_mut(field).select(value) {
                    unknown.push(format!("{} '{value}'", field.label().to_lowercase()));
                }
            }
            if !unknown.is_empty() {
                self.status
                    .set(format!("Unknown {}, showing all", unknown.join(", ")));
            }
        }
    }

    /// Meta of the loaded grades, if any.
    pub fn meta(&self) -> Option<&Meta> {
        match &self.load_state {
            LoadState::Ready(set) => Some(&set.meta),
            _ => None,
        }
    }

    /// Message to draw instead of the table, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Loading => Some(LOADING_MESSAGE),
            LoadState::Failed(message) => Some(message),
            LoadState::Ready(_) if self.table.is_empty() => Some(EMPTY_MESSAGE),
            LoadState::Ready(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Current filter criteria.
    pub fn filters(&self) -> GradeFilters {
        GradeFilters {
            search: self.search.clone(),
            year: self.year.value().to_string(),
            semester: self.semester.value().to_string(),
            module: self.module.value().to_string(),
        }
    }

    /// Re-run filter and grouping over the loaded rows.
    pub fn recompute(&mut self) {
        let LoadState::Ready(set) = &self.load_state else {
            return;
        };
        let rows = filter_rows(&set.rows, &self.filters());
        self.filtered_count = rows.len();
        self.table = group_rows(&rows);
        self.rebuild_lines();
        self.column = self
            .column
            .min(self.table.grade_types.len().saturating_sub(1));
    }

    fn rebuild_lines(&mut self) {
        let mut lines = Vec::new();
        for (index, group) in self.table.module_groups.iter().enumerate() {
            lines.push(TableLine::Module(index));
            if self.collapsed.contains(&group.module_name) {
                continue;
            }
            lines.extend(
                (0..group.courses.len()).map(|course| TableLine::Course {
                    module: index,
                    course,
                }),
            );
        }
        self.cursor.replace_lines(lines);
    }

    fn choice_mut(&mut self, field: FilterField) -> &mut ChoiceFilter {
        match field {
            FilterField::Year => &mut self.year,
            FilterField::Semester => &mut self.semester,
            FilterField::Module => &mut self.module,
        }
    }

    pub fn cycle_filter(&mut self, field: FilterField, forward: bool) {
        let choice = self.choice_mut(field);
        if forward {
            choice.cycle_next();
        } else {
            choice.cycle_prev();
        }
        self.recompute();
    }

    /// Reset search and every selector to "All".
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.year.reset();
        self.semester.reset();
        self.module.reset();
        self.recompute();
        self.status.set("Filters cleared");
    }

    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    pub fn stop_search(&mut self) {
        self.search_active = false;
    }

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.recompute();
    }

    pub fn search_pop(&mut self) {
        if self.search.pop().is_some() {
            self.recompute();
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_line(&self) -> Option<TableLine> {
        self.cursor.current()
    }

    /// Module group under the cursor (for course rows, their module).
    pub fn selected_group(&self) -> Option<&ModuleGroup> {
        self.table.module_groups.get(self.selected_line()?.module())
    }

    pub fn selected_course(&self) -> Option<&CourseRow> {
        match self.selected_line()? {
            TableLine::Course { module, course } => {
                self.table.module_groups.get(module)?.courses.get(course)
            }
            TableLine::Module(_) => None,
        }
    }

    /// Grade type of the column under the cell cursor.
    pub fn selected_grade_type(&self) -> Option<&str> {
        self.table.grade_types.get(self.column).map(String::as_str)
    }

    /// Grade under the cell cursor.
    pub fn selected_cell(&self) -> Option<&FlattenedGrade> {
        self.selected_course()?.grade(self.selected_grade_type()?)
    }

    pub fn cell_left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub fn cell_right(&mut self) {
        if self.column + 1 < self.table.grade_types.len() {
            self.column += 1;
        }
    }

    /// Fold or unfold the module under the cursor. Folding from a course
    /// row leaves the cursor on the module header.
    pub fn toggle_selected_module(&mut self) {
        let Some(name) = self.selected_group().map(|g| g.module_name.clone()) else {
            return;
        };

        if !self.collapsed.remove(&name) {
            self.collapsed.insert(name);
        }
        self.rebuild_lines();
    }

    // ------------------------------------------------------------------
    // Theme / misc
    // ------------------------------------------------------------------

    /// Switch theme and persist the choice.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        set_theme(Theme::from_name(self.theme));

        let prefs = TuiPreferences {
            theme: Some(self.theme),
        };
        let saved = match &self.preferences_path {
            Some(path) => prefs.save_to(path),
            None => Ok(()),
        };
        match saved {
            Ok(()) => self.status.set(format!("Theme: {}", self.theme)),
            Err(e) => {
                tracing::debug!("Failed to save theme preference: {e}");
                self.status
                    .set(format!("Theme: {} (not saved: {e})", self.theme));
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.status.expire();
    }
}
