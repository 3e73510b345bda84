//! Interactive grades dashboard using ratatui.
//!
//! The dashboard loads grades on a worker thread, then lets the user
//! search, narrow by year/semester/module, fold modules and inspect
//! individual cells. Grade cells are colored with the same mapping the
//! table report uses.

mod app;
pub(crate) mod constants;
mod events;
pub mod state;
mod status;
pub mod theme;
mod ui;
pub(crate) mod widgets;

pub use app::{
    ChoiceFilter, DashboardApp, FilterField, LoadState, EMPTY_MESSAGE, LOADING_MESSAGE,
};
pub use events::{handle_key_event, Event, EventHandler};
pub use state::{TableCursor, TableLine};
pub use status::StatusMessage;
pub use theme::{colors, set_theme, ColorScheme, FooterHints, Styles, Theme};
pub use ui::run_dashboard_tui;
