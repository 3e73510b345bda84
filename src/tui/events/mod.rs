//! Event handling for the dashboard.
//!
//! A background thread polls crossterm and forwards key, resize and tick
//! events over a channel. Grade loads run on their own thread and report
//! back through the same channel as [`Event::Loaded`].

use super::app::{DashboardApp, FilterField};
use crate::model::GradeSet;
use crate::source::GradeSource;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Dashboard events.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    /// Result of a background load; errors carry the user-facing message
    Loaded(Result<GradeSet, String>),
}

/// Event handler.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
}

impl EventHandler {
    /// Start polling the terminal, emitting a tick every `tick_rate_ms`.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        let event_tx = tx.clone();
        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => event_tx.send(Event::Key(key)),
                    Ok(CrosstermEvent::Resize(w, h)) => event_tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            } else if event_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Sender for producers other than the terminal poller.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}

/// Load grades on a worker thread and post the result as [`Event::Loaded`].
pub fn spawn_load(source: Arc<dyn GradeSource>, tx: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let result = source.load().map_err(|e| e.user_message());
        if let Err(e) = &result {
            tracing::debug!("Loading from {} failed: {e}", source.describe());
        }
        // The receiver is gone once the dashboard has exited.
        let _ = tx.send(Event::Loaded(result));
    });
}

/// Handle key events and update app state
pub fn handle_key_event(app: &mut DashboardApp, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter
        ) {
            app.toggle_help();
        }
        return;
    }

    if app.search_active {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => app.stop_search(),
            KeyCode::Backspace => app.search_pop(),
            KeyCode::Char(c) => app.search_push(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('y') => app.cycle_filter(FilterField::Year, true),
        KeyCode::Char('Y') => app.cycle_filter(FilterField::Year, false),
        KeyCode::Char('s') => app.cycle_filter(FilterField::Semester, true),
        KeyCode::Char('S') => app.cycle_filter(FilterField::Semester, false),
        KeyCode::Char('m') => app.cycle_filter(FilterField::Module, true),
        KeyCode::Char('M') => app.cycle_filter(FilterField::Module, false),
        KeyCode::Char('x') => app.clear_filters(),
        KeyCode::Char('T') => app.toggle_theme(),
        KeyCode::Char('r') => app.request_reload(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor.up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor.down(),
        KeyCode::PageUp => app.cursor.page_up(),
        KeyCode::PageDown => app.cursor.page_down(),
        KeyCode::Home | KeyCode::Char('g') => app.cursor.first(),
        KeyCode::End | KeyCode::Char('G') => app.cursor.last(),
        KeyCode::Char('[') => app.cursor.prev_module(),
        KeyCode::Char(']') => app.cursor.next_module(),
        KeyCode::Left | KeyCode::Char('h') => app.cell_left(),
        KeyCode::Right | KeyCode::Char('l') => app.cell_right(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_module(),
        _ => {}
    }
}
