//! Terminal setup and rendering for the dashboard.

use super::app::{DashboardApp, LoadState};
use super::constants::{COURSE_COLUMN_WIDTH, MAX_GRADE_COLUMN_WIDTH, MIN_GRADE_COLUMN_WIDTH};
use super::events::{handle_key_event, spawn_load, Event, EventHandler};
use super::state::TableLine;
use super::theme::{colors, filter_badge, render_footer_hints, theme_badge, FooterHints, Styles};
use super::widgets::{
    self, fits_terminal, grade_cell_style, render_size_warning, render_table_notice, truncate_str,
};
use crate::model::GradeStatus;
use crate::source::GradeSource;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use std::io::{self, stdout};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

/// Missing grade cell.
const MISSING_CELL: &str = "—";

/// Run the dashboard until the user quits.
///
/// The first load starts immediately on a worker thread; the table shows a
/// loading message until it reports back.
pub fn run_dashboard_tui(
    app: &mut DashboardApp,
    source: Arc<dyn GradeSource>,
    tick_rate_ms: u64,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, &source, tick_rate_ms);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DashboardApp,
    source: &Arc<dyn GradeSource>,
    tick_rate_ms: u64,
) -> io::Result<()> {
    let events = EventHandler::new(tick_rate_ms);
    let mut table_state = TableState::default();
    spawn_load(Arc::clone(source), events.sender());

    loop {
        terminal.draw(|frame| render(frame, app, &mut table_state))?;

        match events.next()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Loaded(result) => app.set_loaded(result),
            Event::Resize(_, _) => {}
            Event::Tick => app.on_tick(),
        }

        if app.reload_requested {
            app.reload_requested = false;
            tracing::debug!("Reloading grades from {}", source.describe());
            spawn_load(Arc::clone(source), events.sender());
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Main render function.
fn render(frame: &mut Frame, app: &DashboardApp, table_state: &mut TableState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors().background)),
        area,
    );

    if !fits_terminal(area) {
        render_size_warning(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Filter bar
            Constraint::Min(8),    // Table
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_filter_bar(frame, chunks[1], app);
    render_table(frame, chunks[2], app, table_state);
    render_status_bar(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let last_update = app
        .meta()
        .map_or_else(|| "Unknown".to_string(), |m| m.last_updated_display());

    let left = Line::from(vec![
        Span::styled("Grades Dashboard", Styles::header_title()),
        Span::styled(" │ ", Styles::label()),
        Span::styled("Last update: ", Styles::text_muted()),
        Span::styled(last_update, Styles::text()),
        Span::styled(" │ ", Styles::label()),
        Span::styled(
            truncate_str(&app.source_label, usize::from(area.width / 3)),
            Styles::text_muted(),
        ),
    ]);
    frame.render_widget(Paragraph::new(left), area);

    let badge = Line::from(theme_badge(app.theme));
    frame.render_widget(Paragraph::new(badge).alignment(Alignment::Right), area);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let scheme = colors();
    let search_text = if app.search_active {
        format!("{}▏", app.search)
    } else if app.search.is_empty() {
        "press / to search".to_string()
    } else {
        app.search.clone()
    };
    let search_style = if app.search.is_empty() && !app.search_active {
        Style::default().fg(scheme.muted).italic()
    } else {
        Style::default().fg(scheme.text).bold()
    };

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(scheme.text_muted)),
        Span::styled(search_text, search_style),
    ];
    for (label, choice) in [
        ("Year", &app.year),
        ("Semester", &app.semester),
        ("Module", &app.module),
    ] {
        spans.push(Span::styled("  ", Style::default()));
        spans.extend(filter_badge(label, choice.display(), !choice.is_all()));
    }

    let border = if app.search_active {
        Styles::border_focused()
    } else {
        Styles::border()
    };
    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(bar, area);
}

/// Width of each grade-type column.
fn grade_column_width(grade_type: &str) -> u16 {
    let width = u16::try_from(grade_type.width()).unwrap_or(MAX_GRADE_COLUMN_WIDTH);
    width
        .saturating_add(2)
        .clamp(MIN_GRADE_COLUMN_WIDTH, MAX_GRADE_COLUMN_WIDTH)
}

/// First grade-type column to draw so that the cell cursor stays visible.
fn first_visible_column(widths: &[u16], cursor: usize, available: u16) -> usize {
    let mut first = 0;
    while first < cursor {
        let used: u16 = widths[first..=cursor].iter().map(|w| w + 1).sum();
        if used <= available {
            break;
        }
        first += 1;
    }
    first
}

fn render_table(frame: &mut Frame, area: Rect, app: &DashboardApp, table_state: &mut TableState) {
    if let Some(message) = app.placeholder() {
        render_table_notice(frame, area, &app.load_state, message, app.tick);
        return;
    }

    let grade_types = &app.table.grade_types;
    let widths: Vec<u16> = grade_types.iter().map(|t| grade_column_width(t)).collect();
    let available = area.width.saturating_sub(COURSE_COLUMN_WIDTH + 3);
    let first = first_visible_column(&widths, app.column, available);
    let mut last = first;
    let mut used = 0;
    while last < widths.len() && used + widths[last] + 1 <= available {
        used += widths[last] + 1;
        last += 1;
    }
    let visible = first..last.max(first + 1).min(grade_types.len());

    let scheme = colors();
    let header = Row::new(
        std::iter::once(Cell::from("Course"))
            .chain(grade_types[visible.clone()].iter().enumerate().map(|(i, t)| {
                let style = if first + i == app.column {
                    Style::default().fg(scheme.accent).bold()
                } else {
                    Style::default().fg(scheme.primary).bold()
                };
                Cell::from(t.as_str()).style(style)
            })),
    )
    .style(Style::default().bg(scheme.background_alt));

    let selected = app.cursor.position();
    let rows: Vec<Row> = app
        .cursor
        .lines()
        .iter()
        .enumerate()
        .filter_map(|(pos, line)| match *line {
            TableLine::Module(index) => {
                let group = app.table.module_groups.get(index)?;
                let marker = if app.collapsed.contains(&group.module_name) {
                    "▶"
                } else {
                    "▼"
                };
                let label = format!("{marker} {} ({})", group.module_name, group.courses.len());
                Some(Row::new(vec![Cell::from(label)]).style(Styles::module_header()))
            }
            TableLine::Course { module, course } => {
                let row = app.table.module_groups.get(module)?.courses.get(course)?;
                let mut cells = vec![Cell::from(format!(
                    "  {}",
                    truncate_str(&row.course, usize::from(COURSE_COLUMN_WIDTH) - 2)
                ))
                .style(Styles::text())];
                for (i, grade_type) in grade_types[visible.clone()].iter().enumerate() {
                    let cell = match row.grade(grade_type) {
                        Some(grade) => {
                            let mut style = grade_cell_style(grade.grade_numeric, app.theme);
                            if grade.status == GradeStatus::Pending {
                                style = style.fg(scheme.muted).italic();
                            }
                            Cell::from(grade.display_value().to_string()).style(style)
                        }
                        None => Cell::from(MISSING_CELL).style(Style::default().fg(scheme.muted)),
                    };
                    let cell = if pos == selected && first + i == app.column {
                        cell.reversed()
                    } else {
                        cell
                    };
                    cells.push(cell);
                }
                Some(Row::new(cells))
            }
        })
        .collect();

    let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(COURSE_COLUMN_WIDTH))
        .chain(widths[visible].iter().map(|w| Constraint::Length(*w)))
        .collect();

    let title = format!(
        " Grades ({} courses, {} rows) ",
        app.table.course_count(),
        app.filtered_count
    );
    let table = Table::new(rows, constraints)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Styles::border()),
        )
        .style(Style::default().bg(scheme.background))
        .row_highlight_style(Styles::selected());

    table_state.select(Some(selected));
    frame.render_stateful_widget(table, area, table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let scheme = colors();
    let line = if let Some(msg) = app.status.peek() {
        Line::from(vec![
            Span::styled(" ℹ ", Style::default().fg(scheme.accent)),
            Span::styled(msg.to_string(), Style::default().fg(scheme.accent).bold()),
        ])
    } else if let (Some(course), Some(grade)) = (app.selected_course(), app.selected_cell()) {
        Line::from(vec![
            Span::styled(format!(" {} ", course.course), Styles::text()),
            Span::styled("│ ", Styles::label()),
            Span::styled(format!("{}: ", grade.grade_type), Styles::text_muted()),
            Span::styled(grade.display_value().to_string(), Styles::text()),
            Span::styled(" │ ", Styles::label()),
            Span::styled(grade.coefficient_summary(), Styles::text_muted()),
        ])
    } else if let Some(group) = app.selected_group() {
        let stats = app.table.stats();
        Line::from(vec![
            Span::styled(format!(" {} ", group.module_name), Styles::text()),
            Span::styled("│ ", Styles::label()),
            Span::styled(
                format!(
                    "Courses: {} │ Graded: {} │ Pending: {}",
                    stats.courses, stats.graded, stats.pending
                ),
                Styles::text_muted(),
            ),
            Span::styled(
                stats
                    .mean
                    .map(|m| format!(" │ Mean: {m:.2}"))
                    .unwrap_or_default(),
                Styles::text_muted(),
            ),
        ])
    } else if let LoadState::Failed(_) = app.load_state {
        Line::from(Span::styled(" Load failed", Styles::error()))
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line).style(Styles::status_bar()), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let hints = if app.search_active {
        FooterHints::search()
    } else {
        FooterHints::table()
    };
    let footer = Paragraph::new(Line::from(render_footer_hints(&hints)))
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors().text_muted));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let scheme = colors();
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<16}"), Style::default().fg(scheme.accent)),
            Span::styled(desc, Style::default().fg(scheme.text)),
        ])
    };
    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(scheme.primary).bold()))
    };

    let lines = vec![
        section("Navigation"),
        entry("↑/↓ or j/k", "Move between rows"),
        entry("PgUp/PgDn", "Move by a page"),
        entry("Home/End g/G", "First / last row"),
        entry("[ / ]", "Previous / next module"),
        entry("←/→ or h/l", "Move the cell cursor"),
        entry("Enter/Space", "Fold or unfold a module"),
        Line::from(""),
        section("Filters"),
        entry("/", "Search courses, modules, grade types"),
        entry("Esc/Enter", "Leave the search box"),
        entry("y / Y", "Next / previous year"),
        entry("s / S", "Next / previous semester"),
        entry("m / M", "Next / previous module"),
        entry("x", "Clear all filters"),
        Line::from(""),
        section("General"),
        entry("r", "Reload grades"),
        entry("T", "Toggle light / dark theme"),
        entry("?", "Toggle this help"),
        entry("q / Ctrl-C", "Quit"),
    ];

    widgets::render_popup(frame, area, "Help", lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_column_width_bounds() {
        assert_eq!(grade_column_width("TP"), MIN_GRADE_COLUMN_WIDTH);
        assert_eq!(grade_column_width("Contrôle continu"), 18);
        assert_eq!(
            grade_column_width("A very long assessment name"),
            MAX_GRADE_COLUMN_WIDTH
        );
    }

    #[test]
    fn test_grade_column_width_saturates_on_huge_headers() {
        let huge = "x".repeat(usize::from(u16::MAX));
        assert_eq!(grade_column_width(&huge), MAX_GRADE_COLUMN_WIDTH);
        let almost = "x".repeat(usize::from(u16::MAX) - 1);
        assert_eq!(grade_column_width(&almost), MAX_GRADE_COLUMN_WIDTH);
    }

    #[test]
    fn test_first_visible_column_keeps_cursor_in_view() {
        let widths = [10, 10, 10, 10];
        assert_eq!(first_visible_column(&widths, 0, 25), 0);
        assert_eq!(first_visible_column(&widths, 1, 25), 0);
        // 11 + 11 + 11 > 25, so the window slides
        assert_eq!(first_visible_column(&widths, 2, 25), 1);
        assert_eq!(first_visible_column(&widths, 3, 25), 2);
    }

    #[test]
    fn test_render_fits_small_terminal() {
        use crate::table::GradeFilters;
        use crate::palette::ThemeName;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = DashboardApp::new("test", GradeFilters::default(), ThemeName::Dark)
            .with_preferences_path(None);
        let mut state = TableState::default();

        terminal
            .draw(|frame| render(frame, &app, &mut state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_render_loading_message() {
        use crate::table::GradeFilters;
        use crate::palette::ThemeName;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = DashboardApp::new("test", GradeFilters::default(), ThemeName::Dark)
            .with_preferences_path(None);
        let mut state = TableState::default();

        terminal
            .draw(|frame| render(frame, &app, &mut state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Loading grades..."));
        assert!(text.contains("Last update: Unknown"));
    }
}
