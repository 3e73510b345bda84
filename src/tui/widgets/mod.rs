//! Rendering helpers for the dashboard: grade cell styles, the notices
//! drawn in place of the table, and the help popup.

use super::app::LoadState;
use crate::palette::{grade_color, Rgb, ThemeName};
use crate::tui::theme::colors;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Smallest terminal the dashboard lays out in.
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Cell style for a grade under `theme`; neutral grades use the plain text color.
pub fn grade_cell_style(grade: Option<f64>, theme: ThemeName) -> Style {
    let (background, foreground) = grade_color(grade, theme).resolve(theme);
    let mut style = Style::default().fg(colors().text);
    if let Some(bg) = background {
        style = style.bg(to_color(bg));
    }
    if let Some(fg) = foreground {
        style = style.fg(to_color(fg)).bold();
    }
    style
}

/// Draw the notice that replaces the table while loading, after a failed
/// load, or when the filters leave no rows.
pub fn render_table_notice(
    frame: &mut Frame,
    area: Rect,
    state: &LoadState,
    message: &str,
    tick: u64,
) {
    let scheme = colors();
    let muted = Style::default().fg(scheme.text_muted);

    let (lines, border) = match state {
        LoadState::Loading => {
            let spinner = SPINNER[(tick / 2) as usize % SPINNER.len()];
            let lines = vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!(" {spinner} "), Style::default().fg(scheme.primary)),
                    Span::styled(message.to_string(), Style::default().fg(scheme.text)),
                ]),
            ];
            (lines, scheme.border)
        }
        LoadState::Failed(_) => {
            let error = Style::default().fg(scheme.error).bold();
            let lines = vec![
                Line::from(""),
                Line::styled(" ✗ Could not load grades", error),
                Line::from(""),
                Line::styled(message.to_string(), Style::default().fg(scheme.text)),
                Line::from(""),
                Line::styled("Press [r] to retry or [q] to quit", muted),
            ];
            (lines, scheme.error)
        }
        LoadState::Ready(_) => {
            let lines = vec![
                Line::from(""),
                Line::styled(message.to_string(), muted),
                Line::from(""),
                Line::styled("Press [x] to clear filters", muted.italic()),
            ];
            (lines, scheme.border)
        }
    };

    let notice = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, area);
}

/// Rectangle of at most `width` x `height` centered in `area`.
pub fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw `content` in a bordered popup sized to fit it.
pub fn render_popup(frame: &mut Frame, area: Rect, title: &str, content: Vec<Line<'static>>) {
    let accent = colors().accent;
    let inner_width = content.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(inner_width + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(content.len() + 2).unwrap_or(u16::MAX);
    let popup_area = centered(width, height, area);

    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .title_style(Style::default().fg(accent).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        )
        .style(Style::default().bg(colors().background));
    frame.render_widget(popup, popup_area);
}

/// Whether the dashboard layout fits in `area`.
pub const fn fits_terminal(area: Rect) -> bool {
    area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
}

pub fn render_size_warning(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            "Terminal too small",
            Style::default().fg(colors().warning).bold(),
        ),
        Line::from(format!(
            "{}x{}, need at least {MIN_WIDTH}x{MIN_HEIGHT}",
            area.width, area.height
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors().text_muted));
    frame.render_widget(paragraph, centered(area.width, 2, area));
}

/// Cut `s` to `max_width` display columns, ending with `…` when shortened.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w >= max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}
