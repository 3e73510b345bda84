//! Centralized theme and color scheme for the dashboard.
//!
//! Both schemes follow the Catppuccin palettes (mocha for dark, latte for
//! light) so the table background matches the base the grade colors are
//! blended over.

use crate::palette::ThemeName;
use ratatui::prelude::*;
use std::sync::{PoisonError, RwLock};

/// Color scheme for the TUI application.
/// Provides semantic colors for different UI elements.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    // UI element colors
    pub primary: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub background_alt: Color,
    pub text: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Status colors
    pub warning: Color,
    pub error: Color,

    // Text on colored badges
    pub badge_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    /// Catppuccin mocha
    pub const fn dark() -> Self {
        Self {
            primary: Color::Rgb(137, 180, 250),
            accent: Color::Rgb(249, 226, 175),
            muted: Color::Rgb(108, 112, 134),
            border: Color::Rgb(69, 71, 90),
            border_focused: Color::Rgb(137, 180, 250),
            background: Color::Rgb(30, 30, 46),
            background_alt: Color::Rgb(24, 24, 37),
            text: Color::Rgb(205, 214, 244),
            text_muted: Color::Rgb(166, 173, 200),
            selection: Color::Rgb(49, 50, 68),

            warning: Color::Rgb(249, 226, 175),
            error: Color::Rgb(243, 139, 168),

            badge_fg: Color::Rgb(17, 17, 27),
        }
    }

    /// Catppuccin latte
    pub const fn light() -> Self {
        Self {
            primary: Color::Rgb(30, 102, 245),
            accent: Color::Rgb(223, 142, 29),
            muted: Color::Rgb(156, 160, 176),
            border: Color::Rgb(188, 192, 204),
            border_focused: Color::Rgb(30, 102, 245),
            background: Color::Rgb(239, 241, 245),
            background_alt: Color::Rgb(230, 233, 239),
            text: Color::Rgb(76, 79, 105),
            text_muted: Color::Rgb(108, 111, 133),
            selection: Color::Rgb(204, 208, 218),

            warning: Color::Rgb(223, 142, 29),
            error: Color::Rgb(210, 15, 57),

            badge_fg: Color::Rgb(220, 224, 232),
        }
    }
}

/// Global theme instance (runtime switchable)
static THEME: RwLock<Theme> = RwLock::new(Theme::dark());

/// Theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ColorScheme,
    pub name: ThemeName,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            colors: ColorScheme::dark(),
            name: ThemeName::Dark,
        }
    }

    pub const fn light() -> Self {
        Self {
            colors: ColorScheme::light(),
            name: ThemeName::Light,
        }
    }

    pub const fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
        }
    }
}

/// Set the current theme
pub fn set_theme(theme: Theme) {
    *THEME.write().unwrap_or_else(PoisonError::into_inner) = theme;
}

/// Convenience function to get current colors
pub fn colors() -> ColorScheme {
    THEME.read().unwrap_or_else(PoisonError::into_inner).colors
}

// ============================================================================
// Style Helpers
// ============================================================================

/// Common style presets for consistent UI elements
pub struct Styles;

impl Styles {
    /// Header title style
    pub fn header_title() -> Style {
        Style::default().fg(colors().primary).bold()
    }

    /// Normal text style
    pub fn text() -> Style {
        Style::default().fg(colors().text)
    }

    /// Muted/secondary text style
    pub fn text_muted() -> Style {
        Style::default().fg(colors().text_muted)
    }

    /// Label text style
    pub fn label() -> Style {
        Style::default().fg(colors().muted)
    }

    /// Module header rows
    pub fn module_header() -> Style {
        Style::default()
            .fg(colors().primary)
            .bg(colors().background_alt)
            .bold()
    }

    /// Selection style (for selected items)
    pub fn selected() -> Style {
        Style::default()
            .bg(colors().selection)
            .fg(colors().text)
            .bold()
    }

    /// Border style (unfocused)
    pub fn border() -> Style {
        Style::default().fg(colors().border)
    }

    /// Border style (focused)
    pub fn border_focused() -> Style {
        Style::default().fg(colors().border_focused)
    }

    /// Status bar background style
    pub fn status_bar() -> Style {
        Style::default().bg(colors().background_alt)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default().fg(colors().accent)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(colors().text_muted)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(colors().error)
    }
}

// ============================================================================
// Badge Rendering Helpers
// ============================================================================

/// Render a filter badge showing current state
pub fn filter_badge(label: &str, value: &str, active: bool) -> Vec<Span<'static>> {
    let scheme = colors();
    let badge_bg = if active { scheme.accent } else { scheme.selection };
    let badge_fg = if active { scheme.badge_fg } else { scheme.text_muted };
    vec![
        Span::styled(format!("{label}: "), Style::default().fg(scheme.text_muted)),
        Span::styled(
            format!(" {value} "),
            Style::default().fg(badge_fg).bg(badge_bg).bold(),
        ),
    ]
}

/// Render the theme badge shown in the header
pub fn theme_badge(name: ThemeName) -> Span<'static> {
    let scheme = colors();
    Span::styled(
        format!(" {} ", name.as_str().to_uppercase()),
        Style::default().fg(scheme.badge_fg).bg(scheme.primary).bold(),
    )
}

// ============================================================================
// Footer Hints
// ============================================================================

/// Footer hints for the dashboard
pub struct FooterHints;

impl FooterHints {
    /// Hints while typing in the search box
    pub fn search() -> Vec<(&'static str, &'static str)> {
        vec![("Enter/Esc", "done"), ("Backspace", "delete")]
    }

    /// Hints for the grades table
    pub fn table() -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![
            ("y/s/m", "cycle filters"),
            ("x", "clear"),
            ("←→", "cell"),
            ("Enter", "fold"),
        ];
        hints.extend(Self::global());
        hints
    }

    /// Global hints (always shown)
    pub fn global() -> Vec<(&'static str, &'static str)> {
        vec![
            ("↑↓/jk", "navigate"),
            ("/", "search"),
            ("r", "reload"),
            ("T", "theme"),
            ("?", "help"),
            ("q", "quit"),
        ]
    }
}

/// Render footer hints as spans
pub fn render_footer_hints(hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("[{key}]"), Styles::shortcut_key()));
        spans.push(Span::styled((*desc).to_string(), Styles::shortcut_desc()));
    }

    spans
}
