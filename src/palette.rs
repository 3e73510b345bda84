//! Grade-to-color mapping.
//!
//! Grades on the 0-20 scale map to a red-to-green ramp. The dark theme
//! interpolates in RGB between two fixed endpoints, the light theme walks the
//! HSL hue wheel from 0° to 120°. Results can be rendered as CSS color
//! strings or resolved to opaque RGB for terminals, which have no alpha
//! channel.

use crate::model::{GRADE_MAX, GRADE_MIN};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dark-theme color at grade 0 (`#e56c6c`).
pub const DARK_RED: Rgb = Rgb::new(229, 108, 108);
/// Dark-theme color at grade 20 (`#46d57e`).
pub const DARK_GREEN: Rgb = Rgb::new(70, 213, 126);
/// Opacity of the dark-theme cell background.
pub const DARK_BACKGROUND_ALPHA: f64 = 0.18;

const LIGHT_HUE_SPAN: f64 = 120.0;
const LIGHT_BACKGROUND: (u8, u8, f64) = (68, 72, 0.40);
const LIGHT_FOREGROUND: (u8, u8) = (60, 20);

// ============================================================================
// Theme name
// ============================================================================

/// Visual theme of the dashboard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
}

impl ThemeName {
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Surface the grade table is drawn on. Translucent cell colors are
    /// blended over it.
    #[must_use]
    pub const fn table_background(self) -> Rgb {
        match self {
            Self::Light => Rgb::new(239, 241, 245),
            Self::Dark => Rgb::new(30, 30, 46),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Theme the terminal appears to use, from `COLORFGBG`. Dark when unknown.
#[must_use]
pub fn system_theme() -> ThemeName {
    theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// Interpret a `COLORFGBG` value such as `"15;0"` or `"0;default;15"`.
///
/// The last field is the background palette index; white-ish indices
/// (7 and 9-15) mean a light terminal.
#[must_use]
pub fn theme_from_colorfgbg(value: Option<&str>) -> ThemeName {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match background {
        Some(7 | 9..=15) => ThemeName::Light,
        _ => ThemeName::Dark,
    }
}

/// Pick the starting theme: `--theme`, else the choice saved from the
/// dashboard, else the config file, else the terminal's own.
#[must_use]
pub fn initial_theme(
    requested: Option<ThemeName>,
    stored: Option<ThemeName>,
    configured: Option<ThemeName>,
) -> ThemeName {
    requested
        .or(stored)
        .or(configured)
        .unwrap_or_else(system_theme)
}

// ============================================================================
// Color primitives
// ============================================================================

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Composite `self` at `alpha` over an opaque `base`.
    #[must_use]
    pub fn over(self, base: Self, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Self::new(mix(self.r, base.r), mix(self.g, base.g), mix(self.b, base.b))
    }
}

/// An HSL color with opacity. Saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
    pub alpha: f64,
}

impl Hsla {
    /// Convert to RGB, ignoring alpha.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match h as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r1), channel(g1), channel(b1))
    }
}

/// One side (background or foreground) of a cell color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Paint {
    /// No background: let the surface show through
    Transparent,
    /// No foreground override: use the surrounding text color
    Inherit,
    Rgba { color: Rgb, alpha: f64 },
    Hsla(Hsla),
}

impl Paint {
    /// CSS color value.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Transparent => "transparent".to_string(),
            Self::Inherit => "inherit".to_string(),
            Self::Rgba { color, alpha } if *alpha >= 1.0 => {
                format!("rgb({}, {}, {})", color.r, color.g, color.b)
            }
            Self::Rgba { color, alpha } => {
                format!("rgba({}, {}, {}, {alpha})", color.r, color.g, color.b)
            }
            Self::Hsla(hsla) if hsla.alpha >= 1.0 => format!(
                "hsl({:.1} {}% {}%)",
                hsla.hue, hsla.saturation, hsla.lightness
            ),
            Self::Hsla(hsla) => format!(
                "hsl({:.1} {}% {}% / {:.2})",
                hsla.hue, hsla.saturation, hsla.lightness, hsla.alpha
            ),
        }
    }

    /// Opaque color as seen over `base`, or `None` for transparent/inherit.
    #[must_use]
    pub fn resolve(&self, base: Rgb) -> Option<Rgb> {
        match self {
            Self::Transparent | Self::Inherit => None,
            Self::Rgba { color, alpha } => Some(color.over(base, *alpha)),
            Self::Hsla(hsla) => Some(hsla.to_rgb().over(base, hsla.alpha)),
        }
    }
}

/// Background/foreground pair for a grade cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeColor {
    pub background: Paint,
    pub foreground: Paint,
}

impl GradeColor {
    /// The pair used when there is no grade to color.
    pub const NEUTRAL: Self = Self {
        background: Paint::Transparent,
        foreground: Paint::Inherit,
    };

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Opaque `(background, foreground)` as drawn on `theme`'s table surface.
    #[must_use]
    pub fn resolve(&self, theme: ThemeName) -> (Option<Rgb>, Option<Rgb>) {
        let base = theme.table_background();
        (self.background.resolve(base), self.foreground.resolve(base))
    }
}

// ============================================================================
// Mapping
// ============================================================================

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let (a, b) = (f64::from(a), f64::from(b));
    (a + (b - a) * t).round() as u8
}

/// Position of a grade on the scale, clamped into `[0, 1]`.
fn scale_position(grade: f64) -> f64 {
    grade.clamp(GRADE_MIN, GRADE_MAX) / GRADE_MAX
}

/// Map a grade to its cell colors under `theme`.
///
/// Absent and NaN grades get [`GradeColor::NEUTRAL`]; everything else is
/// clamped to the 0-20 scale first.
#[must_use]
pub fn grade_color(grade: Option<f64>, theme: ThemeName) -> GradeColor {
    let Some(grade) = grade.filter(|g| !g.is_nan()) else {
        return GradeColor::NEUTRAL;
    };
    let t = scale_position(grade);

    match theme {
        ThemeName::Dark => {
            let color = Rgb::new(
                lerp_channel(DARK_RED.r, DARK_GREEN.r, t),
                lerp_channel(DARK_RED.g, DARK_GREEN.g, t),
                lerp_channel(DARK_RED.b, DARK_GREEN.b, t),
            );
            GradeColor {
                background: Paint::Rgba {
                    color,
                    alpha: DARK_BACKGROUND_ALPHA,
                },
                foreground: Paint::Rgba { color, alpha: 1.0 },
            }
        }
        ThemeName::Light => {
            let hue = t * LIGHT_HUE_SPAN;
            let (bg_s, bg_l, bg_a) = LIGHT_BACKGROUND;
            let (fg_s, fg_l) = LIGHT_FOREGROUND;
            GradeColor {
                background: Paint::Hsla(Hsla {
                    hue,
                    saturation: bg_s,
                    lightness: bg_l,
                    alpha: bg_a,
                }),
                foreground: Paint::Hsla(Hsla {
                    hue,
                    saturation: fg_s,
                    lightness: fg_l,
                    alpha: 1.0,
                }),
            }
        }
    }
}
