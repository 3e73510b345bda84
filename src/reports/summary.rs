//! Summary and table report generators for shell output.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::NewGrade;
use crate::model::{GradeStatus, Meta};
use crate::palette::{grade_color, GradeColor, Rgb, ThemeName};
use crate::table::{GradeFilters, GradeTable};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown in place of a grade type the course does not have.
const MISSING_CELL: &str = "—";
const COURSE_WIDTH_MAX: usize = 40;
const CELL_WIDTH_MIN: usize = 6;
const CELL_WIDTH_MAX: usize = 16;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Paint a grade cell in 24-bit color over the theme's table surface.
fn truecolor(text: &str, color: &GradeColor, theme: ThemeName) -> String {
    let (background, foreground) = color.resolve(theme);
    let mut codes = String::new();
    if let Some(Rgb { r, g, b }) = foreground {
        codes.push_str(&format!("\x1b[38;2;{r};{g};{b}m"));
    }
    if let Some(Rgb { r, g, b }) = background {
        codes.push_str(&format!("\x1b[48;2;{r};{g};{b}m"));
    }
    if codes.is_empty() {
        text.to_string()
    } else {
        format!("{codes}{text}\x1b[0m")
    }
}

fn filters_line(filters: &GradeFilters) -> String {
    if filters.is_empty() {
        return "none".to_string();
    }
    let mut parts = Vec::new();
    if !filters.search.trim().is_empty() {
        parts.push(format!("search \"{}\"", filters.search.trim()));
    }
    for (label, value) in [
        ("year", &filters.year),
        ("semester", &filters.semester),
        ("module", &filters.module),
    ] {
        if !value.is_empty() {
            parts.push(format!("{label} {value}"));
        }
    }
    parts.join(", ")
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_grades_report(
        &self,
        table: &GradeTable,
        meta: &Meta,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let stats = table.stats();
        let mut lines = Vec::new();

        lines.push(self.color(
            config.title.as_deref().unwrap_or("Grades Summary"),
            "bold",
        ));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let Some(source) = &config.metadata.source {
            lines.push(format!("{}  {source}", self.color("Source:", "cyan")));
        }
        lines.push(format!(
            "{}  {}",
            self.color("Last update:", "cyan"),
            meta.last_updated_display()
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Filters:", "cyan"),
            filters_line(&config.filters)
        ));
        lines.push(String::new());

        lines.push(format!(
            "{} modules, {} courses, {} grade types",
            stats.modules, stats.courses, stats.grade_types
        ));
        lines.push(format!(
            "  {} numeric, {} status, {} pending",
            self.color(&stats.numeric.to_string(), "green"),
            self.color(&stats.status.to_string(), "yellow"),
            self.color(&stats.pending.to_string(), "dim")
        ));

        if let (Some(mean), Some(low), Some(high)) = (stats.mean, stats.lowest, stats.highest) {
            lines.push(format!(
                "{}  {mean:.2} (lowest {low:.2}, highest {high:.2})",
                self.color("Average:", "cyan")
            ));
        }

        Ok(lines.join("\n"))
    }

    fn generate_new_grades_report(
        &self,
        new_grades: &[NewGrade],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        if new_grades.is_empty() {
            return Ok(self.color("No new grades.", "dim"));
        }

        let mut lines = vec![self.color(
            &format!(
                "{} new {}",
                new_grades.len(),
                if new_grades.len() == 1 { "grade" } else { "grades" }
            ),
            "bold",
        )];
        for grade in new_grades {
            lines.push(format!("  {} {}", self.color("+", "green"), grade.title));
        }
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter for aligned terminal output
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn cell(
        &self,
        text: &str,
        width: usize,
        status: GradeStatus,
        color: &GradeColor,
        theme: ThemeName,
    ) -> String {
        let padded = pad(&truncate(text, width), width);
        if !self.colored {
            return padded;
        }
        match status {
            GradeStatus::Numeric => truecolor(&padded, color, theme),
            GradeStatus::Pending => ansi_color(&padded, "dim", true),
            GradeStatus::Status => padded,
        }
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_grades_report(
        &self,
        table: &GradeTable,
        meta: &Meta,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(format!(
            "{}  {}",
            self.color(config.title.as_deref().unwrap_or("Grades"), "bold"),
            self.color(&format!("Last update: {}", meta.last_updated_display()), "dim")
        ));

        if table.is_empty() {
            lines.push(String::new());
            lines.push("No grades match the current filters.".to_string());
            return Ok(lines.join("\n"));
        }

        let course_width = table
            .courses()
            .map(|c| c.course.width() + 2)
            .chain(std::iter::once("COURSE".len()))
            .max()
            .unwrap_or(0)
            .min(COURSE_WIDTH_MAX);
        let cell_widths: Vec<usize> = table
            .grade_types
            .iter()
            .map(|grade_type| {
                table
                    .courses()
                    .filter_map(|c| c.grade(grade_type))
                    .map(|g| g.display_value().width())
                    .chain(std::iter::once(grade_type.width()))
                    .max()
                    .unwrap_or(0)
                    .clamp(CELL_WIDTH_MIN, CELL_WIDTH_MAX)
            })
            .collect();
        let rule_width = course_width + cell_widths.iter().map(|w| w + 1).sum::<usize>();

        let mut header = self.color(&pad("COURSE", course_width), "bold");
        for (grade_type, width) in table.grade_types.iter().zip(&cell_widths) {
            header.push(' ');
            header.push_str(&self.color(&pad(&truncate(grade_type, *width), *width), "bold"));
        }
        lines.push(String::new());
        lines.push(header);
        lines.push("─".repeat(rule_width));

        for group in &table.module_groups {
            lines.push(self.color(&format!("▼ {}", group.module_name), "cyan"));
            for course in &group.courses {
                let mut line = pad(
                    &truncate(&format!("  {}", course.course), course_width),
                    course_width,
                );
                for (grade_type, width) in table.grade_types.iter().zip(&cell_widths) {
                    line.push(' ');
                    match course.grade(grade_type) {
                        Some(grade) => line.push_str(&self.cell(
                            grade.display_value(),
                            *width,
                            grade.status,
                            &grade_color(grade.grade_numeric, config.theme),
                            config.theme,
                        )),
                        None => line.push_str(&self.color(&pad(MISSING_CELL, *width), "dim")),
                    }
                }
                lines.push(line.trim_end().to_string());
            }
        }

        let stats = table.stats();
        lines.push(String::new());
        lines.push(format!(
            "Total: {} courses in {} modules | {} numeric, {} status, {} pending",
            stats.courses, stats.modules, stats.numeric, stats.status, stats.pending
        ));

        Ok(lines.join("\n"))
    }

    fn generate_new_grades_report(
        &self,
        new_grades: &[NewGrade],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        if new_grades.is_empty() {
            return Ok("No new grades.".to_string());
        }

        let title_width = new_grades
            .iter()
            .map(|g| g.title.width())
            .max()
            .unwrap_or(0)
            .min(60);
        let mut lines = vec![format!(
            "{:<8} {} {}",
            self.color("STATUS", "bold"),
            self.color(&pad("GRADE", title_width), "bold"),
            self.color("DETAILS", "bold")
        )];
        lines.push("─".repeat(title_width + 24));

        for grade in new_grades {
            lines.push(format!(
                "{} {} {}",
                self.color(&pad("+ New", 8), "green"),
                pad(&truncate(&grade.title, title_width), title_width),
                grade.details
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} new", new_grades.len()));
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Right-pad to a display width.
fn pad(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - current))
    }
}

/// Cut to a display width, ending with `...` when shortened.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let (budget, ellipsis) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlattenedGrade;
    use crate::table::group_rows;

    fn row(course: &str, grade_type: &str, value: Option<&str>) -> FlattenedGrade {
        let numeric = value.and_then(|v| v.parse().ok());
        FlattenedGrade {
            year: "Y1".to_string(),
            semester: "S1".to_string(),
            module: "Maths".to_string(),
            course: course.to_string(),
            grade_type: grade_type.to_string(),
            grade_value: value.map(str::to_string),
            grade_numeric: numeric,
            grade_coef: None,
            type_coefficient: None,
            status: match (value, numeric) {
                (None, _) => GradeStatus::Pending,
                (Some(_), Some(_)) => GradeStatus::Numeric,
                (Some(_), None) => GradeStatus::Status,
            },
        }
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate("Algebra", 10), "Algebra");
        assert_eq!(truncate("Linear Algebra", 10), "Linear ...");
        assert_eq!(truncate("Électronique", 3), "Éle");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_table_without_color() {
        let table = group_rows(&[
            row("Algebra", "Exam", Some("14")),
            row("Algebra", "TP", None),
            row("Analysis", "Exam", Some("Validé")),
        ]);
        let report = TableReporter::new()
            .no_color()
            .generate_grades_report(&table, &Meta::default(), &ReportConfig::default())
            .unwrap();

        assert!(!report.contains("\x1b["));
        assert!(report.contains("Last update: Unknown"));
        assert!(report.contains("▼ Maths"));
        let analysis = report
            .lines()
            .find(|l| l.trim_start().starts_with("Analysis"))
            .unwrap();
        assert!(analysis.contains("Validé"));
        assert!(analysis.contains(MISSING_CELL));
        let algebra = report
            .lines()
            .find(|l| l.trim_start().starts_with("Algebra"))
            .unwrap();
        assert!(algebra.contains("Pending"));
        assert!(report.contains("1 numeric, 1 status, 1 pending"));
    }

    #[test]
    fn test_table_colors_numeric_cells_in_truecolor() {
        let table = group_rows(&[row("Algebra", "Exam", Some("20"))]);
        let config = ReportConfig::default().with_theme(ThemeName::Dark);
        let report = TableReporter::new()
            .generate_grades_report(&table, &Meta::default(), &config)
            .unwrap();
        assert!(report.contains("\x1b[38;2;70;213;126m"));
    }

    #[test]
    fn test_empty_table_message() {
        let report = TableReporter::new()
            .no_color()
            .generate_grades_report(
                &GradeTable::default(),
                &Meta::default(),
                &ReportConfig::default(),
            )
            .unwrap();
        assert!(report.contains("No grades match the current filters."));
    }

    #[test]
    fn test_summary_report() {
        let table = group_rows(&[
            row("Algebra", "Exam", Some("8")),
            row("Analysis", "Exam", Some("16")),
        ]);
        let config =
            ReportConfig::default().with_filters(GradeFilters::default().with_search(" alg "));
        let report = SummaryReporter::new()
            .no_color()
            .generate_grades_report(&table, &Meta::default(), &config)
            .unwrap();

        assert!(report.contains("1 modules, 2 courses, 1 grade types"));
        assert!(report.contains("Average:  12.00 (lowest 8.00, highest 16.00)"));
        assert!(report.contains("search \"alg\""));
    }

    #[test]
    fn test_new_grades_reports() {
        let grades = vec![NewGrade {
            title: "Algebra - Exam".to_string(),
            details: "14 - 100%".to_string(),
            course: "Algebra".to_string(),
            grade_type: "Exam".to_string(),
            value: "14".to_string(),
            coef: "100".to_string(),
        }];
        let config = ReportConfig::default();

        let summary = SummaryReporter::new()
            .no_color()
            .generate_new_grades_report(&grades, &config)
            .unwrap();
        assert!(summary.starts_with("1 new grade\n"));

        let table = TableReporter::new()
            .no_color()
            .generate_new_grades_report(&grades, &config)
            .unwrap();
        assert!(table.contains("Algebra - Exam"));
        assert!(table.contains("14 - 100%"));

        let empty = TableReporter::new()
            .generate_new_grades_report(&[], &config)
            .unwrap();
        assert_eq!(empty, "No new grades.");
    }
}
