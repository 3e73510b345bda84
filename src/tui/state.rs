//! Cursor over the visible rows of the grades table.
//!
//! The table interleaves module headers with their course rows, and folded
//! modules contribute only their header. [`TableCursor`] owns that row list
//! and moves over it, either row by row or from one module header to the
//! next.

use super::constants::PAGE_SIZE;

/// One visible row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLine {
    /// Module header at `module_groups[index]`
    Module(usize),
    /// Course `course` of module `module`
    Course { module: usize, course: usize },
}

impl TableLine {
    /// Index of the module this row belongs to.
    #[must_use]
    pub const fn module(self) -> usize {
        match self {
            Self::Module(index) | Self::Course { module: index, .. } => index,
        }
    }

    #[must_use]
    pub const fn is_module(self) -> bool {
        matches!(self, Self::Module(_))
    }
}

/// Row list plus the selected position.
#[derive(Debug, Clone, Default)]
pub struct TableCursor {
    lines: Vec<TableLine>,
    selected: usize,
}

impl TableCursor {
    #[must_use]
    pub fn new(lines: Vec<TableLine>) -> Self {
        Self { lines, selected: 0 }
    }

    pub fn lines(&self) -> &[TableLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Position of the selected row.
    pub const fn position(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<TableLine> {
        self.lines.get(self.selected).copied()
    }

    /// Swap in a new row list.
    ///
    /// The cursor stays on the same row when it is still visible. A course
    /// hidden by folding its module hands the cursor to the module header;
    /// anything else keeps the position, clamped to the new length.
    pub fn replace_lines(&mut self, lines: Vec<TableLine>) {
        let previous = self.current();
        self.lines = lines;

        let target = previous.and_then(|line| {
            self.find(line)
                .or_else(|| self.find(TableLine::Module(line.module())))
        });
        self.selected = target.unwrap_or(self.selected);
        self.clamp();
    }

    /// Select `line` if visible; returns whether it was found.
    pub fn select_line(&mut self, line: TableLine) -> bool {
        match self.find(line) {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }

    /// Select by position, clamped to the last row.
    pub fn select_position(&mut self, pos: usize) {
        self.selected = pos;
        self.clamp();
    }

    pub fn down(&mut self) {
        self.move_by(1);
    }

    pub fn up(&mut self) {
        self.move_by(-1);
    }

    pub fn page_down(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    pub fn page_up(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.lines.len().saturating_sub(1);
    }

    /// Jump to the next module header; stays put on the last module.
    pub fn next_module(&mut self) {
        if let Some(offset) = self
            .lines
            .iter()
            .skip(self.selected + 1)
            .position(|line| line.is_module())
        {
            self.selected += offset + 1;
        }
    }

    /// Jump to the header of the current module, or to the previous
    /// module's header when already on one.
    pub fn prev_module(&mut self) {
        if let Some(pos) = self.lines[..self.selected.min(self.lines.len())]
            .iter()
            .rposition(|line| line.is_module())
        {
            self.selected = pos;
        }
    }

    fn find(&self, line: TableLine) -> Option<usize> {
        self.lines.iter().position(|l| *l == line)
    }

    fn move_by(&mut self, delta: isize) {
        self.selected = self.selected.saturating_add_signed(delta);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.lines.len().saturating_sub(1));
    }
}
