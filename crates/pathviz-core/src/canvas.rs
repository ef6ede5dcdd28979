//! The character surface a [`Model`](crate::app::Model) draws into, and the
//! diff [`Frame`] handed to a driver.

use crate::geom::{Bounds, Pos};

// ---------------------------------------------------------------------------
// Color / Style / Cell
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB). Zero means "terminal
/// default".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const DEFAULT: Self = Self(0);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Foreground, background and weight of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Style {
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// A styled character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A `rows × cols` buffer of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    cells: Vec<Cell>,
    bounds: Bounds,
}

impl Canvas {
    pub fn new(rows: i32, cols: i32) -> Self {
        let bounds = Bounds::new(rows, cols);
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The cell at `p`; the default cell outside bounds.
    pub fn at(&self, p: Pos) -> Cell {
        self.bounds
            .index(p)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    /// Set the cell at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Pos, cell: Cell) {
        if let Some(i) = self.bounds.index(p) {
            self.cells[i] = cell;
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `text` on one line starting at `p`, clipped to the canvas.
    /// Returns the number of cells written.
    pub fn print(&mut self, p: Pos, text: &str, style: Style) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(0, i as i32);
            if !self.bounds.contains(q) {
                break;
            }
            self.set(q, Cell::new(ch, style));
            written += 1;
        }
        written
    }

    /// Grow or shrink to a new size, clearing all content.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        *self = Self::new(rows, cols);
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single cell that changed between two canvases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Pos,
}

/// The set of cells a driver must repaint.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub bounds: Bounds,
}

/// Diff two canvases. If the sizes differ every cell of `curr` is emitted.
pub fn compute_frame(prev: &Canvas, curr: &Canvas) -> Frame {
    let full = prev.bounds != curr.bounds;
    let cells = curr
        .bounds
        .iter()
        .filter_map(|p| {
            let cell = curr.at(p);
            (full || prev.at(p) != cell).then_some(FrameCell { cell, pos: p })
        })
        .collect();
    Frame {
        cells,
        bounds: curr.bounds,
    }
}
