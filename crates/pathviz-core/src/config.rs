//! Board configuration supplied by the caller.

use crate::error::Result;
use crate::geom::{Bounds, Pos};
use crate::grid::Grid;

/// Size of the board and where its markers begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    pub rows: i32,
    pub cols: i32,
    pub start: Pos,
    pub target: Pos,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 25,
            cols: 50,
            start: Pos::new(5, 20),
            target: Pos::new(9, 33),
        }
    }
}

impl BoardConfig {
    /// Check the configuration without allocating a board.
    pub fn validate(&self) -> Result<()> {
        Grid::check_placement(Bounds::new(self.rows, self.cols), self.start, self.target)
    }

    /// Build the initial board.
    pub fn build(&self) -> Result<Grid> {
        self.validate()?;
        Grid::new(self.rows, self.cols, self.start, self.target)
    }
}
