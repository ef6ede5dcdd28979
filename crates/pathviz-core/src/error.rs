//! Error type shared by the pathviz crates.

use thiserror::Error;

use crate::geom::{Bounds, Pos};
use crate::node::NodeKind;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the grid API boundary.
///
/// Everything except [`InvariantViolation`](Error::InvariantViolation) is a
/// rejected argument; the grid is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A position lies outside the board.
    #[error("position {pos} is outside the {bounds} board")]
    OutOfBounds { pos: Pos, bounds: Bounds },

    /// Start and target were asked to share one cell.
    #[error("start and target cannot share position {0}")]
    SamePosition(Pos),

    /// Edge weights must be strictly positive.
    #[error("edge weight at {0} must be positive")]
    ZeroWeight(Pos),

    /// The board has no cells, so it cannot hold a start and a target.
    #[error("board must have at least one row and one column, got {0}")]
    EmptyBoard(Bounds),

    /// The mutation would overwrite the start or target marker.
    #[error("cannot change {marker:?} marker at {pos} to {requested:?}")]
    MarkerOverwrite {
        pos: Pos,
        marker: NodeKind,
        requested: NodeKind,
    },

    /// A search was asked to begin somewhere other than the start marker.
    #[error("search must begin at the start marker {actual}, not {given}")]
    StartMismatch { given: Pos, actual: Pos },

    /// A textual board could not be parsed.
    #[error("cannot parse board: {0}")]
    Parse(String),

    /// The grid no longer holds exactly one start and one target.
    #[error("grid invariant violated: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Whether this error is a rejected argument rather than corrupted
    /// state.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_position() {
        let e = Error::OutOfBounds {
            pos: Pos::new(7, 2),
            bounds: Bounds::new(5, 5),
        };
        assert_eq!(e.to_string(), "position (7, 2) is outside the 5x5 board");
    }

    #[test]
    fn classification() {
        assert!(Error::SamePosition(Pos::ZERO).is_invalid_argument());
        assert!(Error::ZeroWeight(Pos::ZERO).is_invalid_argument());
        assert!(!Error::InvariantViolation("two starts".into()).is_invalid_argument());
    }
}
