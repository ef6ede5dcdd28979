//! pathviz: watch Dijkstra's algorithm explore a grid, in a terminal.
//!
//! The [`Board`] model lives here together with its palette and the random
//! obstacle generator; the binary only parses flags and starts the loop.

pub mod board;
pub mod obstacles;
pub mod palette;

pub use board::{BOARD_ORIGIN, Board, BoardOptions, CHROME_ROWS, Status};
