//! Shortest-path search over pathviz boards.
//!
//! - [`neighbors_of`] / [`Neighbors`] list the unvisited axis-aligned
//!   neighbours of a cell (up, down, left, right), walls included.
//! - [`run`] performs a Dijkstra search from the start marker to the target
//!   and returns the visitation order and the reconstructed path.
//! - [`Search`] exposes the same search one finalized cell at a time.
//!
//! Searches never touch the caller's [`Grid`](pathviz_core::Grid); they work
//! on a private copy whose search fields are reset first.

mod dijkstra;
mod neighbors;

pub use dijkstra::{Search, SearchResult, Step, run};
pub use neighbors::{Neighbors, neighbors_of};
