use pathviz_core::{Grid, Pos};

/// Cached neighbour computation helper.
///
/// Enumerates the up-to-four axis-aligned neighbours of a cell that lie on
/// the board and have not been visited yet, always in the order up, down,
/// left, right. Walls are kept: deciding what is passable is the caller's job.
pub struct Neighbors {
    buf: Vec<Pos>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4),
        }
    }

    /// Unvisited in-bounds neighbours of `p` on `grid`.
    pub fn of(&mut self, p: Pos, grid: &Grid) -> &[Pos] {
        self.buf.clear();
        for n in p.neighbors_4() {
            if grid.node(n).is_some_and(|node| !node.visited) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}

/// One-shot form of [`Neighbors::of`].
pub fn neighbors_of(p: Pos, grid: &Grid) -> Vec<Pos> {
    Neighbors::new().of(p, grid).to_vec()
}
