use log::{debug, trace};

use pathviz_core::{Error, Grid, NodeKind, Pos, Result};

use crate::neighbors::Neighbors;

/// The outcome of a complete search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Cells in the order their distance was finalized. Never contains the
    /// start, the target, or a wall.
    pub visited: Vec<Pos>,
    /// Start to target inclusive, or `None` if the target is unreachable.
    pub path: Option<Vec<Pos>>,
    /// Total entry cost along `path`.
    pub cost: Option<u32>,
}

impl SearchResult {
    #[inline]
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of moves along the path.
    pub fn path_len(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

/// What one call to [`Search::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cell's distance was finalized.
    Visited(Pos),
    /// The target was reached; the search is over.
    Found,
    /// The frontier ran dry without reaching the target; the search is over.
    Exhausted,
}

impl Step {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Visited(_))
    }
}

/// An in-progress Dijkstra search over a private copy of a board.
///
/// The frontier is a plain vector scanned linearly for its cheapest entry,
/// ties going to the entry found first. With the fixed neighbour order this
/// makes every run on the same board finalize cells in the same order.
pub struct Search {
    grid: Grid,
    start: Pos,
    frontier: Vec<Pos>,
    in_frontier: Vec<bool>,
    visited: Vec<Pos>,
    nbuf: Neighbors,
    done: Option<Step>,
    path: Option<Vec<Pos>>,
}

impl Search {
    /// Snapshot `grid` and seed the frontier with the start's passable
    /// neighbours.
    ///
    /// `start` must be the board's start marker.
    pub fn new(grid: &Grid, start: Pos) -> Result<Self> {
        if !grid.contains(start) {
            return Err(Error::OutOfBounds {
                pos: start,
                bounds: grid.bounds(),
            });
        }
        grid.check_invariants()?;
        if start != grid.start() {
            return Err(Error::StartMismatch {
                given: start,
                actual: grid.start(),
            });
        }

        let mut work = grid.clone();
        work.reset_search_state();
        if let Some(n) = work.node_mut(start) {
            n.visited = true;
            n.distance = 0;
        }

        let bounds = work.bounds();
        let mut search = Self {
            grid: work,
            start,
            frontier: Vec::new(),
            in_frontier: vec![false; bounds.len()],
            visited: Vec::new(),
            nbuf: Neighbors::new(),
            done: None,
            path: None,
        };
        search.relax_from(start);
        debug!(
            "search from {start} to {} on {bounds} board, {} seed(s)",
            search.grid.target(),
            search.frontier.len()
        );
        Ok(search)
    }

    /// The working copy, with distances and predecessors as computed so far.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells finalized so far.
    pub fn visited(&self) -> &[Pos] {
        &self.visited
    }

    /// Current frontier in scan order.
    pub fn frontier(&self) -> &[Pos] {
        &self.frontier
    }

    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }

    /// Finalize one more cell, or report how the search ended.
    ///
    /// Once a terminal step has been returned every further call returns it
    /// again.
    pub fn step(&mut self) -> Step {
        if let Some(done) = self.done {
            return done;
        }

        let Some(i) = self.cheapest() else {
            debug!("target unreachable after {} visits", self.visited.len());
            return self.finish(Step::Exhausted);
        };
        let p = self.frontier[i];

        if self.grid.kind(p) == Some(NodeKind::Target) {
            self.path = Some(self.backtrack(p));
            debug!(
                "target {p} reached after {} visits, path of {} cells",
                self.visited.len(),
                self.path.as_ref().map_or(0, Vec::len)
            );
            return self.finish(Step::Found);
        }

        if let Some(n) = self.grid.node_mut(p) {
            n.visited = true;
        }
        self.visited.push(p);
        self.frontier.remove(i);
        if let Some(idx) = self.grid.bounds().index(p) {
            self.in_frontier[idx] = false;
        }
        self.relax_from(p);
        trace!("visited {p}, frontier {}", self.frontier.len());
        Step::Visited(p)
    }

    /// Run to completion and return the traces.
    pub fn run_to_end(mut self) -> SearchResult {
        while !self.step().is_terminal() {}
        self.into_result()
    }

    /// The traces gathered so far. The path is only present after
    /// [`Step::Found`].
    pub fn into_result(self) -> SearchResult {
        let cost = self
            .path
            .as_ref()
            .and_then(|_| self.grid.node(self.grid.target()))
            .map(|n| n.distance);
        SearchResult {
            visited: self.visited,
            path: self.path,
            cost,
        }
    }

    fn finish(&mut self, step: Step) -> Step {
        self.done = Some(step);
        step
    }

    /// Index of the cheapest eligible frontier entry, first found on ties.
    fn cheapest(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &p) in self.frontier.iter().enumerate() {
            let Some(n) = self.grid.node(p) else {
                continue;
            };
            if n.is_wall() || n.visited {
                continue;
            }
            if best.is_none_or(|(_, d)| n.distance < d) {
                best = Some((i, n.distance));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Offer `from`'s distance plus entry cost to each passable neighbour.
    fn relax_from(&mut self, from: Pos) {
        let Some(base) = self.grid.node(from).map(|n| n.distance) else {
            return;
        };
        let bounds = self.grid.bounds();
        let mut nbuf = std::mem::take(&mut self.nbuf);
        for &np in nbuf.of(from, &self.grid) {
            let Some(n) = self.grid.node_mut(np) else {
                continue;
            };
            if n.is_wall() {
                continue;
            }
            let candidate = base.saturating_add(n.weight());
            if candidate >= n.distance {
                continue;
            }
            n.distance = candidate;
            n.predecessor = Some(from);
            if let Some(idx) = bounds.index(np) {
                if !self.in_frontier[idx] {
                    self.in_frontier[idx] = true;
                    self.frontier.push(np);
                }
            }
        }
        self.nbuf = nbuf;
    }

    /// Follow predecessors from `to` back to the start; start first.
    fn backtrack(&self, to: Pos) -> Vec<Pos> {
        let limit = self.grid.bounds().len();
        let mut path = vec![to];
        let mut cur = to;
        while let Some(prev) = self.grid.node(cur).and_then(|n| n.predecessor) {
            path.push(prev);
            cur = prev;
            if path.len() > limit {
                break;
            }
        }
        debug_assert_eq!(path.last(), Some(&self.start));
        path.reverse();
        path
    }
}

/// Compute the shortest path from `start` to the board's target.
///
/// Works on a private copy; `grid` is not modified. An unreachable target is
/// a normal outcome with `path == None`.
pub fn run(grid: &Grid, start: Pos) -> Result<SearchResult> {
    Ok(Search::new(grid, start)?.run_to_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::UNREACHABLE;
    use std::collections::HashSet;

    fn p(row: i32, col: i32) -> Pos {
        Pos::new(row, col)
    }

    #[test]
    fn straight_line_on_open_board() {
        let g = Grid::new(5, 5, p(0, 0), p(0, 4)).unwrap();
        let res = run(&g, g.start()).unwrap();
        assert_eq!(
            res.path,
            Some(vec![p(0, 0), p(0, 1), p(0, 2), p(0, 3), p(0, 4)])
        );
        assert_eq!(res.cost, Some(4));
        assert_eq!(res.path_len(), Some(4));

        let at = |q: Pos| res.visited.iter().position(|&v| v == q).unwrap();
        assert!(at(p(0, 1)) < at(p(0, 2)));
        assert!(at(p(0, 2)) < at(p(0, 3)));
    }

    #[test]
    fn adjacent_target_needs_no_visits() {
        let g = Grid::from_ascii("ST").unwrap();
        let res = run(&g, g.start()).unwrap();
        assert!(res.visited.is_empty());
        assert_eq!(res.path, Some(vec![p(0, 0), p(0, 1)]));
        assert_eq!(res.cost, Some(1));
    }

    #[test]
    fn walled_in_target_is_unreachable() {
        let g = Grid::from_ascii(
            "
            S....
            ...#.
            ..#T#
            ...#.
            ",
        )
        .unwrap();
        let res = run(&g, g.start()).unwrap();
        assert_eq!(res.path, None);
        assert_eq!(res.cost, None);
        assert!(!res.found());

        let seen: HashSet<Pos> = res.visited.iter().copied().collect();
        assert_eq!(seen.len(), res.visited.len());
        // Everything but the walls, both markers and the sealed corner.
        assert_eq!(res.visited.len(), 20 - 4 - 2 - 1);
        assert!(!seen.contains(&p(3, 4)));
        assert!(!seen.contains(&g.start()));
        assert!(seen.iter().all(|&q| g.kind(q) == Some(NodeKind::Empty)));
    }

    #[test]
    fn routes_around_walls() {
        let g = Grid::from_ascii(
            "
            S#.
            .#T
            ...
            ",
        )
        .unwrap();
        let res = run(&g, g.start()).unwrap();
        assert_eq!(
            res.path,
            Some(vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2), p(1, 2)])
        );
        assert!(!res.visited.contains(&p(0, 1)));
        assert!(!res.visited.contains(&p(1, 1)));
    }

    #[test]
    fn walls_next_to_start_are_not_seeded() {
        let g = Grid::from_ascii(
            "
            S#
            #T
            ",
        )
        .unwrap();
        let s = Search::new(&g, g.start()).unwrap();
        assert!(s.frontier().is_empty());
        let res = s.run_to_end();
        assert!(res.visited.is_empty());
        assert_eq!(res.path, None);
    }

    #[test]
    fn prefers_cheaper_detour() {
        let mut g = Grid::from_ascii(
            "
            S.T
            ...
            ",
        )
        .unwrap();
        g.set_weight(p(0, 1), 5).unwrap();
        let res = run(&g, g.start()).unwrap();
        assert_eq!(
            res.path,
            Some(vec![p(0, 0), p(1, 0), p(1, 1), p(1, 2), p(0, 2)])
        );
        assert_eq!(res.cost, Some(4));
        assert_eq!(res.visited, vec![p(1, 0), p(1, 1), p(1, 2)]);
    }

    #[test]
    fn caller_grid_is_untouched() {
        let g = Grid::new(4, 4, p(0, 0), p(3, 3)).unwrap();
        let before = g.clone();
        run(&g, g.start()).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let g = Grid::from_ascii(
            "
            ........
            .S..#...
            ....#...
            ..###..T
            ........
            ",
        )
        .unwrap();
        let a = run(&g, g.start()).unwrap();
        let b = run(&g, g.start()).unwrap();
        assert_eq!(a, b);
        assert!(a.found());
    }

    #[test]
    fn stepping_matches_run() {
        let g = Grid::new(4, 6, p(1, 1), p(2, 4)).unwrap();
        let mut s = Search::new(&g, g.start()).unwrap();
        let mut steps = Vec::new();
        loop {
            match s.step() {
                Step::Visited(q) => steps.push(q),
                Step::Found => break,
                Step::Exhausted => panic!("target should be reachable"),
            }
        }
        assert!(s.is_done());
        assert_eq!(s.step(), Step::Found);
        assert_eq!(s.grid().node(p(2, 4)).unwrap().distance, 4);
        let res = s.into_result();
        assert_eq!(res.visited, steps);
        assert_eq!(res, run(&g, g.start()).unwrap());
    }

    #[test]
    fn distances_are_finalized_in_order() {
        let g = Grid::new(6, 6, p(2, 2), p(5, 5)).unwrap();
        let mut s = Search::new(&g, g.start()).unwrap();
        let mut last = 0;
        while let Step::Visited(q) = s.step() {
            let d = s.grid().node(q).unwrap().distance;
            assert!(d >= last);
            assert_eq!(d as i32, q.manhattan(g.start()));
            last = d;
        }
    }

    #[test]
    fn rejects_bad_start() {
        let g = Grid::new(3, 3, p(0, 0), p(2, 2)).unwrap();
        assert!(matches!(
            run(&g, p(3, 3)),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(
            run(&g, p(1, 1)),
            Err(Error::StartMismatch {
                given: p(1, 1),
                actual: p(0, 0)
            })
        );
    }

    #[test]
    fn unreached_cells_keep_sentinel() {
        let g = Grid::from_ascii(
            "
            S.#..
            ..#.T
            ",
        )
        .unwrap();
        let mut s = Search::new(&g, g.start()).unwrap();
        while !s.step().is_terminal() {}
        assert_eq!(s.step(), Step::Exhausted);
        assert_eq!(s.grid().node(p(0, 4)).unwrap().distance, UNREACHABLE);
        assert_eq!(s.grid().node(p(1, 1)).unwrap().distance, 2);
    }
}
