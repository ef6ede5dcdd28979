//! The [`Grid`] type: the board model and its marker invariants.
//!
//! A `Grid` owns a flat, row-major arena of [`Node`]s. Unlike a shared view,
//! cloning a `Grid` copies every node: a clone is the isolated working copy a
//! search mutates while the caller keeps editing the original.
//!
//! Every public mutation keeps exactly one start and one target on the board.

use std::fmt;

use crate::error::{Error, Result};
use crate::geom::{Bounds, Pos};
use crate::node::{AnimState, Node, NodeKind};

/// The board: `rows × cols` nodes with one start and one target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    nodes: Vec<Node>,
    bounds: Bounds,
    start: Pos,
    target: Pos,
}

/// Unchecked wire form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    nodes: Vec<Node>,
    bounds: Bounds,
    start: Pos,
    target: Pos,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let bounds = Bounds::new(raw.bounds.rows, raw.bounds.cols);
        Self::check_placement(bounds, raw.start, raw.target)?;
        if raw.nodes.len() != bounds.len() {
            return Err(Error::InvariantViolation(format!(
                "{bounds} board needs {} nodes, got {}",
                bounds.len(),
                raw.nodes.len()
            )));
        }
        if let Some(i) = raw.nodes.iter().position(|n| n.weight == 0) {
            return Err(Error::ZeroWeight(bounds.pos(i)));
        }
        let grid = Self {
            nodes: raw.nodes,
            bounds,
            start: raw.start,
            target: raw.target,
        };
        grid.check_invariants()?;
        Ok(grid)
    }
}

impl Grid {
    /// Create a board of empty, idle, unit-weight nodes with the two markers
    /// placed.
    ///
    /// Fails if the board is empty, either marker is out of bounds, or both
    /// markers share a cell.
    pub fn new(rows: i32, cols: i32, start: Pos, target: Pos) -> Result<Self> {
        let bounds = Bounds::new(rows, cols);
        Self::check_placement(bounds, start, target)?;

        let mut nodes = vec![Node::default(); bounds.len()];
        if let Some(i) = bounds.index(start) {
            nodes[i].kind = NodeKind::Start;
        }
        if let Some(i) = bounds.index(target) {
            nodes[i].kind = NodeKind::Target;
        }
        Ok(Self {
            nodes,
            bounds,
            start,
            target,
        })
    }

    /// The checks [`new`](Grid::new) runs before allocating anything.
    pub(crate) fn check_placement(bounds: Bounds, start: Pos, target: Pos) -> Result<()> {
        if bounds.is_empty() {
            return Err(Error::EmptyBoard(bounds));
        }
        for p in [start, target] {
            if !bounds.contains(p) {
                return Err(Error::OutOfBounds { pos: p, bounds });
            }
        }
        if start == target {
            return Err(Error::SamePosition(start));
        }
        Ok(())
    }

    /// Parse a board from text: `.` empty, `#` wall, `S` start, `T` target.
    ///
    /// Leading and trailing blank lines are ignored; every remaining line must
    /// have the same width.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len() as i32;
        let cols = lines.first().map_or(0, |l| l.chars().count()) as i32;

        let mut kinds = Vec::with_capacity((rows * cols).max(0) as usize);
        let mut start = None;
        let mut target = None;
        for (r, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(Error::Parse(format!(
                    "line {} has width {}, expected {cols}",
                    r + 1,
                    line.chars().count()
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let p = Pos::new(r as i32, c as i32);
                let kind = match ch {
                    '.' => NodeKind::Empty,
                    '#' => NodeKind::Wall,
                    'S' => NodeKind::Start,
                    'T' => NodeKind::Target,
                    other => {
                        return Err(Error::Parse(format!("unexpected {other:?} at {p}")));
                    }
                };
                let slot = match kind {
                    NodeKind::Start => Some(&mut start),
                    NodeKind::Target => Some(&mut target),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if slot.replace(p).is_some() {
                        return Err(Error::Parse(format!("second {kind:?} marker at {p}")));
                    }
                }
                kinds.push(kind);
            }
        }

        let start = start.ok_or_else(|| Error::Parse("missing start marker 'S'".into()))?;
        let target = target.ok_or_else(|| Error::Parse("missing target marker 'T'".into()))?;
        let mut grid = Self::new(rows, cols, start, target)?;
        for (node, kind) in grid.nodes.iter_mut().zip(kinds) {
            node.kind = kind;
        }
        Ok(grid)
    }

    /// The board extent.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.cols
    }

    /// Position of the start marker.
    #[inline]
    pub fn start(&self) -> Pos {
        self.start
    }

    /// Position of the target marker.
    #[inline]
    pub fn target(&self) -> Pos {
        self.target
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        self.bounds.contains(p)
    }

    /// The node at `p`, or `None` outside the board.
    #[inline]
    pub fn node(&self, p: Pos) -> Option<&Node> {
        self.bounds.index(p).map(|i| &self.nodes[i])
    }

    /// Mutable access to the node at `p`.
    ///
    /// Kind and weight are not writable through the returned reference; use
    /// [`set_kind`](Grid::set_kind) and [`set_weight`](Grid::set_weight).
    #[inline]
    pub fn node_mut(&mut self, p: Pos) -> Option<&mut Node> {
        self.bounds.index(p).map(|i| &mut self.nodes[i])
    }

    /// The kind at `p`, or `None` outside the board.
    #[inline]
    pub fn kind(&self, p: Pos) -> Option<NodeKind> {
        self.node(p).map(Node::kind)
    }

    fn require(&self, p: Pos) -> Result<usize> {
        self.bounds.index(p).ok_or(Error::OutOfBounds {
            pos: p,
            bounds: self.bounds,
        })
    }

    /// Change the kind of the node at `p` in place.
    ///
    /// Setting `Start` or `Target` relocates that marker: the previous holder
    /// becomes empty and any wall at `p` is replaced. Relocating a marker onto
    /// itself is a no-op. Overwriting one marker with the other, or turning a
    /// marker into a wall or empty cell, is rejected.
    pub fn set_kind(&mut self, p: Pos, kind: NodeKind) -> Result<()> {
        let i = self.require(p)?;
        let current = self.nodes[i].kind;
        if current == kind {
            return Ok(());
        }
        if current.is_marker() {
            return Err(Error::MarkerOverwrite {
                pos: p,
                marker: current,
                requested: kind,
            });
        }

        match kind {
            NodeKind::Start => {
                let old = self.require(self.start)?;
                self.nodes[old].kind = NodeKind::Empty;
                self.start = p;
            }
            NodeKind::Target => {
                let old = self.require(self.target)?;
                self.nodes[old].kind = NodeKind::Empty;
                self.target = p;
            }
            NodeKind::Empty | NodeKind::Wall => {}
        }
        self.nodes[i].kind = kind;

        debug_assert!(self.check_invariants().is_ok());
        Ok(())
    }

    /// Set the cost of entering the node at `p`. Zero is rejected.
    pub fn set_weight(&mut self, p: Pos, weight: u32) -> Result<()> {
        let i = self.require(p)?;
        if weight == 0 {
            return Err(Error::ZeroWeight(p));
        }
        self.nodes[i].weight = weight;
        Ok(())
    }

    /// Set the animation state at `p`. No-op outside the board.
    #[inline]
    pub fn set_anim(&mut self, p: Pos, anim: AnimState) {
        if let Some(n) = self.node_mut(p) {
            n.anim = anim;
        }
    }

    /// Clear distance, visited, predecessor and animation state on every
    /// node. Kinds and weights are kept.
    pub fn reset_search_state(&mut self) {
        for n in &mut self.nodes {
            n.reset_search();
        }
    }

    /// Reset every animation state to idle.
    pub fn clear_animation(&mut self) {
        for n in &mut self.nodes {
            n.anim = AnimState::Idle;
        }
    }

    /// Turn every wall into an empty cell. Returns how many walls were
    /// removed.
    pub fn clear_walls(&mut self) -> usize {
        let mut removed = 0;
        for n in self.nodes.iter_mut().filter(|n| n.is_wall()) {
            n.kind = NodeKind::Empty;
            removed += 1;
        }
        removed
    }

    /// Number of nodes of the given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Verify that exactly one start and one target exist and match the
    /// recorded marker positions.
    pub fn check_invariants(&self) -> Result<()> {
        for (kind, at) in [(NodeKind::Start, self.start), (NodeKind::Target, self.target)] {
            let n = self.count(kind);
            if n != 1 {
                return Err(Error::InvariantViolation(format!(
                    "expected one {kind:?} node, found {n}"
                )));
            }
            if self.kind(at) != Some(kind) {
                return Err(Error::InvariantViolation(format!(
                    "{kind:?} recorded at {at} but not present there"
                )));
            }
        }
        Ok(())
    }

    /// A fresh board of a new size.
    ///
    /// Markers are clamped into the new bounds; walls, weights and animation
    /// are dropped. If clamping makes the markers collide the target moves to
    /// the first free neighbour of the start.
    pub fn resized(&self, rows: i32, cols: i32) -> Result<Self> {
        let bounds = Bounds::new(rows, cols);
        if bounds.is_empty() {
            return Err(Error::EmptyBoard(bounds));
        }
        let start = bounds.clamp(self.start);
        let mut target = bounds.clamp(self.target);
        if target == start {
            target = start
                .neighbors_4()
                .into_iter()
                .find(|p| bounds.contains(*p))
                .ok_or(Error::SamePosition(start))?;
        }
        Self::new(rows, cols, start, target)
    }

    /// Row-major iterator over `(Pos, &Node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Node)> + '_ {
        self.bounds.iter().zip(self.nodes.iter())
    }
}

impl fmt::Display for Grid {
    /// Render the board as text, one character per cell. Markers and walls
    /// use the [`from_ascii`](Grid::from_ascii) characters; path cells show
    /// `*` and touched cells `o`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                let Some(n) = self.node(Pos::new(r, c)) else {
                    continue;
                };
                let ch = match (n.kind, n.anim) {
                    (NodeKind::Start, _) => 'S',
                    (NodeKind::Target, _) => 'T',
                    (NodeKind::Wall, _) => '#',
                    (NodeKind::Empty, AnimState::Path) => '*',
                    (NodeKind::Empty, AnimState::Touched) => 'o',
                    (NodeKind::Empty, AnimState::Idle) => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
