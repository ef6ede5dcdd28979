//! The [`Node`] type: one cell of the board.

use crate::geom::Pos;

/// Sentinel distance meaning "not reached yet".
pub const UNREACHABLE: u32 = u32::MAX;

/// What occupies a cell. Exactly one cell of a valid grid is
/// [`Start`](NodeKind::Start) and exactly one is [`Target`](NodeKind::Target).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    #[default]
    Empty,
    Wall,
    Start,
    Target,
}

impl NodeKind {
    /// Whether this kind is one of the two unique markers.
    #[inline]
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::Start | Self::Target)
    }
}

/// Presentational state written by the animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimState {
    #[default]
    Idle,
    Touched,
    Path,
}

/// A board cell: its kind, entry cost and search-derived fields.
///
/// The search fields (`distance`, `predecessor`, `visited`) only carry meaning
/// inside the working copy owned by a running search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub anim: AnimState,
    pub(crate) weight: u32,
    pub distance: u32,
    pub predecessor: Option<Pos>,
    pub visited: bool,
}

impl Node {
    /// A node of the given kind with default weight and cleared search state.
    #[inline]
    pub const fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            anim: AnimState::Idle,
            weight: 1,
            distance: UNREACHABLE,
            predecessor: None,
            visited: false,
        }
    }

    /// What occupies the cell. Only [`Grid`](crate::Grid) may change it.
    #[inline]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Cost to enter this cell. Always > 0.
    #[inline]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    #[inline]
    pub const fn is_wall(&self) -> bool {
        matches!(self.kind, NodeKind::Wall)
    }

    /// Clear distance, predecessor, visited flag and animation state.
    #[inline]
    pub fn reset_search(&mut self) {
        self.distance = UNREACHABLE;
        self.predecessor = None;
        self.visited = false;
        self.anim = AnimState::Idle;
    }
}

impl Default for Node {
    #[inline]
    fn default() -> Self {
        Self::with_kind(NodeKind::Empty)
    }
}
