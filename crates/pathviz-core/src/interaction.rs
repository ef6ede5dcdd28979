//! Pointer-drag state machine for editing a [`Grid`].
//!
//! A button press picks a [`DragMode`] from the button and the pressed cell,
//! and applies the first edit. Entering further cells while the button is
//! held repeats the edit there. Releasing the button or leaving the board
//! ends the drag.
//!
//! Markers are only ever moved, never painted over: wall edits skip the start
//! and target cells, and relocation goes through [`Grid::set_kind`], which
//! keeps exactly one of each marker on the board.

use log::trace;

use crate::geom::Pos;
use crate::grid::Grid;
use crate::messages::MouseAction;
use crate::node::NodeKind;

/// A pointer button that can start a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
}

impl Button {
    /// The button pressed by a mouse action, if any.
    pub fn from_action(action: MouseAction) -> Option<Self> {
        match action {
            MouseAction::Main => Some(Self::Primary),
            MouseAction::Secondary => Some(Self::Secondary),
            MouseAction::Auxiliary | MouseAction::Release | MouseAction::Move => None,
        }
    }
}

/// What a held pointer currently does to the cells it enters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragMode {
    #[default]
    Idle,
    AddingWalls,
    RemovingWalls,
    MovingStart,
    MovingTarget,
}

/// A pointer event expressed in board coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// A button went down over `pos`.
    Down { pos: Pos, button: Button },
    /// The pointer entered `pos`. Positions outside the board count as
    /// leaving it.
    Enter(Pos),
    /// The button was released.
    Up,
    /// The pointer left the board.
    Leave,
}

/// The drag state machine.
#[derive(Debug, Default, Clone)]
pub struct Interaction {
    mode: DragMode,
    last: Option<Pos>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag mode.
    #[inline]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Whether a drag is in progress.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.mode != DragMode::Idle
    }

    /// Feed one pointer event. Returns `true` if the grid changed.
    pub fn handle(&mut self, grid: &mut Grid, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { pos, button } => self.press(grid, pos, button),
            PointerEvent::Enter(pos) => self.enter(grid, pos),
            PointerEvent::Up | PointerEvent::Leave => {
                self.cancel();
                false
            }
        }
    }

    /// Start a drag at `pos`.
    ///
    /// The primary button grabs a marker, erases a wall, or paints a wall on
    /// an empty cell. The secondary button only erases walls.
    pub fn press(&mut self, grid: &mut Grid, pos: Pos, button: Button) -> bool {
        self.cancel();
        let Some(kind) = grid.kind(pos) else {
            return false;
        };
        self.mode = match (button, kind) {
            (Button::Primary, NodeKind::Start) => DragMode::MovingStart,
            (Button::Primary, NodeKind::Target) => DragMode::MovingTarget,
            (Button::Primary, NodeKind::Empty) => DragMode::AddingWalls,
            (Button::Primary, NodeKind::Wall) => DragMode::RemovingWalls,
            (Button::Secondary, NodeKind::Empty | NodeKind::Wall) => DragMode::RemovingWalls,
            (Button::Secondary, NodeKind::Start | NodeKind::Target) => DragMode::Idle,
        };
        trace!("press {pos} with {button:?} on {kind:?}: {:?}", self.mode);
        self.last = Some(pos);
        self.apply(grid, pos)
    }

    /// Continue the drag into `pos`.
    pub fn enter(&mut self, grid: &mut Grid, pos: Pos) -> bool {
        if !grid.contains(pos) {
            self.cancel();
            return false;
        }
        if self.mode == DragMode::Idle || self.last == Some(pos) {
            return false;
        }
        self.last = Some(pos);
        self.apply(grid, pos)
    }

    /// End the drag without further edits.
    pub fn cancel(&mut self) {
        if self.mode != DragMode::Idle {
            trace!("drag {:?} ended", self.mode);
        }
        self.mode = DragMode::Idle;
        self.last = None;
    }

    fn apply(&mut self, grid: &mut Grid, pos: Pos) -> bool {
        let Some(kind) = grid.kind(pos) else {
            return false;
        };
        let wanted = match (self.mode, kind) {
            (DragMode::Idle, _) => return false,
            (DragMode::AddingWalls, NodeKind::Empty) => NodeKind::Wall,
            (DragMode::RemovingWalls, NodeKind::Wall) => NodeKind::Empty,
            (DragMode::AddingWalls | DragMode::RemovingWalls, _) => return false,
            // The other marker blocks relocation; the dragged one stays put.
            (DragMode::MovingStart, NodeKind::Target) => return false,
            (DragMode::MovingTarget, NodeKind::Start) => return false,
            (DragMode::MovingStart, _) => NodeKind::Start,
            (DragMode::MovingTarget, _) => NodeKind::Target,
        };
        if wanted == kind {
            return false;
        }
        grid.set_kind(pos, wanted).is_ok()
    }
}
