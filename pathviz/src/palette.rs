//! Colours and glyphs for the terminal board.
//!
//! RGB values picked to read well on a dark terminal background.

use pathviz_core::{AnimState, Cell, Color, Node, NodeKind, Style};

// -- Chrome --

pub const FG: Color = Color::DEFAULT;
pub const BG: Color = Color::DEFAULT;
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
pub const STATUS_BG: Color = Color::from_rgb(40, 42, 54);

// -- Board --

pub const EMPTY_FG: Color = Color::from_rgb(70, 74, 84);
pub const WALL_BG: Color = Color::from_rgb(150, 155, 170);
pub const START_FG: Color = Color::from_rgb(80, 200, 80);
pub const TARGET_FG: Color = Color::from_rgb(255, 85, 85);
pub const TOUCHED_BG: Color = Color::from_rgb(40, 90, 120);
pub const PATH_BG: Color = Color::from_rgb(220, 200, 60);
pub const PATH_FG: Color = Color::from_rgb(40, 42, 54);

// -- Status line --

pub const IDLE_FG: Color = Color::from_rgb(110, 115, 125);
pub const RUNNING_FG: Color = Color::from_rgb(80, 210, 210);
pub const FOUND_FG: Color = START_FG;
pub const NO_PATH_FG: Color = TARGET_FG;

/// How one board node is drawn.
pub fn node_cell(node: &Node) -> Cell {
    let base = Style::default();
    match (node.kind(), node.anim) {
        (NodeKind::Start, _) => Cell::new('S', base.with_fg(START_FG).with_bold(true)),
        (NodeKind::Target, _) => Cell::new('T', base.with_fg(TARGET_FG).with_bold(true)),
        (NodeKind::Wall, _) => Cell::new(' ', base.with_bg(WALL_BG)),
        (NodeKind::Empty, AnimState::Path) => {
            Cell::new('*', base.with_fg(PATH_FG).with_bg(PATH_BG).with_bold(true))
        }
        (NodeKind::Empty, AnimState::Touched) => Cell::new(' ', base.with_bg(TOUCHED_BG)),
        (NodeKind::Empty, AnimState::Idle) => Cell::new('·', base.with_fg(EMPTY_FG)),
    }
}
