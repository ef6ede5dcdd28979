//! Input events: [`Msg`], [`Key`], [`MouseAction`].

use std::time::Instant;

use crate::geom::Pos;

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Backspace,
    Delete,
    /// A printable character.
    Char(char),
}

/// A pointer action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Primary (left) button pressed.
    Main,
    /// Middle button pressed.
    Auxiliary,
    /// Secondary (right) button pressed.
    Secondary,
    /// Button released.
    Release,
    /// Pointer moved, with or without a button held.
    Move,
}

/// An input message delivered to the application model.
#[derive(Clone, Debug)]
pub enum Msg {
    /// A key was pressed.
    KeyDown { key: Key, time: Instant },
    /// A pointer event at a screen cell (`row` = line, `col` = column).
    Mouse {
        action: MouseAction,
        pos: Pos,
        time: Instant,
    },
    /// The screen was resized to `rows × cols` cells.
    Screen { rows: i32, cols: i32, time: Instant },
    /// Periodic clock message used to advance animations.
    Tick { time: Instant },
    /// Sent once when the application starts.
    Init,
    /// Request to quit.
    Quit,
}

impl Msg {
    /// Convenience: a `KeyDown` stamped now.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            time: Instant::now(),
        }
    }

    /// Convenience: a `Mouse` event stamped now.
    pub fn mouse(action: MouseAction, pos: Pos) -> Self {
        Self::Mouse {
            action,
            pos,
            time: Instant::now(),
        }
    }

    /// Convenience: a `Tick` stamped at `time`.
    pub fn tick(time: Instant) -> Self {
        Self::Tick { time }
    }
}
