//! **pathviz-core**: board model and application plumbing for the pathviz
//! shortest-path visualizer.
//!
//! This crate provides the types shared by the rest of the workspace:
//! geometry, the [`Grid`] of [`Node`]s with its single-start/single-target
//! invariant, the pointer-drag [`Interaction`] state machine, input messages,
//! and the Elm-architecture application loop.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod interaction;
pub mod messages;
pub mod node;

pub use app::{App, AppConfig, Context, Driver, DriverError, Effect, Model};
pub use canvas::{Canvas, Cell, Color, Frame, FrameCell, Style};
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use geom::{Bounds, Pos};
pub use grid::Grid;
pub use interaction::{Button, DragMode, Interaction, PointerEvent};
pub use messages::*;
pub use node::{AnimState, Node, NodeKind, UNREACHABLE};
