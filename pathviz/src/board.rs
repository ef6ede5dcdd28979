//! The interactive board: an Elm-architecture [`Model`] tying the grid,
//! pointer editing, search and replay together.

use std::fmt;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use pathviz_anim::{AnimationHandler, Scheduler, Timing};
use pathviz_core::{
    AnimState, Bounds, Button, Canvas, Cell, Effect, Grid, Interaction, Key, Model, MouseAction,
    Msg, NodeKind, PointerEvent, Pos, Style,
};

use crate::obstacles;
use crate::palette::*;

/// Screen cell of board position (0, 0). Row 0 holds the status line.
pub const BOARD_ORIGIN: Pos = Pos::new(1, 0);
/// Screen rows used by the status and help lines.
pub const CHROME_ROWS: i32 = 2;

const HELP_TEXT: &str =
    " enter run · c clear walls · x clear path · r scatter · s skip · q quit";

/// Where the board is in its search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Found { moves: usize, cost: u32 },
    NoPath,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Found { moves, cost } => {
                write!(f, "finished: path of {moves} step(s), cost {cost}")
            }
            Self::NoPath => write!(f, "finished: no path"),
        }
    }
}

/// Knobs for a [`Board`] beyond its initial grid.
#[derive(Debug, Clone, Copy)]
pub struct BoardOptions {
    pub timing: Timing,
    /// Fraction of empty cells turned into walls by a scatter.
    pub density: f64,
    pub seed: u64,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            density: 0.3,
            seed: 0,
        }
    }
}

/// Applies replay events to the board grid.
struct Painter<'a> {
    grid: &'a mut Grid,
    finished: Option<bool>,
}

impl<'a> Painter<'a> {
    fn new(grid: &'a mut Grid) -> Self {
        Self {
            grid,
            finished: None,
        }
    }
}

impl AnimationHandler for Painter<'_> {
    fn on_touched(&mut self, pos: Pos) {
        self.grid.set_anim(pos, AnimState::Touched);
    }

    fn on_path(&mut self, pos: Pos) {
        self.grid.set_anim(pos, AnimState::Path);
    }

    fn on_finished(&mut self, found: bool) {
        self.finished = Some(found);
    }
}

/// The pathviz application model.
pub struct Board {
    grid: Grid,
    /// Largest board the screen may show; screen resizes never exceed it.
    preferred: Bounds,
    interaction: Interaction,
    scheduler: Scheduler,
    status: Status,
    /// Moves and cost of the path being replayed, if one was found.
    outcome: Option<(usize, u32)>,
    density: f64,
    rng: StdRng,
}

impl Board {
    pub fn new(grid: Grid, options: BoardOptions) -> Self {
        Self {
            preferred: grid.bounds(),
            grid,
            interaction: Interaction::new(),
            scheduler: Scheduler::new(options.timing),
            status: Status::Idle,
            outcome: None,
            density: options.density,
            rng: StdRng::seed_from_u64(options.seed),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        match key {
            Key::Enter | Key::Space => self.run_search(),
            Key::Char('c') => self.clear_walls(),
            Key::Char('x') => self.clear_path(),
            Key::Char('r') => self.scatter(),
            Key::Char('s') => self.skip(),
            Key::Char('q') | Key::Escape => return Some(Effect::End),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Pos) {
        let bp = pos - BOARD_ORIGIN;
        let event = match action {
            MouseAction::Main | MouseAction::Secondary => {
                let Some(button) = Button::from_action(action) else {
                    return;
                };
                PointerEvent::Down { pos: bp, button }
            }
            MouseAction::Move => PointerEvent::Enter(bp),
            MouseAction::Release => PointerEvent::Up,
            MouseAction::Auxiliary => return,
        };
        if self.is_running() {
            if matches!(event, PointerEvent::Down { .. }) {
                warn!("edit at {bp} ignored while a search is running");
            }
            return;
        }
        if self.interaction.handle(&mut self.grid, event) {
            self.invalidate();
            debug_assert!(self.grid.check_invariants().is_ok());
        }
    }

    /// Drop the replay state of a finished search after the board changed.
    fn invalidate(&mut self) {
        if self.status != Status::Idle {
            self.grid.clear_animation();
            self.status = Status::Idle;
            self.outcome = None;
        }
    }

    fn run_search(&mut self) {
        if self.is_running() {
            warn!("search already running");
            return;
        }
        self.interaction.cancel();
        self.grid.clear_animation();
        match pathviz_paths::run(&self.grid, self.grid.start()) {
            Ok(result) => {
                self.outcome = result.path_len().zip(result.cost);
                info!(
                    "search from {} to {}: {} cell(s) visited, {}",
                    self.grid.start(),
                    self.grid.target(),
                    result.visited.len(),
                    match self.outcome {
                        Some((moves, cost)) => format!("{moves} move(s), cost {cost}"),
                        None => "no path".to_owned(),
                    }
                );
                self.scheduler.schedule(&result.visited, result.path.as_deref());
                self.status = Status::Running;
            }
            Err(err) => warn!("search not started: {err}"),
        }
    }

    fn clear_walls(&mut self) {
        if self.is_running() {
            warn!("walls kept while a search is running");
            return;
        }
        let n = self.grid.clear_walls();
        debug!("cleared {n} wall(s)");
        self.invalidate();
    }

    fn clear_path(&mut self) {
        self.scheduler.cancel();
        self.grid.clear_animation();
        self.status = Status::Idle;
        self.outcome = None;
    }

    fn scatter(&mut self) {
        if self.is_running() {
            warn!("scatter ignored while a search is running");
            return;
        }
        self.invalidate();
        self.grid.clear_walls();
        if let Err(err) = obstacles::scatter(&mut self.grid, self.density, &mut self.rng) {
            warn!("scatter failed: {err}");
        }
    }

    fn skip(&mut self) {
        if !self.is_running() {
            return;
        }
        let mut painter = Painter::new(&mut self.grid);
        self.scheduler.finish_now(&mut painter);
        let finished = painter.finished;
        self.finish(finished);
    }

    fn tick(&mut self) {
        if !self.scheduler.is_active() {
            return;
        }
        let mut painter = Painter::new(&mut self.grid);
        self.scheduler.advance(1, &mut painter);
        let finished = painter.finished;
        self.finish(finished);
    }

    fn finish(&mut self, finished: Option<bool>) {
        let Some(found) = finished else {
            return;
        };
        self.status = match (found, self.outcome) {
            (true, Some((moves, cost))) => Status::Found { moves, cost },
            _ => Status::NoPath,
        };
        debug!("replay done: {}", self.status);
    }

    /// Fit the board to a `rows × cols` screen, capped at the configured
    /// size. A new size recreates the grid and drops any search state.
    pub fn fit(&mut self, rows: i32, cols: i32) {
        let rows = (rows - CHROME_ROWS).min(self.preferred.rows);
        let cols = cols.min(self.preferred.cols);
        if rows == self.grid.rows() && cols == self.grid.cols() {
            return;
        }
        match self.grid.resized(rows, cols) {
            Ok(grid) => {
                self.scheduler.cancel();
                self.interaction.cancel();
                self.grid = grid;
                self.status = Status::Idle;
                self.outcome = None;
                info!(
                    "board resized to {}, start {} target {}",
                    self.grid.bounds(),
                    self.grid.start(),
                    self.grid.target()
                );
            }
            Err(err) => warn!("board kept at {}: {err}", self.grid.bounds()),
        }
    }

    // -------------------------------------------------------------------
    // Draw
    // -------------------------------------------------------------------

    fn draw_status(&self, canvas: &mut Canvas) {
        let bar = Style::default().with_bg(STATUS_BG);
        let width = canvas.bounds().cols;
        for col in 0..width {
            canvas.set(Pos::new(0, col), Cell::new(' ', bar));
        }
        let mut col = canvas.print(Pos::new(0, 0), " pathviz │ ", bar.with_bold(true));
        let fg = match self.status {
            Status::Idle => IDLE_FG,
            Status::Running => RUNNING_FG,
            Status::Found { .. } => FOUND_FG,
            Status::NoPath => NO_PATH_FG,
        };
        col += canvas.print(
            Pos::new(0, col as i32),
            &self.status.to_string(),
            bar.with_fg(fg),
        );
        let info = format!(
            " │ {} · {} wall(s)",
            self.grid.bounds(),
            self.grid.count(NodeKind::Wall)
        );
        canvas.print(Pos::new(0, col as i32), &info, bar.with_fg(FG_DIM));
    }

    fn draw_board(&self, canvas: &mut Canvas) {
        for (p, node) in self.grid.iter() {
            canvas.set(p + BOARD_ORIGIN, node_cell(node));
        }
    }

    fn draw_help(&self, canvas: &mut Canvas) {
        let row = BOARD_ORIGIN.row + self.grid.rows();
        canvas.print(Pos::new(row, 0), HELP_TEXT, Style::default().with_fg(FG_DIM));
    }
}

impl Model for Board {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                info!(
                    "board {} ready, start {} target {}",
                    self.grid.bounds(),
                    self.grid.start(),
                    self.grid.target()
                );
                None
            }
            Msg::KeyDown { key, .. } => self.handle_key(key),
            Msg::Mouse { action, pos, .. } => {
                self.handle_mouse(action, pos);
                None
            }
            Msg::Screen { rows, cols, .. } => {
                self.fit(rows, cols);
                None
            }
            Msg::Tick { .. } => {
                self.tick();
                None
            }
            Msg::Quit => Some(Effect::End),
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.fill(Cell::new(' ', Style::default().with_fg(FG).with_bg(BG)));
        self.draw_status(canvas);
        self.draw_board(canvas);
        self.draw_help(canvas);
    }
}
