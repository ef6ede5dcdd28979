//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info};

use crate::canvas::{Canvas, Frame, compute_frame};
use crate::messages::Msg;

/// Boxed error used at the driver boundary.
pub type DriverError = Box<dyn std::error::Error>;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone)]
pub enum Effect {
    /// Feed another message back into the model.
    Msg(Box<Msg>),
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `canvas`.
    fn draw(&self, canvas: &mut Canvas);
}

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), DriverError>;

    /// Poll for input messages, sending them through `tx`. Implementations
    /// return promptly, and stop early once `ctx.is_done()`.
    fn poll_msgs(&mut self, ctx: &Context, tx: &Sender<Msg>) -> Result<(), DriverError>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), DriverError>;

    /// Restore the back-end to its original state.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Initial screen size in cells.
    pub rows: i32,
    pub cols: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    prev: Canvas,
    curr: Canvas,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            prev: Canvas::new(config.rows, config.cols),
            curr: Canvas::new(config.rows, config.cols),
        }
    }

    /// The model, for inspection after the loop ends.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the Model-View-Update loop until the model returns
    /// [`Effect::End`], a [`Msg::Quit`] arrives, or the driver fails.
    ///
    /// The driver is always closed before returning.
    pub fn run(&mut self) -> Result<(), DriverError> {
        self.driver.init()?;
        info!("application started");
        let result = self.event_loop();
        self.driver.close();
        info!("application stopped");
        result
    }

    fn event_loop(&mut self) -> Result<(), DriverError> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        loop {
            self.process_pending(&rx, &ctx)?;
            if ctx.is_done() {
                return Ok(());
            }
            self.driver.poll_msgs(&ctx, &tx)?;
        }
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(&mut self, rx: &Receiver<Msg>, ctx: &Context) -> Result<(), DriverError> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            let mut next = Some(msg);
            while let Some(msg) = next.take() {
                match &msg {
                    Msg::Quit => {
                        ctx.cancel();
                        return Ok(());
                    }
                    Msg::Screen { rows, cols, .. } => {
                        debug!("screen resized to {rows}x{cols}");
                        self.curr.resize(*rows, *cols);
                    }
                    _ => {}
                }
                match self.model.update(msg) {
                    Some(Effect::End) => {
                        ctx.cancel();
                        return Ok(());
                    }
                    Some(Effect::Msg(m)) => next = Some(*m),
                    None => {}
                }
                needs_draw = true;
            }
        }

        if needs_draw {
            self.model.draw(&mut self.curr);
            let frame = compute_frame(&self.prev, &self.curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            self.prev.clone_from(&self.curr);
        }
        Ok(())
    }
}
