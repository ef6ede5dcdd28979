//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`CrosstermDriver`] that implements [`pathviz_core::Driver`]:
//! terminal input becomes [`Msg`]s, a fixed-rate [`Msg::Tick`] drives
//! animations, and computed frames are painted cell by cell.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, warn};

use pathviz_core::{Color, Context, Driver, DriverError, Frame, Key, MouseAction, Msg, Pos};

/// Default interval between two [`Msg::Tick`]s.
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// Maps a crossterm [`KeyCode`] to a pathviz [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Translate one terminal event. Screen cells map to `Pos { row: line, col:
/// column }`.
fn to_msg(ev: Event, time: Instant) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent { code, kind, .. }) => {
            if kind == KeyEventKind::Release {
                return None;
            }
            to_key(code).map(|key| Msg::KeyDown { key, time })
        }
        Event::Mouse(me) => {
            let pos = Pos::new(i32::from(me.row), i32::from(me.column));
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Down(MouseButton::Middle) => MouseAction::Auxiliary,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::Mouse { action, pos, time })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            rows: i32::from(h),
            cols: i32::from(w),
            time,
        }),
        _ => None,
    }
}

/// A terminal back-end for pathviz using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    tick: Duration,
    next_tick: Instant,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            tick: DEFAULT_TICK,
            next_tick: Instant::now(),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Interval between two ticks. Zero is raised to one millisecond.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Current terminal size as `(rows, cols)`.
    pub fn size() -> io::Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((i32::from(h), i32::from(w)))
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), DriverError> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        self.next_tick = Instant::now() + self.tick;
        debug!("terminal initialised, tick every {:?}", self.tick);
        Ok(())
    }

    fn poll_msgs(&mut self, ctx: &Context, tx: &Sender<Msg>) -> Result<(), DriverError> {
        let now = Instant::now();
        if now >= self.next_tick {
            self.next_tick = now + self.tick;
            tx.send(Msg::tick(now)).ok();
            return Ok(());
        }

        // Wait for input, but never past the next tick.
        if !event::poll(self.next_tick - now)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(m) = to_msg(event::read()?, Instant::now()) {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), DriverError> {
        let mut stdout = io::stdout().lock();

        for fc in &frame.cells {
            let (Ok(row), Ok(col)) = (u16::try_from(fc.pos.row), u16::try_from(fc.pos.col)) else {
                warn!("skipping cell at {}", fc.pos);
                continue;
            };
            let cell = &fc.cell;
            queue!(
                stdout,
                cursor::MoveTo(col, row),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;
            if cell.style.bold {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            write!(stdout, "{}", cell.ch)?;
            if cell.style.bold {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
