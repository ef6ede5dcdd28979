//! pathviz: watch Dijkstra's algorithm explore a grid, in a terminal.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathviz_anim::Timing;
use pathviz_core::{App, AppConfig, BoardConfig, Pos};
use pathviz_crossterm::CrosstermDriver;
use pathviz_lib::{Board, BoardOptions};

#[derive(Parser, Debug)]
#[command(name = "pathviz")]
#[command(about = "Draw walls, move the markers, and watch Dijkstra find the way", long_about = None)]
struct Args {
    /// Board rows
    #[arg(long, default_value_t = BoardConfig::default().rows)]
    rows: i32,

    /// Board columns
    #[arg(long, default_value_t = BoardConfig::default().cols)]
    cols: i32,

    /// Start cell as ROW,COL
    #[arg(long, default_value_t = BoardConfig::default().start.to_string())]
    start: String,

    /// Target cell as ROW,COL
    #[arg(long, default_value_t = BoardConfig::default().target.to_string())]
    target: String,

    /// Milliseconds per animation tick
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Ticks between two explored cells
    #[arg(long, default_value_t = Timing::default().touch_step)]
    touch_step: u64,

    /// Ticks between two path cells
    #[arg(long, default_value_t = Timing::default().path_step)]
    path_step: u64,

    /// Fraction of empty cells walled by a scatter (`r`)
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Seed for obstacle scatter; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn board_config(&self) -> Result<BoardConfig, pathviz_core::Error> {
        Ok(BoardConfig {
            rows: self.rows,
            cols: self.cols,
            start: self.start.parse::<Pos>()?,
            target: self.target.parse::<Pos>()?,
        })
    }
}

/// Route `log` records to `path`. The terminal belongs to the UI, so without
/// a file nothing is logged.
fn init_logging(path: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = args.board_config()?;
    if let Err(err) = config.validate() {
        log::error!("invalid board {config:?}: {err}");
        return Err(err.into());
    }
    let grid = config.build()?;

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    log::info!("starting with {config:?}, seed {seed}");

    let mut model = Board::new(
        grid,
        BoardOptions {
            timing: Timing::new(args.touch_step, args.path_step),
            density: args.density,
            seed,
        },
    );
    let driver = CrosstermDriver::new().with_tick(Duration::from_millis(args.tick_ms));
    let (rows, cols) = CrosstermDriver::size()?;
    model.fit(rows, cols);
    let mut app = App::new(AppConfig {
        model,
        driver,
        rows,
        cols,
    });
    app.run()?;
    Ok(())
}
