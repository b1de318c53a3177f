//! Terminal host for the Game of Life engine.

mod app;
mod command;
mod renderer;
mod telemetry;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use command::Command;
use life_core::ConsoleConfig;
use life_engine::GameOfLife;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use renderer::{TextRenderer, TextStyle};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "life-console",
    author,
    version,
    about = "Conway's Game of Life in the terminal",
    long_about = "Runs the Game of Life on a bounded grid and draws each generation to stdout.\n\nCommands are read from stdin, one per line:\n  p            pause / resume\n  t ROW COL    toggle a cell (while paused)\n  r            randomize the grid\n  s PATH       save the grid\n  l PATH       load a grid\n  q            quit"
)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a saved grid instead of a generated one
    #[arg(short, long)]
    load: Option<PathBuf>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    cols: Option<usize>,

    /// Stop after this many generations
    #[arg(short, long)]
    max_generations: Option<u64>,

    /// Seed for the random initial grid
    #[arg(long)]
    seed: Option<u64>,

    /// Delay between frames in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Start from an empty, paused grid for manual editing
    #[arg(long)]
    empty: bool,

    /// Write the final grid here on exit
    #[arg(long)]
    save_on_exit: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(ConsoleConfig, Option<PathBuf>, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => ConsoleConfig::from_json_file(path)
                .with_context(|| format!("reading configuration {:?}", path))?,
            None => ConsoleConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.engine.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.engine.cols = cols;
        }
        if self.max_generations.is_some() {
            config.engine.max_generations = self.max_generations;
        }
        if self.seed.is_some() {
            config.engine.seed = self.seed;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.empty {
            config.engine.randomize = false;
        }
        config.engine.validate()?;

        Ok((config, self.load, self.save_on_exit))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let start_paused = cli.empty;
    let (config, load, save_on_exit) = cli.into_config()?;

    telemetry::init_tracing(&config.log_filter)?;

    let game = build_game(&config, load.as_deref())?;
    info!(
        size = %game.size(),
        max_generations = ?game.max_generations(),
        "Starting Game of Life"
    );

    let (tx, rx) = mpsc::unbounded_channel();
    // Blocking stdin reads must not hold up runtime shutdown
    std::thread::spawn(move || read_commands(tx));

    let renderer = TextRenderer::new(std::io::stdout(), TextStyle::from(&config), rx)
        .with_clear_screen(true);
    let rng = match config.engine.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let app = App::new(game, renderer, rng)
        .paused(start_paused)
        .stop_when_settled(config.stop_when_settled);
    let game = app.run(Duration::from_millis(config.tick_ms)).await?;

    info!(generation = game.generations(), "Simulation finished");

    if let Some(path) = save_on_exit {
        game.save(&path)
            .with_context(|| format!("saving grid {:?}", path))?;
    }

    Ok(())
}

/// Load or generate the starting engine. A saved grid carries no cap, so the
/// configured one is applied on top.
fn build_game(config: &ConsoleConfig, load: Option<&Path>) -> Result<GameOfLife> {
    let game = match load {
        Some(path) => GameOfLife::from_file(path)
            .and_then(|game| game.with_max_generations(config.engine.max_generations))
            .with_context(|| format!("loading grid {:?}", path))?,
        None => GameOfLife::from_config(&config.engine)?,
    };
    Ok(game)
}

/// Parse stdin lines into commands until stdin closes or the loop is gone
fn read_commands(tx: mpsc::UnboundedSender<Command>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Ignoring input {:?}: {}", line, e),
        }
    }
}
