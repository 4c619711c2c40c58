use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{Config, WriteLogger};
use term_snake::game::config::MIN_LEVEL;
use term_snake::game::{ConfigFile, GameConfig, GameEngine, GridBounds};
use term_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Snake on a wrap-around terminal grid")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty level, 1-8 (out-of-range values are clamped)
    #[arg(long)]
    level: Option<u32>,

    /// Grid width (defaults to the terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Grid height (defaults to the terminal height minus the status rows)
    #[arg(long)]
    height: Option<u16>,

    /// Seed for food placement, for repeatable rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal itself is taken by the game
    #[arg(long, default_value = "term_snake.log")]
    log_file: PathBuf,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    merge_config(cli, &file, terminal_bounds)
}

fn terminal_bounds() -> Result<GridBounds> {
    let (cols, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;
    GridBounds::for_terminal(cols, rows).context("Terminal is too small")
}

/// Flags win over the config file; the terminal supplies any grid dimension
/// neither of them sets.
fn merge_config(
    cli: &Cli,
    file: &ConfigFile,
    terminal: impl FnOnce() -> Result<GridBounds>,
) -> Result<GameConfig> {
    let width = cli.width.or(file.grid_width);
    let height = cli.height.or(file.grid_height);

    let (grid_width, grid_height) = match (width, height) {
        (Some(width), Some(height)) => (width, height),
        _ => {
            let bounds = terminal()?;
            (
                width.unwrap_or(bounds.width()),
                height.unwrap_or(bounds.height()),
            )
        }
    };

    let config = GameConfig {
        grid_height,
        grid_width,
        level: cli.level.or(file.level).unwrap_or(MIN_LEVEL),
    };
    Ok(config.normalized())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = build_config(&cli)?;
    info!(
        "Starting term_snake: {}x{} grid, level {}",
        config.grid_height, config.grid_width, config.level
    );

    match cli.seed {
        Some(seed) => {
            let engine = GameEngine::with_rng(config, StdRng::seed_from_u64(seed))
                .context("Cannot start a round")?;
            HumanMode::with_engine(engine)?.run().await?;
        }
        None => {
            HumanMode::new(config)?.run().await?;
        }
    }

    Ok(())
}
