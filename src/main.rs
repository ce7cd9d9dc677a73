use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, WriteLogger};

use snake::config::{Settings, Validate};
use snake::game::Game;
use snake::runner::{self, Ticker};
use snake::term::{Keyboard, TermManager};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// YAML settings file, defaults are used if it does not exist
    #[arg(long, default_value = "snake.yaml")]
    config: PathBuf,

    /// Ticks per second, overrides the settings file
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for food placement and headings
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Print the effective settings as YAML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)?;
    if let Some(tick_rate) = cli.tick_rate {
        settings.tick_rate = tick_rate;
        settings.validate().map_err(|e| anyhow::anyhow!("Invalid --tick-rate: {}", e))?;
    }

    if cli.print_config {
        print!("{}", settings.to_yaml()?);
        return Ok(());
    }

    // The terminal is the game screen, so logs go to a file
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file).context("Failed to initialize logger")?;

    info!("Starting snake with {:?}", settings);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let grid = settings.grid()?;

    // Check the board fits the terminal before anything else depends on it
    let mut term = TermManager::new(grid, &settings.colors).inspect_err(|e| error!("{:#}", e))?;
    let mut game = Game::new(grid, rng)?;

    let result = term
        .setup(&settings.title)
        .and_then(|()| runner::run(&mut game, &mut Keyboard, &mut term, &mut Ticker::new(settings.tick_rate)));

    // Leave the alternate screen before any error gets printed, even if setup stopped halfway
    term.restore()?;

    let ticks = result?;
    info!("Played {} ticks", ticks);

    Ok(())
}
