use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minesweeper_solver::{play, GameConfig, Move, Outcome};
use tracing_subscriber::EnvFilter;

/// Let the knowledge-base agent play a game of Minesweeper.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// TOML file with `height`, `width`, `mines` and `seed`.
  #[arg(short, long, default_value = "minesweeper.toml")]
  config: PathBuf,

  #[arg(long)]
  height: Option<u32>,

  #[arg(long)]
  width: Option<u32>,

  #[arg(short, long)]
  mines: Option<u32>,

  /// Seed for both the mine layout and the agent's guesses.
  #[arg(short, long)]
  seed: Option<u64>,

  /// Only print the final result.
  #[arg(short, long)]
  quiet: bool,
}

impl Args {
  fn game_config(&self) -> anyhow::Result<GameConfig> {
    let mut config = GameConfig::load_or_default(&self.config)
      .with_context(|| format!("loading {}", self.config.display()))?;
    config.height = self.height.unwrap_or(config.height);
    config.width = self.width.unwrap_or(config.width);
    config.mines = self.mines.unwrap_or(config.mines);
    config.seed = self.seed.or(config.seed);
    config.validate()?;
    Ok(config)
  }
}

fn main() {
  if let Err(err) = run() {
    eprintln!("Error: {err:#}");
    std::process::exit(1);
  }
}

fn run() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = args.game_config()?;

  let report = play(&config, |next, game, knowledge| {
    if args.quiet {
      return;
    }
    match next {
      Move::Safe(cell) => println!("Safe move {:?}", cell),
      Move::Random(cell) => println!("No known safe move, guessing {:?}", cell),
    }
    println!("{:?}", knowledge);
    println!("{:?}", game);
  })?;

  match report.outcome {
    Outcome::Won => println!("Win!"),
    Outcome::Exploded(cell) => println!("Hit a mine at {:?}", cell),
    Outcome::Stuck => println!("No moves left."),
  }
  println!(
    "{} moves ({} safe, {} guessed), {}/{} mines flagged",
    report.moves, report.safe_moves, report.random_moves, report.flagged, config.mines
  );

  Ok(())
}
