use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tictactoe::{minimax, Action, Board, Mark};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
  X,
  O,
}

impl From<Side> for Mark {
  fn from(side: Side) -> Self {
    match side {
      Side::X => Mark::X,
      Side::O => Mark::O,
    }
  }
}

/// Play Tic-Tac-Toe against a minimax player, or watch it play itself.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// Side played from the keyboard; omit for self-play.
  #[arg(long, value_enum)]
  human: Option<Side>,

  /// Seed for the opening move.
  #[arg(short, long)]
  seed: Option<u64>,
}

fn main() {
  if let Err(err) = run() {
    eprintln!("Error: {err:#}");
    std::process::exit(1);
  }
}

fn read_action(input: &mut impl BufRead) -> anyhow::Result<Action> {
  loop {
    print!("Your move (row col): ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
      bail!("input closed");
    }
    let parts: Vec<_> = line.split_whitespace().map(str::parse::<usize>).collect();
    match parts.as_slice() {
      [Ok(row), Ok(col)] => return Ok((*row, *col)),
      _ => println!("Enter two numbers between 0 and 2."),
    }
  }
}

fn run() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  let human = args.human.map(Mark::from);
  let mut rng = match args.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let mut input = io::stdin().lock();
  let mut board = Board::new();

  while !board.is_terminal() {
    println!("{board}");
    let player = board.player();
    if Some(player) == human {
      let action = read_action(&mut input)?;
      match board.result(action) {
        Ok(next) => board = next,
        Err(err) => println!("{err}"),
      }
    } else {
      let action = minimax(&board, &mut rng).context("no move on an unfinished board")?;
      println!("{player} plays {action:?}");
      board = board.result(action)?;
    }
  }

  println!("{board}");
  match board.winner() {
    Some(mark) => println!("Game over: {mark} wins."),
    None => println!("Game over: tie."),
  }
  Ok(())
}
