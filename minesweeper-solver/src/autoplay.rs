use tracing::{debug, info};

use crate::agent::{Agent, Move};
use crate::board::Cell;
use crate::config::GameConfig;
use crate::error::AutoplayError;
use crate::game::{Game, GameSetupBuilder, Reveal};
use crate::knowledge::KnowledgeBase;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Outcome {
  Won,
  Exploded(Cell),
  /// No move left although the game is not won.
  Stuck,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameReport {
  pub outcome: Outcome,
  pub moves: u32,
  pub safe_moves: u32,
  pub random_moves: u32,
  pub flagged: u32,
}

/// Plays one game to the end. The first probe is guaranteed safe; every
/// later guess may explode.
///
/// `on_step` sees the board and knowledge after each move.
pub fn play(
  config: &GameConfig,
  mut on_step: impl FnMut(Move, &Game, &KnowledgeBase),
) -> Result<GameReport, AutoplayError> {
  config.validate()?;
  let dims = config.dims();
  let mut agent = Agent::new(dims, config.seed);

  let mut pending = agent.next_move();
  let mut builder = GameSetupBuilder::new(dims);
  if let Some(seed) = config.seed {
    builder = builder.with_seed(seed);
  }
  if let Some(first) = pending {
    builder.protect(first.cell());
  }
  if !builder.add_random_mines(config.mines) {
    return Err(AutoplayError::MinePlacement(config.mines));
  }
  let mut game = Game::from(&builder);
  debug!(?dims, mines = config.mines, "board ready");

  let mut report = GameReport {
    outcome: Outcome::Stuck,
    moves: 0,
    safe_moves: 0,
    random_moves: 0,
    flagged: 0,
  };

  loop {
    if game.is_won() {
      report.outcome = Outcome::Won;
      break;
    }
    let Some(next) = pending.take().or_else(|| agent.next_move()) else {
      break;
    };

    report.moves += 1;
    match next {
      Move::Safe(_) => report.safe_moves += 1,
      Move::Random(_) => report.random_moves += 1,
    }

    let cell = next.cell();
    match game.open(cell)? {
      Reveal::Exploded => {
        report.outcome = Outcome::Exploded(cell);
        on_step(next, &game, agent.knowledge());
        break;
      }
      Reveal::Opened(opened) => {
        for (opened, count) in opened {
          agent.observe(opened, count)?;
        }
      }
    }

    let unflagged: Vec<_> = agent
      .knowledge()
      .known_mine()
      .iter()
      .copied()
      .filter(|&mine| !game.is_flagged(mine))
      .collect();
    for mine in unflagged {
      game.flag(mine)?;
    }

    on_step(next, &game, agent.knowledge());
  }

  report.flagged = game.mines_flagged();
  info!(
    outcome = ?report.outcome,
    moves = report.moves,
    guesses = report.random_moves,
    flagged = report.flagged,
    "game finished"
  );
  Ok(report)
}
