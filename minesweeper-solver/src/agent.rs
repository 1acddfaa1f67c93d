use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::board::{Cell, Dimensions};
use crate::error::KnowledgeError;
use crate::knowledge::{Deductions, KnowledgeBase};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Move {
  /// Proven safe by the knowledge base.
  Safe(Cell),
  /// A guess among unprobed cells not known to be mines.
  Random(Cell),
}

impl Move {
  pub fn cell(self) -> Cell {
    match self {
      Move::Safe(cell) | Move::Random(cell) => cell,
    }
  }
}

/// Picks probes for one board: proven-safe cells first, otherwise a guess.
pub struct Agent {
  knowledge: KnowledgeBase,
  rng: StdRng,
}

impl Agent {
  pub fn new(dims: Dimensions, seed: Option<u64>) -> Self {
    Self {
      knowledge: KnowledgeBase::new(dims),
      rng: match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
      },
    }
  }

  pub fn knowledge(&self) -> &KnowledgeBase {
    &self.knowledge
  }

  pub fn observe(&mut self, cell: Cell, count: u8) -> Result<Deductions, KnowledgeError> {
    self.knowledge.observe(cell, count)
  }

  /// `None` once every cell is either probed or a known mine.
  pub fn next_move(&mut self) -> Option<Move> {
    let next = match self.knowledge.safe_move() {
      Some(cell) => Some(Move::Safe(cell)),
      None => self.knowledge.random_move(&mut self.rng).map(Move::Random),
    };
    trace!(?next, "next move");
    next
  }
}
