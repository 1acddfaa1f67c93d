//! Tic-Tac-Toe rules and an optimal minimax player.

use core::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

pub const SIZE: usize = 3;

/// `(row, col)`, both in `0..SIZE`.
pub type Action = (usize, usize);

const LINES: [[Action; 3]; 8] = [
  [(0, 0), (0, 1), (0, 2)],
  [(1, 0), (1, 1), (1, 2)],
  [(2, 0), (2, 1), (2, 2)],
  [(0, 0), (1, 0), (2, 0)],
  [(0, 1), (1, 1), (2, 1)],
  [(0, 2), (1, 2), (2, 2)],
  [(0, 0), (1, 1), (2, 2)],
  [(0, 2), (1, 1), (2, 0)],
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mark {
  X,
  O,
}

impl Mark {
  pub fn other(self) -> Mark {
    match self {
      Mark::X => Mark::O,
      Mark::O => Mark::X,
    }
  }
}

impl fmt::Display for Mark {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Mark::X => write!(f, "X"),
      Mark::O => write!(f, "O"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
  #[error("{0:?} is off the board")]
  OutOfRange(Action),

  #[error("{0:?} is already taken")]
  Occupied(Action),

  #[error("the game is already over")]
  GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 9 cells of 'X', 'O' or '.', got {0:?}")]
pub struct ParseBoardError(String);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
  cells: [[Option<Mark>; SIZE]; SIZE],
}

impl Board {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, (row, col): Action) -> Option<Mark> {
    self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
  }

  fn marks(&self) -> impl Iterator<Item = Mark> + '_ {
    self.cells.iter().flatten().flatten().copied()
  }

  pub fn is_empty(&self) -> bool {
    self.marks().next().is_none()
  }

  /// X moves first; afterwards whoever has placed fewer marks.
  pub fn player(&self) -> Mark {
    let x = self.marks().filter(|&m| m == Mark::X).count();
    let o = self.marks().filter(|&m| m == Mark::O).count();
    if x > o {
      Mark::O
    } else {
      Mark::X
    }
  }

  /// Empty cells in row-major order; nothing once the game is over.
  pub fn actions(&self) -> Vec<Action> {
    if self.winner().is_some() {
      return Vec::new();
    }
    (0..SIZE)
      .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
      .filter(|&action| self.get(action).is_none())
      .collect()
  }

  /// The board after the side to move plays `action`.
  pub fn result(&self, action: Action) -> Result<Board, MoveError> {
    let (row, col) = action;
    if row >= SIZE || col >= SIZE {
      return Err(MoveError::OutOfRange(action));
    }
    if self.is_terminal() {
      return Err(MoveError::GameOver);
    }
    if self.cells[row][col].is_some() {
      return Err(MoveError::Occupied(action));
    }
    let mut next = *self;
    next.cells[row][col] = Some(self.player());
    Ok(next)
  }

  fn successors(&self) -> impl Iterator<Item = (Action, Board)> + '_ {
    self
      .actions()
      .into_iter()
      .filter_map(move |action| self.result(action).ok().map(|next| (action, next)))
  }

  pub fn winner(&self) -> Option<Mark> {
    LINES.iter().find_map(|line| {
      let first = self.get(line[0])?;
      line[1..].iter().all(|&cell| self.get(cell) == Some(first)).then_some(first)
    })
  }

  pub fn is_terminal(&self) -> bool {
    self.winner().is_some() || self.marks().count() == SIZE * SIZE
  }

  /// 1 if X has won, -1 if O has won, 0 otherwise.
  pub fn utility(&self) -> i32 {
    match self.winner() {
      Some(Mark::X) => 1,
      Some(Mark::O) => -1,
      None => 0,
    }
  }
}

impl FromStr for Board {
  type Err = ParseBoardError;

  /// Reads nine cells row by row; whitespace and `|` are ignored.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let cells: Vec<Option<Mark>> = s
      .chars()
      .filter(|c| !c.is_whitespace() && *c != '|')
      .map(|c| match c {
        'X' | 'x' => Ok(Some(Mark::X)),
        'O' | 'o' => Ok(Some(Mark::O)),
        '.' | '_' => Ok(None),
        _ => Err(ParseBoardError(s.to_string())),
      })
      .collect::<Result<_, _>>()?;
    if cells.len() != SIZE * SIZE {
      return Err(ParseBoardError(s.to_string()));
    }
    let mut board = Board::new();
    for (i, cell) in cells.into_iter().enumerate() {
      board.cells[i / SIZE][i % SIZE] = cell;
    }
    Ok(board)
  }
}

impl fmt::Debug for Board {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

impl fmt::Display for Board {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, row) in self.cells.iter().enumerate() {
      if i > 0 {
        writeln!(f, "-+-+-")?;
      }
      let row: Vec<String> = row
        .iter()
        .map(|cell| cell.map_or_else(|| " ".to_string(), |m| m.to_string()))
        .collect();
      writeln!(f, "{}", row.join("|"))?;
    }
    Ok(())
  }
}

/// Scores are scaled by remaining plies so faster wins rank higher.
fn value(board: &Board, depth: i32, mut alpha: i32, mut beta: i32) -> i32 {
  if board.is_terminal() {
    return board.utility() * (10 - depth);
  }

  match board.player() {
    Mark::X => {
      let mut best = i32::MIN;
      for (_, next) in board.successors() {
        best = best.max(value(&next, depth + 1, alpha, beta));
        alpha = alpha.max(best);
        if alpha >= beta {
          break;
        }
      }
      best
    }
    Mark::O => {
      let mut best = i32::MAX;
      for (_, next) in board.successors() {
        best = best.min(value(&next, depth + 1, alpha, beta));
        beta = beta.min(best);
        if alpha >= beta {
          break;
        }
      }
      best
    }
  }
}

/// The optimal move for the side to play, or `None` if the game is over.
///
/// Every opening is a draw under perfect play, so an empty board gets a
/// random move from `rng`.
pub fn minimax<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Action> {
  if board.is_terminal() {
    return None;
  }
  if board.is_empty() {
    return board.actions().choose(rng).copied();
  }

  let player = board.player();
  let mut best: Option<(Action, i32)> = None;
  for (action, next) in board.successors() {
    let score = value(&next, 1, i32::MIN, i32::MAX);
    let better = match (player, best) {
      (_, None) => true,
      (Mark::X, Some((_, s))) => score > s,
      (Mark::O, Some((_, s))) => score < s,
    };
    if better {
      best = Some((action, score));
    }
  }

  debug!(%player, ?best, "minimax");
  best.map(|(action, _)| action)
}
