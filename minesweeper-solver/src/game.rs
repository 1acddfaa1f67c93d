use core::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, BoardExplorer, Cell, Dimensions};
use crate::error::GameError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Field {
  Mine,
  Empty(u8),
}

impl Field {
  pub fn is_mine(self) -> bool {
    matches!(self, Field::Mine)
  }

  pub fn is_blank(self) -> bool {
    matches!(self, Field::Empty(0))
  }

  pub fn count(self) -> Option<u8> {
    match self {
      Field::Mine => None,
      Field::Empty(mines) => Some(mines),
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Mine => write!(f, "X"),
      Field::Empty(0) => write!(f, " "),
      Field::Empty(mines) => write!(f, "{}", mines),
    }
  }
}

pub type GameBoard = Board<Field>;

/// Mine layout with every safe cell's adjacent mine count precomputed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameSetup {
  board: GameBoard,
  mines: u32,
}

impl GameSetup {
  pub fn new(mines: &Board<bool>) -> Self {
    let mut board = GameBoard::new(mines.dims, Field::Empty(0));
    let mut count = 0;
    for (pos, &is_mine) in mines.enumerate() {
      board[pos] = if is_mine {
        count += 1;
        Field::Mine
      } else {
        Field::Empty(mines.get_around(pos).filter(|&&m| m).count() as u8)
      };
    }

    GameSetup { board, mines: count }
  }

  pub fn dims(&self) -> Dimensions {
    self.board.dims
  }

  pub fn mines(&self) -> u32 {
    self.mines
  }

  pub fn is_mine(&self, cell: Cell) -> bool {
    self.board.get(cell).is_some_and(|field| field.is_mine())
  }

  /// `None` for mines and cells off the board.
  pub fn adjacent_mine_count(&self, cell: Cell) -> Option<u8> {
    self.board.get(cell).and_then(|field| field.count())
  }
}

impl fmt::Debug for GameSetup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.dims().height as i32 {
      for col in 0..self.dims().width as i32 {
        write!(f, "{}", self.board[Cell::new(row, col)])?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

pub struct GameSetupBuilder {
  mines: Board<bool>,
  protected: Board<bool>,
  rng: StdRng,
}

impl GameSetupBuilder {
  pub fn new(dims: Dimensions) -> Self {
    Self {
      mines: Board::new(dims, false),
      protected: Board::new(dims, false),
      rng: StdRng::from_entropy(),
    }
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.rng = StdRng::seed_from_u64(seed);
    self
  }

  pub fn has_mine(&self, pos: Cell) -> bool {
    self.mines[pos]
  }

  pub fn set_mine(&mut self, pos: Cell) {
    assert!(!self.is_protected(pos));
    self.mines[pos] = true;
  }

  pub fn is_protected(&self, pos: Cell) -> bool {
    self.protected[pos]
  }

  pub fn protect(&mut self, pos: Cell) {
    self.mines[pos] = false;
    self.protected[pos] = true;
  }

  /// Places `mines` more mines on random unprotected cells. Returns `false`
  /// if the board ran out of room.
  pub fn add_random_mines(&mut self, mut mines: u32) -> bool {
    let mut possible_positions: Vec<_> = self.mines.positions().collect();
    possible_positions.shuffle(&mut self.rng);

    while let Some(pos) = possible_positions.pop() {
      if mines == 0 {
        return true;
      }

      if self.is_protected(pos) || self.has_mine(pos) {
        continue;
      }

      self.set_mine(pos);
      mines -= 1;
    }

    mines == 0
  }

  pub fn build(&self) -> GameSetup {
    GameSetup::new(&self.mines)
  }
}

/// Result of opening a cell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Reveal {
  Exploded,
  /// Every cell that became visible, with its adjacent mine count.
  Opened(Vec<(Cell, u8)>),
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Game {
  setup: GameSetup,
  view: Board<bool>,
  flags: Board<bool>,
  exploded: bool,
}

impl Game {
  pub fn setup(&self) -> &GameSetup {
    &self.setup
  }

  pub fn dims(&self) -> Dimensions {
    self.setup.dims()
  }

  pub fn is_visible(&self, pos: Cell) -> bool {
    self.view.get(pos).copied().unwrap_or(false)
  }

  pub fn view(&self, pos: Cell) -> Option<Field> {
    if self.is_visible(pos) {
      self.setup.board.get(pos).copied()
    } else {
      None
    }
  }

  pub fn is_exploded(&self) -> bool {
    self.exploded
  }

  /// All safe cells are open.
  pub fn is_won(&self) -> bool {
    !self.exploded
      && self
        .setup
        .board
        .enumerate()
        .all(|(pos, field)| field.is_mine() || self.view[pos])
  }

  fn check_bounds(&self, cell: Cell) -> Result<(), GameError> {
    if self.dims().contains(cell) {
      Ok(())
    } else {
      Err(GameError::OutOfBounds { cell, dims: self.dims() })
    }
  }

  /// Opens `pos`, flood-filling through blank cells.
  pub fn open(&mut self, pos: Cell) -> Result<Reveal, GameError> {
    self.check_bounds(pos)?;
    if self.view[pos] {
      return Err(GameError::AlreadyOpen(pos));
    }
    if self.setup.board[pos].is_mine() {
      self.exploded = true;
      self.view[pos] = true;
      return Ok(Reveal::Exploded);
    }

    let mut opened = Vec::new();
    let mut explorer = BoardExplorer::from(&self.setup.board);
    explorer.enqueue(pos);

    while let Some(pos) = explorer.pop() {
      if self.view[pos] {
        continue;
      }
      let field = self.setup.board[pos];
      self.view[pos] = true;
      if let Some(count) = field.count() {
        opened.push((pos, count));
      }
      if field.is_blank() {
        explorer.enqueue_all(pos.neighbours());
      }
    }

    Ok(Reveal::Opened(opened))
  }

  pub fn flag(&mut self, pos: Cell) -> Result<(), GameError> {
    self.check_bounds(pos)?;
    self.flags[pos] = true;
    Ok(())
  }

  pub fn is_flagged(&self, pos: Cell) -> bool {
    self.flags.get(pos).copied().unwrap_or(false)
  }

  /// Number of flags placed on actual mines.
  pub fn mines_flagged(&self) -> u32 {
    self
      .flags
      .enumerate()
      .filter(|&(pos, &flagged)| flagged && self.setup.board[pos].is_mine())
      .count() as u32
  }
}

impl From<GameSetup> for Game {
  fn from(setup: GameSetup) -> Self {
    Self {
      view: Board::new(setup.dims(), false),
      flags: Board::new(setup.dims(), false),
      exploded: false,
      setup,
    }
  }
}

impl From<&GameSetupBuilder> for Game {
  fn from(builder: &GameSetupBuilder) -> Self {
    Self::from(builder.build())
  }
}

impl fmt::Debug for Game {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.dims().height as i32 {
      for col in 0..self.dims().width as i32 {
        let pos = Cell::new(row, col);
        if self.view[pos] {
          write!(f, "{}", self.setup.board[pos])?;
        } else if self.flags[pos] {
          write!(f, "F")?;
        } else {
          write!(f, "░")?;
        }
      }
      writeln!(f)?;
    }

    Ok(())
  }
}
