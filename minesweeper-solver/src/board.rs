use core::fmt;
use std::collections::VecDeque;
use std::ops::{Add, Index, IndexMut};

pub static NORTH: Cell = Cell::new(-1, 0);
pub static NORTH_EAST: Cell = Cell::new(-1, 1);
pub static EAST: Cell = Cell::new(0, 1);
pub static SOUTH_EAST: Cell = Cell::new(1, 1);
pub static SOUTH: Cell = Cell::new(1, 0);
pub static SOUTH_WEST: Cell = Cell::new(1, -1);
pub static WEST: Cell = Cell::new(0, -1);
pub static NORTH_WEST: Cell = Cell::new(-1, -1);
pub static CENTER: Cell = Cell::new(0, 0);

pub static DIRECTIONS: [Cell; 8] = [NORTH_WEST, NORTH, NORTH_EAST, WEST, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST];
pub static CENTER_AND_DIRECTIONS: [Cell; 9] = [
  NORTH_WEST, NORTH, NORTH_EAST, WEST, CENTER, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST,
];

/// A board coordinate. Ordering is row-major, which keeps sets of cells
/// iterating in reading order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
  pub row: i32,
  pub col: i32,
}

impl Cell {
  pub const fn new(row: i32, col: i32) -> Cell {
    Cell { row, col }
  }

  pub fn with_neighbours(self) -> impl Iterator<Item = Cell> {
    CENTER_AND_DIRECTIONS.iter().map(move |&dir| dir + self)
  }

  pub fn neighbours(self) -> impl Iterator<Item = Cell> {
    DIRECTIONS.iter().map(move |&dir| dir + self)
  }
}

impl fmt::Debug for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.row, self.col)
  }
}

impl From<(i32, i32)> for Cell {
  fn from((row, col): (i32, i32)) -> Self {
    Cell::new(row, col)
  }
}

impl Add<Cell> for Cell {
  type Output = Cell;

  fn add(self, rhs: Cell) -> Self::Output {
    Cell::new(self.row + rhs.row, self.col + rhs.col)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Dimensions {
  pub height: u32,
  pub width: u32,
}

impl Dimensions {
  pub const fn new(height: u32, width: u32) -> Self {
    Self { height, width }
  }

  pub fn area(&self) -> u32 {
    self.height * self.width
  }

  pub fn contains(&self, cell: Cell) -> bool {
    matches!(
      (u32::try_from(cell.row), u32::try_from(cell.col)),
      (Ok(row), Ok(col)) if row < self.height && col < self.width
    )
  }

  pub fn cells(&self) -> BoardPositionIterator {
    BoardPositionIterator::new(Cell::new(0, 0), self.height, self.width)
  }

  /// Adjacent cells that lie on the board.
  pub fn neighbours(self, cell: Cell) -> impl Iterator<Item = Cell> {
    cell.neighbours().filter(move |&n| self.contains(n))
  }
}

impl fmt::Display for Dimensions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.height, self.width)
  }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board<T> {
  pub dims: Dimensions,
  fields: Vec<T>,
}

impl<T> Board<T> {
  pub fn new(dims: Dimensions, default: T) -> Self
  where
    T: Clone,
  {
    Self {
      dims,
      fields: vec![default; dims.area() as usize],
    }
  }

  fn pos_to_index(&self, pos: Cell) -> Option<usize> {
    if self.dims.contains(pos) {
      Some(pos.col as usize + pos.row as usize * self.dims.width as usize)
    } else {
      None
    }
  }

  pub fn get(&self, pos: Cell) -> Option<&T> {
    self.pos_to_index(pos).and_then(|i| self.fields.get(i))
  }

  pub fn get_mut(&mut self, pos: Cell) -> Option<&mut T> {
    self.pos_to_index(pos).and_then(|i| self.fields.get_mut(i))
  }

  pub fn get_around(&self, pos: Cell) -> impl Iterator<Item = &T> {
    pos.neighbours().flat_map(|pos| self.get(pos))
  }

  pub fn positions(&self) -> BoardPositionIterator {
    self.dims.cells()
  }

  pub fn enumerate(&self) -> impl Iterator<Item = (Cell, &T)> {
    self.positions().zip(self.fields.iter())
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.fields.iter()
  }
}

impl<T> Index<Cell> for Board<T> {
  type Output = T;

  fn index(&self, index: Cell) -> &Self::Output {
    self
      .get(index)
      .unwrap_or_else(|| panic!("Cannot access position {:?} on board with size {}", index, self.dims))
  }
}

impl<T> IndexMut<Cell> for Board<T> {
  fn index_mut(&mut self, index: Cell) -> &mut T {
    let dims = self.dims;
    self
      .get_mut(index)
      .unwrap_or_else(|| panic!("Cannot mut-access position {:?} on board with size {}", index, dims))
  }
}

pub struct BoardPositionIterator {
  next_pos: Cell,
  col_start: i32,
  col_end: i32,
  row_end: i32,
}

impl BoardPositionIterator {
  pub fn new(pos: Cell, height: u32, width: u32) -> Self {
    let row_end = pos.row + height as i32;
    Self {
      next_pos: if width == 0 { Cell::new(row_end, 0) } else { pos },
      col_start: pos.col,
      col_end: pos.col + width as i32,
      row_end,
    }
  }
}

impl Iterator for BoardPositionIterator {
  type Item = Cell;

  fn next(&mut self) -> Option<Self::Item> {
    let pos = &mut self.next_pos;
    if pos.row >= self.row_end {
      None
    } else {
      let result = *pos;
      pos.col += 1;
      if pos.col >= self.col_end {
        pos.col = self.col_start;
        pos.row += 1;
      }
      Some(result)
    }
  }
}

/// Breadth-first work queue that hands out every on-board cell at most once.
#[derive(Clone)]
pub struct BoardExplorer {
  queue: VecDeque<Cell>,
  visited: Board<bool>,
}

impl BoardExplorer {
  pub fn enqueue(&mut self, pos: Cell) -> bool {
    if let Some(field) = self.visited.get_mut(pos) {
      if !*field {
        *field = true;
        self.queue.push_back(pos);
        return true;
      }
    }
    false
  }

  pub fn enqueue_all(&mut self, all: impl IntoIterator<Item = Cell>) {
    for pos in all {
      self.enqueue(pos);
    }
  }

  pub fn pop(&mut self) -> Option<Cell> {
    self.queue.pop_front()
  }
}

impl<T> From<&Board<T>> for BoardExplorer {
  fn from(board: &Board<T>) -> Self {
    Self {
      queue: VecDeque::new(),
      visited: Board::new(board.dims, false),
    }
  }
}
