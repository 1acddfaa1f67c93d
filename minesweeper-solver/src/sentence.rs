use core::fmt;
use std::collections::BTreeSet;

use crate::board::Cell;
use crate::error::SentenceError;

/// "Exactly `count` of `cells` are mines."
///
/// A sentence can only be built with `count <= cells.len()` and every
/// reduction keeps it that way, so an existing sentence is always satisfiable
/// on its own.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
  cells: BTreeSet<Cell>,
  count: u32,
}

impl Sentence {
  pub fn new(cells: impl IntoIterator<Item = Cell>, count: u32) -> Result<Self, SentenceError> {
    let cells: BTreeSet<Cell> = cells.into_iter().collect();
    if count as usize > cells.len() {
      return Err(SentenceError::CountOutOfRange {
        count: count.into(),
        cells: cells.len(),
      });
    }
    Ok(Self { cells, count })
  }

  pub fn cells(&self) -> &BTreeSet<Cell> {
    &self.cells
  }

  pub fn count(&self) -> u32 {
    self.count
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn contains(&self, cell: Cell) -> bool {
    self.cells.contains(&cell)
  }

  /// Every cell, if the sentence says they are all mines.
  pub fn known_mines(&self) -> BTreeSet<Cell> {
    if self.count as usize == self.cells.len() {
      self.cells.clone()
    } else {
      BTreeSet::new()
    }
  }

  /// Every cell, if the sentence says none of them is a mine.
  pub fn known_safes(&self) -> BTreeSet<Cell> {
    if self.count == 0 {
      self.cells.clone()
    } else {
      BTreeSet::new()
    }
  }

  /// Whether either `known_mines` or `known_safes` is non-empty.
  pub fn is_conclusive(&self) -> bool {
    !self.cells.is_empty() && (self.count == 0 || self.count as usize == self.cells.len())
  }

  /// Removes `cell` knowing it is a mine. Returns whether the sentence changed.
  ///
  /// Fails without modifying the sentence if it has no mines left to account
  /// for `cell`.
  pub fn mark_mine(&mut self, cell: Cell) -> Result<bool, SentenceError> {
    if !self.cells.contains(&cell) {
      return Ok(false);
    }
    if self.count == 0 {
      return Err(SentenceError::Contradiction { cell });
    }
    self.cells.remove(&cell);
    self.count -= 1;
    Ok(true)
  }

  /// Removes `cell` knowing it is safe. Returns whether the sentence changed.
  ///
  /// Fails without modifying the sentence if the remaining cells could no
  /// longer hold `count` mines.
  pub fn mark_safe(&mut self, cell: Cell) -> Result<bool, SentenceError> {
    if !self.cells.contains(&cell) {
      return Ok(false);
    }
    if self.count as usize == self.cells.len() {
      return Err(SentenceError::Contradiction { cell });
    }
    self.cells.remove(&cell);
    Ok(true)
  }

  /// Subset rule: if `subset` covers part of `self`, the rest of `self`
  /// holds the difference of the counts.
  ///
  /// Returns `None` when `subset` is empty or not contained in `self`.
  pub fn subtract(&self, subset: &Sentence) -> Option<Result<Sentence, SentenceError>> {
    if subset.cells.is_empty() || !subset.cells.is_subset(&self.cells) {
      return None;
    }
    let count = i64::from(self.count) - i64::from(subset.count);
    let cells: BTreeSet<Cell> = self.cells.difference(&subset.cells).copied().collect();
    Some(match u32::try_from(count) {
      Ok(count) => Sentence::new(cells, count),
      Err(_) => Err(SentenceError::CountOutOfRange {
        count,
        cells: cells.len(),
      }),
    })
  }
}

impl fmt::Debug for Sentence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} = {}", self.cells, self.count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
    coords.iter().map(|&c| Cell::from(c)).collect()
  }

  #[test]
  fn rejects_more_mines_than_cells() {
    assert_eq!(
      Sentence::new(cells(&[(0, 0)]), 2),
      Err(SentenceError::CountOutOfRange { count: 2, cells: 1 })
    );
    assert!(Sentence::new(cells(&[]), 0).is_ok());
  }

  #[test]
  fn duplicate_cells_collapse() {
    let sentence = Sentence::new(cells(&[(0, 0), (0, 0), (1, 1)]), 2).unwrap();
    assert_eq!(sentence.len(), 2);
  }

  #[test]
  fn known_mines_only_when_count_matches_size() {
    let all = Sentence::new(cells(&[(0, 0), (0, 1)]), 2).unwrap();
    assert_eq!(all.known_mines().len(), 2);
    assert!(all.known_safes().is_empty());

    let some = Sentence::new(cells(&[(0, 0), (0, 1)]), 1).unwrap();
    assert!(some.known_mines().is_empty());
    assert!(some.known_safes().is_empty());
    assert!(!some.is_conclusive());
  }

  #[test]
  fn known_safes_only_when_count_is_zero() {
    let none = Sentence::new(cells(&[(0, 0), (0, 1)]), 0).unwrap();
    assert_eq!(none.known_safes().len(), 2);
    assert!(none.known_mines().is_empty());
    assert!(none.is_conclusive());
  }

  #[test]
  fn mark_mine_removes_cell_and_decrements() {
    let mut sentence = Sentence::new(cells(&[(0, 0), (0, 1), (0, 2)]), 2).unwrap();
    assert_eq!(sentence.mark_mine(Cell::new(0, 1)), Ok(true));
    assert_eq!(sentence.len(), 2);
    assert_eq!(sentence.count(), 1);
    assert!(!sentence.contains(Cell::new(0, 1)));
  }

  #[test]
  fn mark_mine_on_other_cell_is_noop() {
    let mut sentence = Sentence::new(cells(&[(0, 0), (0, 1)]), 1).unwrap();
    let before = sentence.clone();
    assert_eq!(sentence.mark_mine(Cell::new(5, 5)), Ok(false));
    assert_eq!(sentence, before);
  }

  #[test]
  fn mark_safe_removes_cell_keeps_count() {
    let mut sentence = Sentence::new(cells(&[(0, 0), (0, 1), (0, 2)]), 1).unwrap();
    assert_eq!(sentence.mark_safe(Cell::new(0, 0)), Ok(true));
    assert_eq!(sentence.len(), 2);
    assert_eq!(sentence.count(), 1);
    assert_eq!(sentence.mark_safe(Cell::new(0, 0)), Ok(false));
  }

  #[test]
  fn contradicting_marks_leave_sentence_untouched() {
    let mut safe = Sentence::new(cells(&[(0, 0), (0, 1)]), 0).unwrap();
    assert_eq!(
      safe.mark_mine(Cell::new(0, 0)),
      Err(SentenceError::Contradiction { cell: Cell::new(0, 0) })
    );
    assert_eq!(safe.len(), 2);

    let mut mines = Sentence::new(cells(&[(0, 0), (0, 1)]), 2).unwrap();
    assert!(mines.mark_safe(Cell::new(0, 1)).is_err());
    assert_eq!(mines.count(), 2);
    assert_eq!(mines.len(), 2);
  }

  #[test]
  fn equality_ignores_insertion_order() {
    let a = Sentence::new(cells(&[(0, 0), (1, 1)]), 1).unwrap();
    let b = Sentence::new(cells(&[(1, 1), (0, 0)]), 1).unwrap();
    let c = Sentence::new(cells(&[(1, 1), (0, 0)]), 2).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn subtract_derives_remainder() {
    let small = Sentence::new(cells(&[(0, 0), (0, 1), (0, 2)]), 1).unwrap();
    let large = Sentence::new(cells(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]), 2).unwrap();
    let derived = large.subtract(&small).unwrap().unwrap();
    assert_eq!(derived, Sentence::new(cells(&[(1, 0), (1, 1)]), 1).unwrap());
    assert!(small.subtract(&large).is_none());
  }

  #[test]
  fn subtract_rejects_impossible_counts() {
    let small = Sentence::new(cells(&[(0, 0)]), 1).unwrap();
    let large = Sentence::new(cells(&[(0, 0), (0, 1)]), 0).unwrap();
    assert_eq!(
      large.subtract(&small),
      Some(Err(SentenceError::CountOutOfRange { count: -1, cells: 1 }))
    );

    let empty = Sentence::new(cells(&[]), 0).unwrap();
    assert!(large.subtract(&empty).is_none());
  }
}
