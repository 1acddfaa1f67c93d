use core::fmt;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::board::{Cell, Dimensions};
use crate::error::{KnowledgeError, SentenceError};
use crate::sentence::Sentence;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Classification {
  Safe(Cell),
  Mine(Cell),
}

use Classification::*;

/// What a single observation allowed the knowledge base to conclude.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Deductions {
  pub safes: Vec<Cell>,
  pub mines: Vec<Cell>,
  pub derived_sentences: usize,
  pub passes: usize,
}

/// Sentences about the board plus every cell they allowed us to classify.
///
/// Invariants held between calls:
/// * `safes` and `mines` are disjoint,
/// * no classified cell appears in any sentence,
/// * no sentence is empty, and no two sentences are equal.
#[derive(Clone)]
pub struct KnowledgeBase {
  dims: Dimensions,
  observations: BTreeMap<Cell, u8>,
  safes: BTreeSet<Cell>,
  mines: BTreeSet<Cell>,
  sentences: Vec<Sentence>,
  queue: VecDeque<Classification>,
}

impl KnowledgeBase {
  pub fn new(dims: Dimensions) -> Self {
    Self {
      dims,
      observations: BTreeMap::new(),
      safes: BTreeSet::new(),
      mines: BTreeSet::new(),
      sentences: Vec::new(),
      queue: VecDeque::new(),
    }
  }

  pub fn dims(&self) -> Dimensions {
    self.dims
  }

  pub fn known_safe(&self) -> &BTreeSet<Cell> {
    &self.safes
  }

  pub fn known_mine(&self) -> &BTreeSet<Cell> {
    &self.mines
  }

  pub fn sentences(&self) -> &[Sentence] {
    &self.sentences
  }

  pub fn moves_made(&self) -> impl Iterator<Item = Cell> + '_ {
    self.observations.keys().copied()
  }

  pub fn is_move_made(&self, cell: Cell) -> bool {
    self.observations.contains_key(&cell)
  }

  /// Records that `cell` was probed safely and has `count` adjacent mines,
  /// then propagates until nothing new can be concluded.
  ///
  /// Invalid observations are rejected before any state changes.
  pub fn observe(&mut self, cell: Cell, count: u8) -> Result<Deductions, KnowledgeError> {
    let sentence = self.sentence_for(cell, count)?;
    debug!(?cell, count, "observing");

    let safes_before = self.safes.clone();
    let mines_before = self.mines.clone();

    self.observations.insert(cell, count);
    self.queue.push_back(Safe(cell));
    self.add_sentence(sentence);
    let mut deductions = self.propagate();

    deductions.safes = self.safes.difference(&safes_before).copied().collect();
    deductions.mines = self.mines.difference(&mines_before).copied().collect();
    debug!(
      safes = deductions.safes.len(),
      mines = deductions.mines.len(),
      derived = deductions.derived_sentences,
      passes = deductions.passes,
      sentences = self.sentences.len(),
      "observation propagated"
    );
    Ok(deductions)
  }

  /// Alternates direct resolution and subset inference until a pass adds
  /// neither a classification nor a sentence.
  fn propagate(&mut self) -> Deductions {
    let mut deductions = Deductions::default();
    loop {
      deductions.passes += 1;
      self.drain();
      let derived = self.infer_subsets();
      if derived == 0 {
        break;
      }
      deductions.derived_sentences += derived;
    }
    deductions
  }

  /// A known-safe cell that has not been probed yet.
  pub fn safe_move(&self) -> Option<Cell> {
    self.safes.iter().copied().find(|&cell| !self.is_move_made(cell))
  }

  /// A uniformly chosen cell that has been neither probed nor proven a mine.
  pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
    let candidates: Vec<Cell> = self
      .dims
      .cells()
      .filter(|&cell| !self.is_move_made(cell) && !self.mines.contains(&cell))
      .collect();
    candidates.choose(rng).copied()
  }

  fn sentence_for(&self, cell: Cell, count: u8) -> Result<Sentence, KnowledgeError> {
    if !self.dims.contains(cell) {
      return Err(KnowledgeError::OutOfBounds { cell, dims: self.dims });
    }
    if count > 8 {
      return Err(KnowledgeError::InvalidCount { cell, count });
    }
    if self.mines.contains(&cell) {
      return Err(KnowledgeError::ObservedMine(cell));
    }
    if let Some(&previous) = self.observations.get(&cell) {
      if previous != count {
        return Err(KnowledgeError::ConflictingObservation { cell, count, previous });
      }
    }

    let neighbours = self.dims.neighbours(cell).filter(|n| !self.safes.contains(n));
    let (mines, unknown): (Vec<Cell>, Vec<Cell>) = neighbours.partition(|n| self.mines.contains(n));
    let remaining = u32::from(count)
      .checked_sub(mines.len() as u32)
      .ok_or(KnowledgeError::InconsistentObservation {
        cell,
        source: SentenceError::CountOutOfRange {
          count: i64::from(count) - mines.len() as i64,
          cells: unknown.len(),
        },
      })?;
    Sentence::new(unknown, remaining).map_err(|source| KnowledgeError::InconsistentObservation { cell, source })
  }

  /// Stores a sentence unless it is empty or already known. Conclusive
  /// sentences queue their cells for classification.
  fn add_sentence(&mut self, sentence: Sentence) -> bool {
    if sentence.is_empty() || self.sentences.contains(&sentence) {
      return false;
    }
    self.enqueue_conclusions(&sentence);
    trace!(?sentence, "adding sentence");
    self.sentences.push(sentence);
    true
  }

  fn enqueue_conclusions(&mut self, sentence: &Sentence) {
    self.queue.extend(sentence.known_mines().into_iter().map(Mine));
    self.queue.extend(sentence.known_safes().into_iter().map(Safe));
  }

  /// Applies queued classifications until the queue runs dry. Every sentence
  /// a classification turns conclusive feeds the queue again.
  fn drain(&mut self) {
    while let Some(classification) = self.queue.pop_front() {
      let (cell, is_mine) = match classification {
        Safe(cell) => (cell, false),
        Mine(cell) => (cell, true),
      };
      let (target, opposite) = if is_mine {
        (&self.mines, &self.safes)
      } else {
        (&self.safes, &self.mines)
      };
      if target.contains(&cell) {
        continue;
      }
      if opposite.contains(&cell) {
        warn!(?classification, "deduction contradicts earlier classification, ignoring");
        continue;
      }

      trace!(?classification, "classified");
      if is_mine {
        self.mines.insert(cell);
      } else {
        self.safes.insert(cell);
      }

      let mut conclusive = Vec::new();
      self.sentences.retain_mut(|sentence| {
        let marked = if is_mine {
          sentence.mark_mine(cell)
        } else {
          sentence.mark_safe(cell)
        };
        match marked {
          Ok(true) => {
            if sentence.is_conclusive() {
              conclusive.push(sentence.clone());
            }
            !sentence.is_empty()
          }
          Ok(false) => true,
          Err(err) => {
            warn!(?sentence, %err, "dropping contradicted sentence");
            false
          }
        }
      });
      for sentence in &conclusive {
        self.enqueue_conclusions(sentence);
      }
      self.dedup_sentences();
    }
  }

  /// Reductions can make two sentences equal; keep the first of each.
  fn dedup_sentences(&mut self) {
    let mut seen = HashSet::new();
    self.sentences.retain(|sentence| seen.insert(sentence.clone()));
  }

  /// One pass of the subset rule over every ordered pair of sentences.
  /// Returns how many new sentences were added.
  fn infer_subsets(&mut self) -> usize {
    let mut derived = Vec::new();
    for (i, subset) in self.sentences.iter().enumerate() {
      for (j, superset) in self.sentences.iter().enumerate() {
        if i == j || subset.len() > superset.len() {
          continue;
        }
        match superset.subtract(subset) {
          Some(Ok(sentence)) => derived.push(sentence),
          Some(Err(err)) => trace!(?subset, ?superset, %err, "skipping derivation"),
          None => (),
        }
      }
    }

    derived.into_iter().map(|sentence| self.add_sentence(sentence)).filter(|&added| added).count()
  }
}

impl fmt::Debug for KnowledgeBase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.dims.height as i32 {
      for col in 0..self.dims.width as i32 {
        let cell = Cell::new(row, col);
        match self.observations.get(&cell) {
          Some(0) => write!(f, " ")?,
          Some(count) => write!(f, "{}", count)?,
          None if self.mines.contains(&cell) => write!(f, "X")?,
          None if self.safes.contains(&cell) => write!(f, ".")?,
          None => write!(f, "░")?,
        }
      }
      writeln!(f)?;
    }
    for sentence in &self.sentences {
      writeln!(f, "{:?}", sentence)?;
    }

    Ok(())
  }
}
