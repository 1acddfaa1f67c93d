use std::path::PathBuf;

use crate::board::{Cell, Dimensions};

/// A sentence that would claim an impossible number of mines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SentenceError {
  #[error("sentence claims {count} mines among {cells} cells")]
  CountOutOfRange { count: i64, cells: usize },

  #[error("classifying {cell:?} contradicts the sentence")]
  Contradiction { cell: Cell },
}

/// Observations rejected at the knowledge base boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnowledgeError {
  #[error("cell {cell:?} is outside the {dims} board")]
  OutOfBounds { cell: Cell, dims: Dimensions },

  #[error("cell {cell:?} cannot have {count} adjacent mines")]
  InvalidCount { cell: Cell, count: u8 },

  #[error("cell {0:?} was observed but is known to be a mine")]
  ObservedMine(Cell),

  #[error("cell {cell:?} was observed with {count} mines, previously {previous}")]
  ConflictingObservation { cell: Cell, count: u8, previous: u8 },

  #[error("observation of {cell:?} contradicts existing knowledge: {source}")]
  InconsistentObservation { cell: Cell, source: SentenceError },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
  #[error("cell {cell:?} is outside the {dims} board")]
  OutOfBounds { cell: Cell, dims: Dimensions },

  #[error("cell {0:?} is already open")]
  AlreadyOpen(Cell),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  FileRead { path: PathBuf, source: std::io::Error },

  #[error("failed to parse TOML: {0}")]
  TomlParse(#[from] toml::de::Error),

  #[error("config validation error: {0}")]
  Validation(String),
}

/// Errors that end an automatic game early.
#[derive(Debug, thiserror::Error)]
pub enum AutoplayError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("could not place {0} mines")]
  MinePlacement(u32),

  #[error("game error: {0}")]
  Game(#[from] GameError),

  #[error("knowledge error: {0}")]
  Knowledge(#[from] KnowledgeError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sentence_error_display() {
    let err = SentenceError::CountOutOfRange { count: -1, cells: 2 };
    assert_eq!(err.to_string(), "sentence claims -1 mines among 2 cells");
  }

  #[test]
  fn test_knowledge_error_display() {
    let err = KnowledgeError::OutOfBounds {
      cell: Cell::new(8, 0),
      dims: Dimensions::new(8, 8),
    };
    assert_eq!(err.to_string(), "cell (8, 0) is outside the 8x8 board");
  }

  #[test]
  fn test_config_error_display() {
    let err = ConfigError::Validation("mines must be < 64".to_string());
    assert_eq!(err.to_string(), "config validation error: mines must be < 64");
  }
}
