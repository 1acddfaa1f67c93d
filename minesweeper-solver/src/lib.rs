//! Minesweeper agent built on a propositional knowledge base.
//!
//! Every probed cell contributes a [`Sentence`] "exactly N of these
//! neighbours are mines". The [`KnowledgeBase`] reduces sentences as cells
//! get classified and derives new ones with the subset rule until nothing
//! more follows; the [`Agent`] then probes a proven-safe cell or guesses.

pub mod agent;
pub mod autoplay;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod sentence;

pub use agent::{Agent, Move};
pub use autoplay::{play, GameReport, Outcome};
pub use board::{Board, Cell, Dimensions};
pub use config::GameConfig;
pub use error::{AutoplayError, ConfigError, GameError, KnowledgeError, SentenceError};
pub use game::{Field, Game, GameSetup, GameSetupBuilder, Reveal};
pub use knowledge::{Classification, Deductions, KnowledgeBase};
pub use sentence::Sentence;
