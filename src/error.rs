//! Error types for the wargame engine
//!
//! Illegal moves and bad input are recoverable; only the session decides
//! whether a missing computer move ends the game.

use crate::board::CoordPair;
use crate::pieces::Player;
use thiserror::Error;

/// Errors that can occur while playing a game
#[derive(Error, Debug)]
pub enum GameError {
    /// The action is not legal for the side to move
    #[error("invalid move: {mv}")]
    InvalidMove { mv: CoordPair },

    /// The side to move has no legal action
    #[error("{player} has no legal move")]
    NoMoveAvailable { player: Player },

    /// Board dimension outside the supported range
    #[error("unsupported board dimension {dim} (must be 4-16)")]
    InvalidDimension { dim: u8 },

    /// Heuristic selector outside 0-2
    #[error("unknown heuristic e{value} (must be 0, 1 or 2)")]
    InvalidHeuristic { value: u8 },

    /// Broker answered with something other than a success
    #[error("broker error: {message}")]
    Broker { message: String },

    #[cfg(feature = "broker")]
    #[error("broker transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Rejected coordinate or move text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("expected {expected} characters, got {found}")]
    Length { expected: usize, found: usize },

    #[error("invalid row label '{0}'")]
    Row(char),

    #[error("invalid column label '{0}'")]
    Column(char),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
