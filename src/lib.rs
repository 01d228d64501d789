//! Rules engine and computer player for the AI wargame.
//!
//! Two players, attacker and defender, each command a handful of units on a
//! small square board. A player loses when their AI unit is destroyed; the
//! defender also wins once the turn limit is reached.

pub mod board;
pub mod broker;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod moves;
pub mod options;
pub mod pieces;
pub mod search;
pub mod session;
pub mod trace;

pub use board::{Board, Coord, CoordPair};
pub use error::{CoordParseError, GameError, GameResult};
pub use evaluation::Heuristic;
pub use game::{GameRules, GameState, GameStatus};
pub use moves::{Action, ActionOutcome};
pub use options::{GameType, Options, SearchOptions};
pub use pieces::{Player, Unit, UnitType};
pub use search::{MAX_HEURISTIC_SCORE, MIN_HEURISTIC_SCORE, SearchResult, Searcher};
pub use session::{ComputerMove, GameSession};
