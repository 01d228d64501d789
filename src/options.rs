//! Game and search configuration.
//!
//! Defaults match the classic command line player. A JSON file can provide
//! any subset of the fields; the binary layers its flags on top.

use crate::error::{GameError, GameResult};
use crate::evaluation::Heuristic;
use crate::pieces::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Search depth of plain minimax when no `max_depth` is configured.
pub const DEFAULT_MINIMAX_DEPTH: u32 = 6;
/// Search depth of alpha-beta when no `max_depth` is configured.
pub const DEFAULT_ALPHA_BETA_DEPTH: u32 = 10;

pub const MIN_DIM: u8 = 4;
pub const MAX_DIM: u8 = 16;

/// Which sides are driven by a human (keyboard or broker) and which by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    AttackerVsDefender,
    AttackerVsComp,
    CompVsDefender,
    CompVsComp,
}

impl GameType {
    pub fn is_human(self, player: Player) -> bool {
        match self {
            GameType::AttackerVsDefender => true,
            GameType::AttackerVsComp => player == Player::Attacker,
            GameType::CompVsDefender => player == Player::Defender,
            GameType::CompVsComp => false,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Read-only parameters of a single search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub alpha_beta: bool,
    /// Plies below the root. `None` keeps the fixed per-algorithm depth.
    pub max_depth: Option<u32>,
    /// Plies that are always expanded, even once the time budget is spent.
    pub min_depth: Option<u32>,
    /// Wall-clock budget per move, in seconds.
    pub max_time: Option<f64>,
    pub heuristic: Heuristic,
    /// Shuffle candidate moves at every node, breaking ties between equal scores randomly.
    pub randomize_moves: bool,
    /// Seed for move shuffling; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            alpha_beta: true,
            max_depth: None,
            min_depth: Some(2),
            max_time: Some(5.0),
            heuristic: Heuristic::E0,
            randomize_moves: true,
            seed: None,
        }
    }
}

impl SearchOptions {
    /// Depth the next search will use.
    pub fn depth(&self) -> u32 {
        match (self.max_depth, self.alpha_beta) {
            (Some(depth), _) => depth,
            (None, true) => DEFAULT_ALPHA_BETA_DEPTH,
            (None, false) => DEFAULT_MINIMAX_DEPTH,
        }
    }

    #[inline]
    pub fn min_depth(&self) -> u32 {
        self.min_depth.unwrap_or(0)
    }

    /// Time after which nodes stop expanding, 10ms short of the budget.
    pub fn cutoff(&self) -> Option<Duration> {
        self.max_time
            .map(|secs| Duration::from_secs_f64((secs - 0.01).max(0.0)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub dim: u8,
    pub game_type: GameType,
    pub max_turns: Option<u32>,
    /// URL of the move broker, when playing against another program.
    pub broker: Option<String>,
    pub search: SearchOptions,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            dim: crate::board::DEFAULT_DIM,
            game_type: GameType::AttackerVsDefender,
            max_turns: Some(100),
            broker: None,
            search: SearchOptions::default(),
        }
    }
}

impl Options {
    pub fn from_json_str(json: &str) -> GameResult<Options> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> GameResult<Options> {
        let json = std::fs::read_to_string(path)?;
        Options::from_json_str(&json)
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(MIN_DIM..=MAX_DIM).contains(&self.dim) {
            return Err(GameError::InvalidDimension { dim: self.dim });
        }
        Ok(())
    }

    /// File name of the game trace, e.g. `gameTrace-true-5.0-100.txt`.
    pub fn trace_file_name(&self) -> String {
        let max_time = self
            .search
            .max_time
            .map_or_else(|| "none".to_string(), |t| format!("{t:?}"));
        let max_turns = self
            .max_turns
            .map_or_else(|| "none".to_string(), |t| t.to_string());
        format!(
            "gameTrace-{}-{}-{}.txt",
            self.search.alpha_beta, max_time, max_turns
        )
    }
}
