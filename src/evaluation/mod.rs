// Heuristic Evaluation
//
// Every heuristic scores from the attacker's point of view:
// positive favours the attacker, negative the defender.
// Dispatch is a single match on the selector, the scorers are plain functions.

pub mod health;
pub mod material;

use crate::board::Board;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of an AI unit. Large enough that losing an AI outweighs any other material.
pub const AI_WEIGHT: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heuristic {
    /// Unit counts, AI = 9999, everything else = 3
    #[default]
    E0,
    /// Unit counts weighted by kind
    E1,
    /// Total health, AI health weighted by 9999
    E2,
}

impl TryFrom<u8> for Heuristic {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Heuristic::E0),
            1 => Ok(Heuristic::E1),
            2 => Ok(Heuristic::E2),
            _ => Err(GameError::InvalidHeuristic { value }),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heuristic::E0 => "e0",
            Heuristic::E1 => "e1",
            Heuristic::E2 => "e2",
        };
        f.write_str(name)
    }
}

/// Main evaluation entry point.
#[inline]
pub fn evaluate(board: &Board, heuristic: Heuristic) -> i32 {
    match heuristic {
        Heuristic::E0 => material::evaluate(board, &material::E0_WEIGHTS),
        Heuristic::E1 => material::evaluate(board, &material::E1_WEIGHTS),
        Heuristic::E2 => health::evaluate(board),
    }
}
