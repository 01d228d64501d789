//! Material-count heuristics (E0, E1): a fixed weight per live unit.

use super::AI_WEIGHT;
use crate::board::Board;
use crate::pieces::{NUM_UNIT_TYPES, Player};

/// Per-kind weights indexed by `UnitType::index`.
pub type UnitWeights = [i32; NUM_UNIT_TYPES];

//                                  AI        Tech Virus Program Firewall
pub const E0_WEIGHTS: UnitWeights = [AI_WEIGHT, 3, 3, 3, 3];
pub const E1_WEIGHTS: UnitWeights = [AI_WEIGHT, 500, 500, 300, 50];

pub fn evaluate(board: &Board, weights: &UnitWeights) -> i32 {
    board
        .units()
        .map(|(_, unit)| {
            let value = weights[unit.kind.index()];
            match unit.player {
                Player::Attacker => value,
                Player::Defender => -value,
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coord;
    use crate::pieces::{Unit, UnitType};

    #[test]
    fn test_counts_ignore_health() {
        let mut board = Board::new(5);
        board.place(Coord::new(0, 0), Unit::new(Player::Defender, UnitType::AI));
        board.place(Coord::new(4, 4), Unit::new(Player::Attacker, UnitType::AI));
        board.place(Coord::new(3, 4), Unit::with_health(Player::Attacker, UnitType::Virus, 1));
        board.place(Coord::new(1, 0), Unit::new(Player::Defender, UnitType::Firewall));
        assert_eq!(evaluate(&board, &E0_WEIGHTS), 0);
        assert_eq!(evaluate(&board, &E1_WEIGHTS), 450);
    }
}
