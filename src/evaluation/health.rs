//! Health heuristic (E2).

use super::AI_WEIGHT;
use crate::board::Board;
use crate::pieces::{Player, UnitType};

pub fn evaluate(board: &Board) -> i32 {
    board
        .units()
        .map(|(_, unit)| {
            let weight = if unit.kind == UnitType::AI { AI_WEIGHT } else { 1 };
            let value = unit.health as i32 * weight;
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
    use crate::pieces::Unit;

    #[test]
    fn test_ai_health_dominates() {
        let mut board = Board::new(5);
        board.place(Coord::new(0, 0), Unit::with_health(Player::Defender, UnitType::AI, 8));
        board.place(Coord::new(4, 4), Unit::new(Player::Attacker, UnitType::AI));
        board.place(Coord::new(0, 1), Unit::new(Player::Defender, UnitType::Tech));
        assert_eq!(evaluate(&board), AI_WEIGHT - 9);
    }
}
