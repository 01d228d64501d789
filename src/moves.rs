use crate::board::{Board, Coord, CoordPair};
use crate::pieces::{MAX_HEALTH, Player};
use smallvec::SmallVec;
use std::fmt;

/// Health a unit loses when it self-destructs (always fatal).
pub const SELF_DESTRUCT_SELF_DAMAGE: i32 = MAX_HEALTH as i32;
/// Health every unit in the blast square loses.
pub const SELF_DESTRUCT_SPLASH_DAMAGE: i32 = 2;

/// Candidate list for one side. Twelve units at five actions each stays inline.
pub type MoveList = SmallVec<[CoordPair; 64]>;

/// What a legal coordinate pair does when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move,
    SelfDestruct,
    Repair,
    Attack,
}

/// Result of applying an action, printable as the move log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Move { mv: CoordPair },
    SelfDestruct { at: Coord, total_damage: u32 },
    Repair { mv: CoordPair, amount: u8 },
    Attack { mv: CoordPair, to_source: u8, to_target: u8 },
}

impl ActionOutcome {
    pub fn action(&self) -> Action {
        match self {
            ActionOutcome::Move { .. } => Action::Move,
            ActionOutcome::SelfDestruct { .. } => Action::SelfDestruct,
            ActionOutcome::Repair { .. } => Action::Repair,
            ActionOutcome::Attack { .. } => Action::Attack,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Move { mv } => write!(f, "move from {} to {}", mv.src, mv.dst),
            ActionOutcome::SelfDestruct { at, total_damage } => write!(
                f,
                "self-destruct at {}\nself-destructed for {} total damage",
                at, total_damage
            ),
            ActionOutcome::Repair { mv, amount } => write!(
                f,
                "repair from {} to {}\nrepaired {} health points",
                mv.src, mv.dst, amount
            ),
            ActionOutcome::Attack {
                mv,
                to_source,
                to_target,
            } => write!(
                f,
                "attack from {} to {}\ncombat damage: to source = {}, to target = {}",
                mv.src, mv.dst, to_source, to_target
            ),
        }
    }
}

// ==================== Legality ====================

/// Decide which action `mv` would perform for `player`, or `None` if it is illegal.
pub fn classify_move(board: &Board, player: Player, mv: &CoordPair) -> Option<Action> {
    if !board.is_valid_coord(mv.src) || !board.is_valid_coord(mv.dst) {
        return None;
    }
    let unit = board.get(mv.src).filter(|u| u.player == player)?;

    if mv.is_self_destruct() {
        return Some(Action::SelfDestruct);
    }

    // Everything else is a single orthogonal step.
    let adjacent = mv.src.is_adjacent(&mv.dst);

    if let Some(target) = board.get(mv.dst) {
        if !adjacent {
            return None;
        }
        if target.player != player {
            return Some(Action::Attack);
        }
        if target.health < MAX_HEALTH && unit.can_repair(target) {
            return Some(Action::Repair);
        }
        return None;
    }

    if !adjacent {
        return None;
    }

    if unit.kind.is_restricted_mover() {
        if board.is_engaged(mv.src, player) {
            return None;
        }
        let (dr, dc) = (mv.dst.row - mv.src.row, mv.dst.col - mv.src.col);
        let forward = match player {
            // Down or right
            Player::Defender => dr == 1 || dc == 1,
            // Up or left
            Player::Attacker => dr == -1 || dc == -1,
        };
        return forward.then_some(Action::Move);
    }

    Some(Action::Move)
}

#[inline]
pub fn is_valid_move(board: &Board, player: Player, mv: &CoordPair) -> bool {
    classify_move(board, player, mv).is_some()
}

// ==================== Application ====================

/// Play `mv` for `player`. Returns `None` and leaves the board untouched when illegal.
pub fn apply_move(board: &mut Board, player: Player, mv: &CoordPair) -> Option<ActionOutcome> {
    let action = classify_move(board, player, mv)?;
    let outcome = match action {
        Action::Move => {
            board.relocate(mv.src, mv.dst);
            ActionOutcome::Move { mv: *mv }
        }
        Action::SelfDestruct => {
            board.mod_health(mv.src, -SELF_DESTRUCT_SELF_DAMAGE);
            let mut total_damage = 0;
            for coord in mv.src.iter_range(1) {
                if board.get(coord).is_some() {
                    board.mod_health(coord, -SELF_DESTRUCT_SPLASH_DAMAGE);
                    total_damage += SELF_DESTRUCT_SPLASH_DAMAGE as u32;
                }
            }
            ActionOutcome::SelfDestruct {
                at: mv.src,
                total_damage,
            }
        }
        Action::Repair => {
            let (src, dst) = (board.get(mv.src)?, board.get(mv.dst)?);
            let amount = src.repair_amount(dst);
            board.mod_health(mv.dst, amount as i32);
            ActionOutcome::Repair { mv: *mv, amount }
        }
        Action::Attack => {
            // Both sides strike with their pre-combat health.
            let (src, dst) = (board.get(mv.src)?, board.get(mv.dst)?);
            let to_target = src.damage_amount(dst);
            let to_source = dst.damage_amount(src);
            board.mod_health(mv.dst, -(to_target as i32));
            board.mod_health(mv.src, -(to_source as i32));
            ActionOutcome::Attack {
                mv: *mv,
                to_source,
                to_target,
            }
        }
    };
    Some(outcome)
}

// ==================== Generation ====================

/// Legal moves for `player` in board scan order: each unit's adjacent targets,
/// then its self-destruct.
pub fn get_legal_moves(board: &Board, player: Player) -> MoveList {
    let mut moves = MoveList::new();
    legal_moves_into(board, player, &mut moves);
    moves
}

pub fn legal_moves_into(board: &Board, player: Player, moves: &mut MoveList) {
    moves.clear();
    for (src, _) in board.player_units(player) {
        for dst in src.adjacent() {
            let mv = CoordPair::new(src, dst);
            if is_valid_move(board, player, &mv) {
                moves.push(mv);
            }
        }
        moves.push(CoordPair::new(src, src));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Unit, UnitType};

    fn board_with(units: &[(i32, i32, Player, UnitType)]) -> Board {
        let mut board = Board::new(5);
        for &(row, col, player, kind) in units {
            board.place(Coord::new(row, col), Unit::new(player, kind));
        }
        board
    }

    #[test]
    fn test_restricted_mover_directions() {
        let board = board_with(&[
            (2, 2, Player::Attacker, UnitType::Program),
            (0, 0, Player::Defender, UnitType::Firewall),
        ]);
        let from = Coord::new(2, 2);
        let up = CoordPair::new(from, Coord::new(1, 2));
        let left = CoordPair::new(from, Coord::new(2, 1));
        let down = CoordPair::new(from, Coord::new(3, 2));
        let right = CoordPair::new(from, Coord::new(2, 3));
        assert_eq!(classify_move(&board, Player::Attacker, &up), Some(Action::Move));
        assert_eq!(classify_move(&board, Player::Attacker, &left), Some(Action::Move));
        assert!(!is_valid_move(&board, Player::Attacker, &down));
        assert!(!is_valid_move(&board, Player::Attacker, &right));

        let d = Coord::new(0, 0);
        assert!(is_valid_move(&board, Player::Defender, &CoordPair::new(d, Coord::new(1, 0))));
        assert!(is_valid_move(&board, Player::Defender, &CoordPair::new(d, Coord::new(0, 1))));
        assert!(!is_valid_move(&board, Player::Defender, &CoordPair::new(d, Coord::new(-1, 0))));
    }

    #[test]
    fn test_free_mover_any_direction_even_engaged() {
        let board = board_with(&[
            (2, 2, Player::Defender, UnitType::Tech),
            (2, 3, Player::Attacker, UnitType::Virus),
        ]);
        let from = Coord::new(2, 2);
        for dst in [Coord::new(1, 2), Coord::new(2, 1), Coord::new(3, 2)] {
            assert!(is_valid_move(&board, Player::Defender, &CoordPair::new(from, dst)));
        }
        assert!(!is_valid_move(
            &board,
            Player::Defender,
            &CoordPair::new(from, Coord::new(3, 3))
        ));
        assert!(!is_valid_move(
            &board,
            Player::Defender,
            &CoordPair::new(from, Coord::new(0, 2))
        ));
    }

    #[test]
    fn test_wrong_side_and_empty_source() {
        let board = board_with(&[(2, 2, Player::Defender, UnitType::Tech)]);
        let mv = CoordPair::from_quad(2, 2, 2, 3);
        assert!(!is_valid_move(&board, Player::Attacker, &mv));
        assert!(!is_valid_move(&board, Player::Defender, &CoordPair::from_quad(3, 3, 3, 3)));
    }

    #[test]
    fn test_attack_requires_adjacency() {
        let board = board_with(&[
            (2, 2, Player::Attacker, UnitType::Virus),
            (2, 4, Player::Defender, UnitType::AI),
            (3, 3, Player::Defender, UnitType::Tech),
        ]);
        assert!(!is_valid_move(&board, Player::Attacker, &CoordPair::from_quad(2, 2, 2, 4)));
        assert!(!is_valid_move(&board, Player::Attacker, &CoordPair::from_quad(2, 2, 3, 3)));
    }

    #[test]
    fn test_self_destruct_splash() {
        let mut board = board_with(&[
            (2, 2, Player::Attacker, UnitType::Program),
            (1, 1, Player::Defender, UnitType::Tech),
            (3, 2, Player::Attacker, UnitType::Virus),
        ]);
        board.mod_health(Coord::new(1, 1), -8);
        let outcome = apply_move(&mut board, Player::Attacker, &CoordPair::from_quad(2, 2, 2, 2));
        assert_eq!(
            outcome,
            Some(ActionOutcome::SelfDestruct {
                at: Coord::new(2, 2),
                total_damage: 4
            })
        );
        assert!(board.is_empty(Coord::new(2, 2)));
        assert!(board.is_empty(Coord::new(1, 1)));
        assert_eq!(board.get(Coord::new(3, 2)).map(|u| u.health), Some(7));
    }

    #[test]
    fn test_outcome_descriptions() {
        let mv = CoordPair::from_quad(0, 0, 0, 1);
        assert_eq!(ActionOutcome::Move { mv }.to_string(), "move from A0 to A1");
        let attack = ActionOutcome::Attack {
            mv,
            to_source: 3,
            to_target: 9,
        };
        assert_eq!(
            attack.to_string(),
            "attack from A0 to A1\ncombat damage: to source = 3, to target = 9"
        );
    }
}
