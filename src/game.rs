use crate::board::{Board, CoordPair};
use crate::error::{GameError, GameResult};
use crate::evaluation::{Heuristic, evaluate};
use crate::moves::{ActionOutcome, MoveList, apply_move, get_legal_moves, is_valid_move};
use crate::options::Options;
use crate::pieces::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rules that can vary between games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameRules {
    /// The defender wins once this many turns have been played.
    pub max_turns: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Player),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub next_player: Player,
    pub turns_played: u32,
    pub rules: GameRules,
}

impl GameState {
    /// Opening position with the attacker to move.
    pub fn new(dim: u8, rules: GameRules) -> Self {
        GameState::from_board(Board::with_default_layout(dim), Player::Attacker, rules)
    }

    pub fn from_board(board: Board, next_player: Player, rules: GameRules) -> Self {
        GameState {
            board,
            next_player,
            turns_played: 0,
            rules,
        }
    }

    pub fn from_options(options: &Options) -> GameResult<Self> {
        options.validate()?;
        Ok(GameState::new(
            options.dim,
            GameRules {
                max_turns: options.max_turns,
            },
        ))
    }

    #[inline]
    pub fn is_valid_move(&self, mv: &CoordPair) -> bool {
        is_valid_move(&self.board, self.next_player, mv)
    }

    /// Play `mv` for the side to move. Illegal moves leave the state untouched.
    /// Does not advance the turn.
    pub fn perform_move(&mut self, mv: &CoordPair) -> GameResult<ActionOutcome> {
        apply_move(&mut self.board, self.next_player, mv).ok_or(GameError::InvalidMove { mv: *mv })
    }

    /// Hand the move to the other side.
    pub fn next_turn(&mut self) {
        self.next_player = self.next_player.next();
        self.turns_played += 1;
    }

    pub fn get_legal_moves(&self) -> MoveList {
        get_legal_moves(&self.board, self.next_player)
    }

    /// The turn limit and losing the attacker's AI both favour the defender,
    /// so losing both AIs at once is a defender win.
    pub fn status(&self) -> GameStatus {
        if let Some(max_turns) = self.rules.max_turns {
            if self.turns_played >= max_turns {
                return GameStatus::Won(Player::Defender);
            }
        }
        match (
            self.board.has_ai(Player::Attacker),
            self.board.has_ai(Player::Defender),
        ) {
            (true, true) => GameStatus::InProgress,
            (true, false) => GameStatus::Won(Player::Attacker),
            (false, _) => GameStatus::Won(Player::Defender),
        }
    }

    pub fn has_winner(&self) -> Option<Player> {
        match self.status() {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(player),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status() != GameStatus::InProgress
    }

    #[inline]
    pub fn evaluate(&self, heuristic: Heuristic) -> i32 {
        evaluate(&self.board, heuristic)
    }

    /// Count leaf positions `depth` turns ahead. Finished games are leaves.
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 || self.is_finished() {
            return 1;
        }

        let mut nodes = 0;
        for mv in self.get_legal_moves() {
            let mut child = self.clone();
            if child.perform_move(&mv).is_ok() {
                child.next_turn();
                nodes += child.perft(depth - 1);
            }
        }
        nodes
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Next player: {}", self.next_player)?;
        writeln!(f, "Turns played: {}", self.turns_played)?;
        writeln!(f)?;
        write!(f, "{}", self.board)
    }
}
