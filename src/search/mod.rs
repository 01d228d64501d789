//! Game-tree search for the computer player.
//!
//! Plain minimax and minimax with alpha-beta pruning over owned state
//! clones (no make/unmake). Both stop expanding a branch when:
//! - the game is over in that branch
//! - the depth budget is used up
//! - the time budget (minus a 10ms margin) is spent, once `min_depth` plies are searched
//!
//! Node visits are counted per depth in [`SearchStats`], which lives for the
//! whole game and is never reset between moves.

mod alphabeta;
mod minimax;
mod ordering;
mod stats;

pub use stats::{SearchStats, SearchSummary};

use crate::board::CoordPair;
use crate::evaluation::Heuristic;
use crate::game::GameState;
use crate::moves::MoveList;
use crate::options::SearchOptions;
use crate::pieces::Player;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound of any heuristic score, used as the initial beta.
pub const MAX_HEURISTIC_SCORE: i32 = 2_000_000_000;
/// Lower bound of any heuristic score, used as the initial alpha.
pub const MIN_HEURISTIC_SCORE: i32 = -2_000_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `None` when the side to move has no legal move
    pub best_move: Option<CoordPair>,
    /// Score of the best move, attacker-positive
    pub score: i32,
    /// Depth the search was run with
    pub depth: u32,
    pub elapsed: Duration,
}

/// Per-search constants shared by every node.
struct NodeContext {
    start: Instant,
    cutoff: Option<Duration>,
    min_depth: u32,
    heuristic: Heuristic,
}

impl NodeContext {
    #[inline]
    fn out_of_time(&self, ply: u32) -> bool {
        ply > self.min_depth && self.cutoff.is_some_and(|cutoff| self.start.elapsed() >= cutoff)
    }
}

pub struct Searcher {
    options: SearchOptions,
    stats: SearchStats,
    rng: SmallRng,
}

impl Searcher {
    pub fn new(options: SearchOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Searcher {
            options,
            stats: SearchStats::default(),
            rng,
        }
    }

    /// Statistics accumulated over every search of this game.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pick a move for the side to move in `state`.
    pub fn suggest_move(&mut self, state: &GameState) -> SearchResult {
        let start = Instant::now();
        let ctx = NodeContext {
            start,
            cutoff: self.options.cutoff(),
            min_depth: self.options.min_depth(),
            heuristic: self.options.heuristic,
        };
        let depth = self.options.depth();
        let maximize = state.next_player == Player::Attacker;

        let (score, best_move) = if self.options.alpha_beta {
            self.alphabeta(
                state.clone(),
                depth,
                MIN_HEURISTIC_SCORE,
                MAX_HEURISTIC_SCORE,
                maximize,
                0,
                &ctx,
            )
        } else {
            self.minimax(state.clone(), depth, maximize, 0, &ctx)
        };

        let elapsed = start.elapsed();
        self.stats.total_seconds += elapsed.as_secs_f64();

        let result = SearchResult {
            best_move,
            score,
            depth,
            elapsed,
        };
        debug!(
            player = %state.next_player,
            alpha_beta = self.options.alpha_beta,
            depth,
            score,
            best_move = ?result.best_move.map(|mv| mv.to_string()),
            evaluations = self.stats.total_evaluations(),
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );
        result
    }

    /// Summary of `result` against the cumulative statistics, for printing.
    pub fn summary(&self, result: &SearchResult) -> SearchSummary {
        self.stats.summary(result.score, result.elapsed)
    }

    /// Count the node and decide whether it is evaluated instead of expanded.
    #[inline]
    fn visit(&mut self, state: &GameState, depth: u32, ply: u32, ctx: &NodeContext) -> bool {
        self.stats.record_visit(ply);
        state.is_finished() || depth == 0 || ctx.out_of_time(ply)
    }

    fn candidates(&mut self, state: &GameState) -> MoveList {
        let mut moves = state.get_legal_moves();
        if self.options.randomize_moves {
            ordering::shuffle_moves(&mut moves, &mut self.rng);
        }
        self.stats.record_expansion(moves.len());
        moves
    }
}

#[inline]
fn side_for(maximize: bool) -> Player {
    if maximize {
        Player::Attacker
    } else {
        Player::Defender
    }
}

/// Clone `state` and play `mv` on the copy, handing the turn over. Advancing the
/// turn counter here is what lets the turn limit end lines inside the tree.
#[inline]
fn child_state(state: &GameState, mv: &CoordPair) -> Option<GameState> {
    let mut child = state.clone();
    child.perform_move(mv).ok()?;
    child.next_turn();
    Some(child)
}

/// Node count of a full-width minimax search from `state`, for benchmarks.
pub fn minimax_node_count_for_depth(state: &GameState, depth: u32) -> u64 {
    let mut searcher = Searcher::new(SearchOptions {
        alpha_beta: false,
        max_depth: Some(depth),
        min_depth: None,
        max_time: None,
        randomize_moves: false,
        ..SearchOptions::default()
    });
    searcher.suggest_move(state);
    searcher.stats().total_evaluations()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameRules;

    fn fixed_options(alpha_beta: bool, depth: u32) -> SearchOptions {
        SearchOptions {
            alpha_beta,
            max_depth: Some(depth),
            min_depth: None,
            max_time: None,
            heuristic: Heuristic::E2,
            randomize_moves: false,
            seed: Some(7),
        }
    }

    #[test]
    fn test_depth_zero_returns_evaluation_without_move() {
        let state = GameState::new(5, GameRules::default());
        let mut searcher = Searcher::new(fixed_options(true, 0));
        let result = searcher.suggest_move(&state);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
        assert_eq!(searcher.stats().total_evaluations(), 1);
    }

    #[test]
    fn test_depth_one_counts_root_and_children() {
        let state = GameState::new(5, GameRules::default());
        let moves = state.get_legal_moves().len() as u64;
        let mut searcher = Searcher::new(fixed_options(false, 1));
        let result = searcher.suggest_move(&state);
        assert!(result.best_move.is_some());
        let counts = searcher.stats().depth_counts();
        assert_eq!(counts, vec![(1, 1), (2, moves)]);
    }

    #[test]
    fn test_stats_accumulate_across_searches() {
        let state = GameState::new(5, GameRules::default());
        let mut searcher = Searcher::new(fixed_options(true, 2));
        searcher.suggest_move(&state);
        let first = searcher.stats().total_evaluations();
        searcher.suggest_move(&state);
        assert_eq!(searcher.stats().total_evaluations(), first * 2);
        assert!(searcher.stats().total_seconds >= 0.0);
    }

    #[test]
    fn test_spent_budget_still_expands_min_depth() {
        let state = GameState::new(5, GameRules::default());
        let mut searcher = Searcher::new(SearchOptions {
            max_time: Some(0.0),
            min_depth: Some(1),
            max_depth: Some(6),
            randomize_moves: false,
            ..SearchOptions::default()
        });
        let result = searcher.suggest_move(&state);
        assert!(result.best_move.is_some());
        // Root expanded, every child cut off by the clock.
        assert_eq!(searcher.stats().depth_counts().len(), 2);
    }
}
