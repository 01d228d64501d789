use super::{NodeContext, Searcher, child_state, side_for};
use crate::board::CoordPair;
use crate::game::GameState;

impl Searcher {
    /// Minimax with alpha-beta pruning (fail-soft).
    ///
    /// `alpha` is the score the attacker is already guaranteed, `beta` the score
    /// the defender is already guaranteed. Remaining siblings are skipped once
    /// the window closes.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn alphabeta(
        &mut self,
        mut state: GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximize: bool,
        ply: u32,
        ctx: &NodeContext,
    ) -> (i32, Option<CoordPair>) {
        let ply = ply + 1;
        if self.visit(&state, depth, ply, ctx) {
            return (state.evaluate(ctx.heuristic), None);
        }

        state.next_player = side_for(maximize);
        let moves = self.candidates(&state);

        let mut best: Option<(i32, CoordPair)> = None;
        for mv in moves {
            let Some(child) = child_state(&state, &mv) else {
                continue;
            };
            let (score, _) = self.alphabeta(child, depth - 1, alpha, beta, !maximize, ply, ctx);

            if maximize {
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, mv));
                }
                let best_score = best.map_or(score, |(s, _)| s);
                alpha = alpha.max(best_score);
                if best_score >= beta {
                    break;
                }
            } else {
                if best.is_none_or(|(best_score, _)| score < best_score) {
                    best = Some((score, mv));
                }
                let best_score = best.map_or(score, |(s, _)| s);
                beta = beta.min(best_score);
                if best_score <= alpha {
                    break;
                }
            }
        }

        match best {
            Some((score, mv)) => (score, Some(mv)),
            None => (state.evaluate(ctx.heuristic), None),
        }
    }
}
