use super::{NodeContext, Searcher, child_state, side_for};
use crate::board::CoordPair;
use crate::game::GameState;

impl Searcher {
    /// Full-width minimax. The attacker maximizes, the defender minimizes.
    pub(super) fn minimax(
        &mut self,
        mut state: GameState,
        depth: u32,
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
            let (score, _) = self.minimax(child, depth - 1, !maximize, ply, ctx);
            let improves = match best {
                None => true,
                Some((best_score, _)) if maximize => score > best_score,
                Some((best_score, _)) => score < best_score,
            };
            if improves {
                best = Some((score, mv));
            }
        }

        match best {
            Some((score, mv)) => (score, Some(mv)),
            None => (state.evaluate(ctx.heuristic), None),
        }
    }
}
