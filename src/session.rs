//! One game from opening to result: the authoritative state, the computer
//! player and the outputs (trace file, broker).

use crate::board::CoordPair;
use crate::error::{GameError, GameResult};
use crate::game::GameState;
use crate::moves::ActionOutcome;
use crate::options::Options;
use crate::pieces::Player;
use crate::search::{SearchSummary, Searcher};
use crate::trace::GameTrace;
use tracing::{info, warn};

#[cfg(feature = "broker")]
use crate::broker::BrokerClient;

/// A move the computer chose and played.
#[derive(Debug, Clone)]
pub struct ComputerMove {
    pub mv: CoordPair,
    pub outcome: ActionOutcome,
    pub summary: SearchSummary,
}

pub struct GameSession {
    state: GameState,
    options: Options,
    searcher: Searcher,
    trace: Option<GameTrace>,
    #[cfg(feature = "broker")]
    broker: Option<BrokerClient>,
}

impl GameSession {
    pub fn new(options: Options) -> GameResult<Self> {
        let state = GameState::from_options(&options)?;
        let searcher = Searcher::new(options.search.clone());

        #[cfg(feature = "broker")]
        let broker = options.broker.as_deref().map(BrokerClient::new);
        #[cfg(not(feature = "broker"))]
        if options.broker.is_some() {
            warn!("built without broker support, ignoring broker URL");
        }

        Ok(GameSession {
            state,
            options,
            searcher,
            trace: None,
            #[cfg(feature = "broker")]
            broker,
        })
    }

    /// Record the game to `trace`, starting with its parameters.
    pub fn with_trace(mut self, mut trace: GameTrace) -> GameResult<Self> {
        trace.write_parameters(&self.options)?;
        self.trace = Some(trace);
        Ok(self)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn winner(&self) -> Option<Player> {
        self.state.has_winner()
    }

    pub fn is_human_turn(&self) -> bool {
        self.options.game_type.is_human(self.state.next_player)
    }

    #[cfg(feature = "broker")]
    pub fn has_broker(&self) -> bool {
        self.broker.is_some()
    }

    #[cfg(not(feature = "broker"))]
    pub fn has_broker(&self) -> bool {
        false
    }

    /// Append the current board to the trace.
    pub fn trace_board(&mut self) -> GameResult<()> {
        if let Some(trace) = self.trace.as_mut() {
            trace.write_board(&self.state)?;
        }
        Ok(())
    }

    /// Play `mv` for the side to move and hand the turn over.
    pub fn play_move(&mut self, mv: &CoordPair) -> GameResult<ActionOutcome> {
        let player = self.state.next_player;
        let outcome = match self.state.perform_move(mv) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Some(trace) = self.trace.as_mut() {
                    trace.write_invalid(player, mv)?;
                }
                return Err(err);
            }
        };
        self.state.next_turn();
        info!(%player, %mv, action = ?outcome.action(), turn = self.state.turns_played, "move played");
        if let Some(trace) = self.trace.as_mut() {
            trace.write_action(player, self.state.turns_played, &outcome)?;
        }
        Ok(outcome)
    }

    /// Search, play the suggested move and publish it to the broker.
    pub fn computer_turn(&mut self) -> GameResult<ComputerMove> {
        let player = self.state.next_player;
        let result = self.searcher.suggest_move(&self.state);
        let mv = result
            .best_move
            .ok_or(GameError::NoMoveAvailable { player })?;
        let summary = self.searcher.summary(&result);

        let outcome = self.play_move(&mv)?;
        if let Some(trace) = self.trace.as_mut() {
            trace.write_summary(&summary)?;
        }

        #[cfg(feature = "broker")]
        if let Some(broker) = &self.broker {
            if let Err(err) = broker.post_move(&mv, self.state.turns_played) {
                warn!(%err, %mv, "failed to publish move");
            }
        }

        Ok(ComputerMove {
            mv,
            outcome,
            summary,
        })
    }

    /// The opponent's next move from the broker, if it has been posted yet.
    pub fn fetch_broker_move(&self) -> GameResult<Option<CoordPair>> {
        #[cfg(feature = "broker")]
        if let Some(broker) = &self.broker {
            return broker.fetch_move(self.state.turns_played);
        }
        Ok(None)
    }

    /// Write the result to the trace once the game is decided.
    pub fn finish(&mut self) -> GameResult<Option<Player>> {
        let winner = self.winner();
        if let (Some(winner), Some(trace)) = (winner, self.trace.as_mut()) {
            trace.write_result(winner, self.state.turns_played)?;
        }
        Ok(winner)
    }
}
