use crate::board::CoordPair;
use crate::game::GameState;
use crate::moves::ActionOutcome;
use crate::options::Options;
use crate::pieces::Player;
use crate::search::SearchSummary;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Human-readable record of one game: parameters, every board, every action
/// and search summary, and the result.
pub struct GameTrace<W: Write = BufWriter<File>> {
    out: W,
}

impl GameTrace {
    /// Open the trace file named after `options` in the working directory.
    pub fn create(options: &Options) -> io::Result<Self> {
        let file = File::create(options.trace_file_name())?;
        Ok(GameTrace::new(BufWriter::new(file)))
    }
}

impl<W: Write> GameTrace<W> {
    pub fn new(out: W) -> Self {
        GameTrace { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_parameters(&mut self, options: &Options) -> io::Result<()> {
        let search = &options.search;
        writeln!(self.out, "Game parameters")?;
        match search.max_time {
            Some(secs) => writeln!(self.out, "Timeout: {secs:?}s")?,
            None => writeln!(self.out, "Timeout: none")?,
        }
        match options.max_turns {
            Some(turns) => writeln!(self.out, "Max turns: {turns}")?,
            None => writeln!(self.out, "Max turns: none")?,
        }
        writeln!(self.out, "Alpha-beta: {}", if search.alpha_beta { "on" } else { "off" })?;
        writeln!(self.out, "Play mode: {}", options.game_type)?;
        writeln!(self.out, "Heuristic: {}", search.heuristic)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn write_board(&mut self, state: &GameState) -> io::Result<()> {
        writeln!(self.out, "{state}")?;
        self.out.flush()
    }

    pub fn write_action(
        &mut self,
        player: Player,
        turn: u32,
        outcome: &ActionOutcome,
    ) -> io::Result<()> {
        writeln!(self.out, "Turn #{turn}: {player}")?;
        writeln!(self.out, "{outcome}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn write_invalid(&mut self, player: Player, mv: &CoordPair) -> io::Result<()> {
        writeln!(self.out, "{player}: invalid move {mv}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn write_summary(&mut self, summary: &SearchSummary) -> io::Result<()> {
        writeln!(self.out, "{summary}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn write_result(&mut self, winner: Player, turns_played: u32) -> io::Result<()> {
        writeln!(self.out, "{winner} wins in {turns_played} moves!")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameRules;

    #[test]
    fn test_trace_sections() {
        let options = Options::default();
        let mut game = GameState::new(5, GameRules::default());
        let mut trace = GameTrace::new(Vec::new());
        trace.write_parameters(&options).unwrap();
        trace.write_board(&game).unwrap();

        let mv = CoordPair::from_quad(4, 2, 3, 2);
        let player = game.next_player;
        let outcome = game.perform_move(&mv).unwrap();
        game.next_turn();
        trace.write_action(player, game.turns_played, &outcome).unwrap();
        trace.write_result(Player::Defender, 100).unwrap();

        let text = String::from_utf8(trace.into_inner()).unwrap();
        assert!(text.starts_with("Game parameters\nTimeout: 5.0s\nMax turns: 100\nAlpha-beta: on\n"));
        assert!(text.contains("Heuristic: e0"));
        assert!(text.contains("Turns played: 0"));
        assert!(text.contains("Turn #1: Attacker\nmove from E2 to D2\n"));
        assert!(text.ends_with("Defender wins in 100 moves!\n"));
    }
}
