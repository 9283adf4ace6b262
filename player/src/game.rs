//! Human-vs-engine match over a line-oriented text stream.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use games_tictactoe::{parse_move, Action, Outcome, State, TicTacToe};
use mcts::{MctsConfig, MctsSearch};
use tracing::{debug, info};

/// One game between a human on `input`/`output` and the search engine.
///
/// The search session lives for the whole game; both players' moves advance
/// its root so the statistics gathered on earlier turns are reused.
pub struct Match<R, W> {
    input: R,
    output: W,
    search: MctsSearch<TicTacToe>,
    human: usize,
    show_statistics: bool,
}

impl<R: BufRead, W: Write> Match<R, W> {
    pub fn new(
        input: R,
        output: W,
        config: MctsConfig,
        human_first: bool,
        show_statistics: bool,
    ) -> Result<Self> {
        let mut search = MctsSearch::new(TicTacToe, State::new(), 2, config);
        search.initialize()?;

        Ok(Self {
            input,
            output,
            search,
            human: if human_first { 0 } else { 1 },
            show_statistics,
        })
    }

    /// Play until the game ends and return how it ended.
    pub fn play(&mut self) -> Result<Outcome> {
        writeln!(self.output, "{}", self.search.root_state())?;

        loop {
            let state = *self.search.root_state();
            if let Some(outcome) = state.outcome() {
                self.report(outcome)?;
                return Ok(outcome);
            }

            if state.current_player() == self.human {
                self.human_turn(&state)?;
            } else {
                self.engine_turn()?;
            }
            writeln!(self.output, "{}", self.search.root_state())?;
        }
    }

    /// Read moves until a legal one arrives, then apply it.
    fn human_turn(&mut self, state: &State) -> Result<Action> {
        loop {
            write!(self.output, "Your move (row col): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(anyhow!("input closed before the game finished"));
            }

            match parse_move(&line, state) {
                Ok(action) => {
                    self.search.advance_root(&action)?;
                    debug!(%action, "Human move applied");
                    return Ok(action);
                }
                Err(e) => writeln!(self.output, "Cannot make this move: {e}")?,
            }
        }
    }

    /// Think, print optional statistics, and play the best move.
    fn engine_turn(&mut self) -> Result<Action> {
        self.search.run()?;

        if self.show_statistics {
            for stats in self.search.root_statistics() {
                let mean = stats
                    .mean_reward
                    .map_or_else(|| "-".to_string(), |m| format!("{m:+.3}"));
                writeln!(
                    self.output,
                    "  {}: visits {:>6}  mean {}",
                    stats.action, stats.visits, mean
                )?;
            }
        }

        let action = self.search.advance_to_best()?;
        let tree = self.search.tree().stats();
        info!(
            %action,
            reused_nodes = tree.total_nodes,
            reused_visits = tree.root_visits,
            "Engine move chosen"
        );

        writeln!(self.output, "Engine plays {action}")?;
        Ok(action)
    }

    fn report(&mut self, outcome: Outcome) -> Result<()> {
        let message = match outcome {
            Outcome::Win(player) if player == self.human => "You win!",
            Outcome::Win(_) => "Engine wins.",
            Outcome::Draw => "Draw.",
        };
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}
