use std::io::Write;
use std::sync::mpsc::Receiver;

use log::{debug, error, info};
use rand::Rng;

use crate::error::SnakeError;
use crate::game::{GameState, StepOutcome};
use crate::high_score::HighScoreStore;
use crate::input::{Action, SharedDirection};
use crate::term::TermManager;

const PAUSED_MSG: &str = "Game paused. Press P to resume.";
const RESUMED_MSG: &str = "Game resumed.";
const GAME_OVER_MSG: &str = "Game Over! Press F to restart, Q to quit.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The single consumer of the event queue. All game state lives here and is
/// mutated one action at a time.
pub struct Engine<W: Write, R: Rng> {
    state: GameState<R>,
    term: TermManager<W>,
    store: HighScoreStore,
    high_score: u32,
    direction: SharedDirection,
}

impl<W: Write, R: Rng> Engine<W, R> {
    pub fn new(
        state: GameState<R>,
        term: TermManager<W>,
        store: HighScoreStore,
        high_score: u32,
        direction: SharedDirection,
    ) -> Self {
        direction.set(state.direction());
        Engine { state, term, store, high_score, direction }
    }

    /// Draws the first frame, then handles actions in arrival order until the
    /// player leaves or every producer is gone.
    pub fn run(&mut self, rx: &Receiver<Action>) -> Result<(), SnakeError> {
        self.term.draw_frame(&self.state, self.high_score)?;

        for action in rx.iter() {
            if self.handle(action)? == Flow::Exit {
                return Ok(());
            }
        }

        debug!("event queue closed");
        Ok(())
    }

    pub fn status(&self) -> Status {
        if self.state.is_game_over() {
            Status::GameOver
        } else if self.state.is_paused() {
            Status::Paused
        } else {
            Status::Running
        }
    }

    pub fn handle(&mut self, action: Action) -> Result<Flow, SnakeError> {
        match (self.status(), action) {
            (_, Action::Interrupt) => {
                info!("interrupted");
                return Ok(Flow::Exit);
            }
            (Status::GameOver, Action::Quit) => {
                info!("quit with high score {}", self.high_score);
                return Ok(Flow::Exit);
            }
            (Status::GameOver, Action::Restart) => {
                self.state.reset();
                self.direction.set(self.state.direction());
                self.term.draw_frame(&self.state, self.high_score)?;
            }
            (Status::GameOver, _) => {}
            (_, Action::Pause) => {
                let paused = self.state.toggle_pause();
                debug!("paused: {}", paused);
                self.term.show_message(&[if paused { PAUSED_MSG } else { RESUMED_MSG }])?;
            }
            (_, Action::Move(direction)) => {
                if self.state.set_direction(direction) {
                    self.direction.set(direction);
                }
            }
            (Status::Running, Action::Tick) => self.tick()?,
            (Status::Paused, Action::Tick) => {}
            (_, Action::Restart) | (_, Action::Quit) => {}
        }

        Ok(Flow::Continue)
    }

    fn tick(&mut self) -> Result<(), SnakeError> {
        let outcome = self.state.advance();

        let save_error = match outcome {
            Some(StepOutcome::Crashed(_)) => self.record_high_score(),
            _ => None,
        };

        self.term.draw_frame(&self.state, self.high_score)?;

        if self.state.is_game_over() {
            let mut lines = vec![];
            if let Some(e) = &save_error {
                lines.push(format!("Error saving high score: {}", e));
            }
            lines.push(GAME_OVER_MSG.to_string());
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            self.term.show_message(&lines)?;
        }

        Ok(())
    }

    /// Persists a new best right away. A failed save is handed back so it can
    /// be shown to the player; the game carries on either way.
    fn record_high_score(&mut self) -> Option<SnakeError> {
        let score = self.state.score();
        if score <= self.high_score {
            return None;
        }

        self.high_score = score;
        info!("new high score {}", score);

        match self.store.save(score) {
            Ok(()) => None,
            Err(e) => {
                error!("{}", e);
                Some(e)
            }
        }
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut GameState<R> {
        &mut self.state
    }

    #[cfg(test)]
    pub fn term_mut(&mut self) -> &mut TermManager<W> {
        &mut self.term
    }
}
