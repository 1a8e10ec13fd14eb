//! Stateful driver around [`GameState`] transitions.

use crate::error::QuizError;
#[cfg(debug_assertions)]
use crate::invariants::{InvariantSet, QuizInvariants};
use crate::phases::Phase;
use crate::settings::GameSettings;
use crate::state::GameState;
use crate::types::Question;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Owns the current game state and the question RNG.
///
/// Every operation computes the next state from the current one and swaps it
/// in whole. On error the current state is kept as it was.
#[derive(Debug, Clone)]
pub struct QuizEngine<R = ChaCha8Rng> {
    state: GameState,
    rng: R,
}

impl QuizEngine<ChaCha8Rng> {
    /// Creates an engine seeded from OS entropy.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates an engine with a fixed seed, for reproducible games.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for QuizEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizEngine<R> {
    /// Creates an engine in setup using the given RNG.
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: GameState::Setup,
            rng,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// See [`GameState::start_game`].
    pub fn start_game(
        &mut self,
        settings: GameSettings,
        questions: Vec<Question>,
    ) -> Result<Phase, QuizError> {
        let next = self.state.start_game(settings, questions)?;
        Ok(self.commit(next))
    }

    /// See [`GameState::start_question`].
    pub fn start_question(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.start_question(&mut self.rng)?;
        Ok(self.commit(next))
    }

    /// See [`GameState::answer_question`].
    pub fn answer_question(&mut self, answer: bool) -> Result<Phase, QuizError> {
        let next = self.state.answer_question(answer)?;
        Ok(self.commit(next))
    }

    /// See [`GameState::handle_time_up`].
    pub fn handle_time_up(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.handle_time_up()?;
        Ok(self.commit(next))
    }

    /// See [`GameState::advance_participant`].
    pub fn advance_participant(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.advance_participant()?;
        Ok(self.commit(next))
    }

    /// See [`GameState::continue_game`].
    pub fn continue_game(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.continue_game()?;
        Ok(self.commit(next))
    }

    /// See [`GameState::show_confirmation`].
    pub fn show_confirmation(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.show_confirmation()?;
        Ok(self.commit(next))
    }

    /// See [`GameState::end_game`].
    pub fn end_game(&mut self) -> Result<Phase, QuizError> {
        let next = self.state.end_game()?;
        Ok(self.commit(next))
    }

    /// See [`GameState::reset_game`].
    pub fn reset_game(&mut self) -> Phase {
        let next = self.state.reset_game();
        self.commit(next)
    }

    #[instrument(skip_all, fields(from = %self.state.phase(), to = %next.phase()))]
    fn commit(&mut self, next: GameState) -> Phase {
        // Postcondition: all invariants hold after the transition.
        #[cfg(debug_assertions)]
        if let Err(violations) = QuizInvariants::check_all(&next) {
            debug_assert!(false, "Invariant violation after transition: {violations:?}");
        }

        let phase = next.phase();
        self.state = next;
        debug!("Transition committed");
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EliminationMode;

    #[test]
    fn test_rejected_operation_keeps_state() {
        let mut engine = QuizEngine::seeded(3);
        let before = engine.state().clone();
        assert!(engine.answer_question(true).is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_reset_from_mid_game() {
        let mut engine = QuizEngine::seeded(3);
        let settings =
            GameSettings::new(3, 1, EliminationMode::EliminateCorrect).expect("valid settings");
        engine
            .start_game(settings, vec![Question::new("1+1=2?", true)])
            .expect("game starts");
        engine.start_question().expect("countdown done");
        assert_eq!(engine.reset_game(), Phase::Setup);
        assert!(engine.state().roster().is_empty());
        assert_eq!(engine.state().round_number(), 1);
    }
}
