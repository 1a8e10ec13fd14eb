//! Engine error types.

use crate::phases::{Operation, Phase};
use crate::settings::SetupViolation;
use derive_more::{Display, Error, From};

/// Error returned when the engine refuses an operation.
///
/// The game state is never modified when an error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum QuizError {
    /// The game could not be started with the given settings or questions.
    #[display("Cannot start game: {_0}")]
    #[from]
    Setup(SetupViolation),

    /// The operation is not valid in the current phase.
    #[display("{operation} is not allowed in the {phase} phase")]
    InvalidTransition {
        /// Operation that was attempted.
        operation: Operation,
        /// Phase the game was in.
        phase: Phase,
    },
}

impl QuizError {
    /// Returns true for setup violations.
    pub fn is_setup_violation(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}
