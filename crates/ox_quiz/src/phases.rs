//! Phase tags and endings for the quiz state machine.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// Stage of the game, one per [`GameState`](crate::GameState) variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Waiting for settings and questions.
    Setup,
    /// Short countdown before the next participant's question.
    Countdown,
    /// A participant is answering.
    Question,
    /// The participant's answer (or timeout) is being shown.
    Answer,
    /// All lineup members have answered; the round verdict is shown.
    Result,
    /// The host was asked whether to stop the game early.
    Confirmation,
    /// The game is over.
    Finished,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Ending {
    /// The survivor count reached the target.
    #[strum(serialize = "target reached")]
    GoalReached,
    /// The host stopped the game from the confirmation screen.
    #[strum(serialize = "stopped by host")]
    Stopped,
}

/// Engine operation names, used in rejection errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Operation {
    /// Start a game from setup.
    StartGame,
    /// Reveal the next question after a countdown.
    StartQuestion,
    /// Record a participant's answer.
    AnswerQuestion,
    /// Record a timeout for the current participant.
    HandleTimeUp,
    /// Score the turn and move to the next participant.
    AdvanceParticipant,
    /// Apply the round verdict.
    ContinueGame,
    /// Ask whether to stop the game.
    ShowConfirmation,
    /// Stop the game from the confirmation screen.
    EndGame,
    /// Return to setup.
    ResetGame,
}
