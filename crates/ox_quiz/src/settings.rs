//! Game settings and their start-time validation.

use super::types::EliminationMode;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Reason a game cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SetupViolation {
    /// The question pool is empty.
    #[display("no questions are loaded")]
    NoQuestions,

    /// Fewer than two participants.
    #[display("at least 2 participants are required (got {total})")]
    TooFewParticipants {
        /// Requested participant count.
        total: u32,
    },

    /// More participants than a session can seat.
    #[display("at most {max} participants are supported (got {total})")]
    TooManyParticipants {
        /// Requested participant count.
        total: u32,
        /// Largest supported count.
        max: u32,
    },

    /// A target of zero survivors.
    #[display("the final participant count must be at least 1")]
    FinalIsZero,

    /// The target is not strictly below the starting field.
    #[display("the final participant count ({target}) must be less than the total ({total})")]
    FinalNotBelowTotal {
        /// Requested participant count.
        total: u32,
        /// Requested survivor count.
        target: u32,
    },
}

/// Session settings, fixed once the game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    total_participants: u32,
    final_participants: u32,
    #[serde(default)]
    elimination_mode: EliminationMode,
}

impl GameSettings {
    /// Largest participant count a session accepts.
    pub const MAX_PARTICIPANTS: u32 = 999;

    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupViolation`] when the participant count is outside
    /// `2..=MAX_PARTICIPANTS`, `final_participants == 0`, or
    /// `final_participants >= total_participants`.
    #[instrument]
    pub fn new(
        total_participants: u32,
        final_participants: u32,
        elimination_mode: EliminationMode,
    ) -> Result<Self, SetupViolation> {
        let settings = Self {
            total_participants,
            final_participants,
            elimination_mode,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the start preconditions that do not depend on the question pool.
    ///
    /// Deserialized settings bypass [`GameSettings::new`], so the engine
    /// calls this again before starting a game.
    #[instrument(
        skip(self),
        fields(total = self.total_participants, target = self.final_participants)
    )]
    pub fn validate(&self) -> Result<(), SetupViolation> {
        let violation = if self.total_participants < 2 {
            Some(SetupViolation::TooFewParticipants {
                total: self.total_participants,
            })
        } else if self.total_participants > Self::MAX_PARTICIPANTS {
            Some(SetupViolation::TooManyParticipants {
                total: self.total_participants,
                max: Self::MAX_PARTICIPANTS,
            })
        } else if self.final_participants == 0 {
            Some(SetupViolation::FinalIsZero)
        } else if self.final_participants >= self.total_participants {
            Some(SetupViolation::FinalNotBelowTotal {
                total: self.total_participants,
                target: self.final_participants,
            })
        } else {
            None
        };

        match violation {
            Some(v) => {
                warn!(violation = %v, "Settings rejected");
                Err(v)
            }
            None => Ok(()),
        }
    }

    /// Number of participants at game start.
    pub fn total_participants(&self) -> u32 {
        self.total_participants
    }

    /// Number of survivors that ends the game.
    pub fn final_participants(&self) -> u32 {
        self.final_participants
    }

    /// Elimination policy.
    pub fn elimination_mode(&self) -> EliminationMode {
        self.elimination_mode
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_participants: 10,
            final_participants: 3,
            elimination_mode: EliminationMode::EliminateIncorrect,
        }
    }
}
