//! OX Quiz - elimination quiz game logic.
//!
//! Participants answer true/false questions one at a time. After every
//! round either the correct or the incorrect respondents leave, until the
//! number of survivors hits the target.
//!
//! # Architecture
//!
//! - **State**: [`GameState`] is a sum type with one variant per [`Phase`].
//!   Transitions borrow the current state and return the next one.
//! - **Engine**: [`QuizEngine`] owns the state and the question RNG and
//!   commits transitions atomically.
//! - **Verdicts**: [`Verdict`] partitions round results under an
//!   [`EliminationMode`] and [`Decision`] picks finish, retry, or advance.
//!
//! # Example
//!
//! ```
//! use ox_quiz::{EliminationMode, GameSettings, Phase, Question, QuizEngine};
//!
//! let mut engine = QuizEngine::seeded(42);
//! let settings = GameSettings::new(3, 1, EliminationMode::EliminateIncorrect)?;
//! engine.start_game(settings, vec![Question::new("2+2=4?", true)])?;
//! assert_eq!(engine.start_question()?, Phase::Question);
//! assert_eq!(engine.answer_question(true)?, Phase::Answer);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod elimination;
mod engine;
mod error;
mod invariants;
mod phases;
mod picker;
mod session;
mod settings;
mod state;
mod types;

pub use elimination::{Decision, Tally, Verdict};
pub use engine::QuizEngine;
pub use error::QuizError;
pub use invariants::{
    Invariant, InvariantSet, InvariantViolation, QuizInvariants, ResultsMatchTurns,
    RosterConsistent, TurnWithinLineup, UsedQuestionsInPool,
};
pub use phases::{Ending, Operation, Phase};
pub use picker::{Pick, pick_question};
pub use session::{Round, RoundOutcome, RoundRecord, Session};
pub use settings::{GameSettings, SetupViolation};
pub use state::GameState;
pub use types::{EliminationMode, Participant, ParticipantId, Question, RoundResult};
