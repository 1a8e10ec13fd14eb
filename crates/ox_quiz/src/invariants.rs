//! First-class invariants for the quiz state machine.
//!
//! Invariants are logical properties that must hold after every transition.
//! The engine checks them in debug builds; tests check them directly.

use crate::state::GameState;
use crate::types::ParticipantId;
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<InvariantViolation> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
            (I4::holds(state), I4::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| {
            warn!(description, "Invariant violated");
            InvariantViolation::new(description)
        })
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// The turn index points into the frozen lineup while a turn is running.
pub struct TurnWithinLineup;

impl Invariant<GameState> for TurnWithinLineup {
    fn holds(state: &GameState) -> bool {
        match state {
            GameState::Countdown { .. } | GameState::Question { .. } | GameState::Answer { .. } => {
                state.turn() < state.lineup().len()
            }
            _ => state.turn() == 0,
        }
    }

    fn description() -> &'static str {
        "Turn index must be inside the round lineup"
    }
}

/// Used question indices are a subset of the pool.
pub struct UsedQuestionsInPool;

impl Invariant<GameState> for UsedQuestionsInPool {
    fn holds(state: &GameState) -> bool {
        match state.session() {
            Some(session) => {
                let pool_len = session.pool().len();
                session
                    .round()
                    .used_questions()
                    .iter()
                    .all(|&i| i < pool_len)
            }
            None => true,
        }
    }

    fn description() -> &'static str {
        "Used question indices must refer to the pool"
    }
}

/// One result per completed turn.
pub struct ResultsMatchTurns;

impl Invariant<GameState> for ResultsMatchTurns {
    fn holds(state: &GameState) -> bool {
        let recorded = state.round_results().len();
        match state {
            GameState::Setup => recorded == 0,
            GameState::Countdown { turn, .. }
            | GameState::Question { turn, .. }
            | GameState::Answer { turn, .. } => recorded == *turn,
            GameState::Result { .. } | GameState::Confirmation { .. } => {
                recorded == state.lineup().len()
            }
            GameState::Finished { .. } => recorded <= state.lineup().len(),
        }
    }

    fn description() -> &'static str {
        "Round results must match the number of completed turns"
    }
}

/// Roster ids are `1..=N` and the lineup only holds active participants.
pub struct RosterConsistent;

impl Invariant<GameState> for RosterConsistent {
    fn holds(state: &GameState) -> bool {
        let roster = state.roster();
        let sequential = roster
            .iter()
            .enumerate()
            .all(|(i, p)| p.id() == ParticipantId::from(i as u32 + 1));
        let lineup_active = state.lineup().iter().all(|id| {
            roster.iter().any(|p| p.id() == *id && p.is_active())
        });
        sequential && lineup_active
    }

    fn description() -> &'static str {
        "Participant ids must be permanent and the lineup must be active"
    }
}

/// All quiz invariants as a composable set.
pub type QuizInvariants = (
    TurnWithinLineup,
    UsedQuestionsInPool,
    ResultsMatchTurns,
    RosterConsistent,
);
