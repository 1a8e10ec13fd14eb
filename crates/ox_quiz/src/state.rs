//! The quiz state machine.
//!
//! Each variant carries exactly what its phase needs. Transitions are pure:
//! they borrow the current state and return the next one, so a rejected
//! operation cannot leave a half-updated game behind.

use crate::elimination::{Decision, Tally, Verdict};
use crate::error::QuizError;
use crate::phases::{Ending, Operation, Phase};
use crate::picker::pick_question;
use crate::session::{Round, RoundOutcome, RoundRecord, Session};
use crate::settings::{GameSettings, SetupViolation};
use crate::types::{Participant, ParticipantId, Question, RoundResult};
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Complete game state, tagged by phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GameState {
    /// No game yet.
    #[default]
    Setup,
    /// Countdown before `turn`'s question.
    Countdown {
        /// Session data.
        session: Session,
        /// Index into the round lineup.
        turn: usize,
    },
    /// `turn` is answering the question at `question_index`.
    Question {
        /// Session data.
        session: Session,
        /// Index into the round lineup.
        turn: usize,
        /// Index into the question pool.
        question_index: usize,
    },
    /// The answer for `turn` is locked in; `None` means time ran out.
    Answer {
        /// Session data.
        session: Session,
        /// Index into the round lineup.
        turn: usize,
        /// Index into the question pool.
        question_index: usize,
        /// Submitted answer.
        selected: Option<bool>,
    },
    /// Every lineup member has a result.
    Result {
        /// Session data.
        session: Session,
    },
    /// Waiting for the host to confirm stopping the game.
    Confirmation {
        /// Session data.
        session: Session,
    },
    /// Terminal phase.
    Finished {
        /// Session data.
        session: Session,
        /// Why the game ended.
        ending: Ending,
        /// Participants left standing.
        winners: Vec<ParticipantId>,
    },
}

// ─────────────────────────────────────────────────────────────
//  Read-only views
// ─────────────────────────────────────────────────────────────

impl GameState {
    /// Phase tag for this state.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Setup => Phase::Setup,
            Self::Countdown { .. } => Phase::Countdown,
            Self::Question { .. } => Phase::Question,
            Self::Answer { .. } => Phase::Answer,
            Self::Result { .. } => Phase::Result,
            Self::Confirmation { .. } => Phase::Confirmation,
            Self::Finished { .. } => Phase::Finished,
        }
    }

    /// Session data, absent only in setup.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Setup => None,
            Self::Countdown { session, .. }
            | Self::Question { session, .. }
            | Self::Answer { session, .. }
            | Self::Result { session }
            | Self::Confirmation { session }
            | Self::Finished { session, .. } => Some(session),
        }
    }

    /// Settings of the running game.
    pub fn settings(&self) -> Option<&GameSettings> {
        self.session().map(Session::settings)
    }

    /// Current round number; 1 before a game starts.
    pub fn round_number(&self) -> u32 {
        self.session().map_or(1, |s| s.round().number())
    }

    /// Every participant in id order.
    pub fn roster(&self) -> &[Participant] {
        self.session().map(Session::roster).unwrap_or_default()
    }

    /// Participants still in the game.
    pub fn active_participants(&self) -> Vec<Participant> {
        self.roster()
            .iter()
            .filter(|p| p.is_active())
            .copied()
            .collect()
    }

    /// Frozen turn order for the current round.
    pub fn lineup(&self) -> &[ParticipantId] {
        self.session()
            .map(|s| s.round().lineup())
            .unwrap_or_default()
    }

    /// Lineup index of the participant whose turn it is; 0 outside turns.
    pub fn turn(&self) -> usize {
        match self {
            Self::Countdown { turn, .. }
            | Self::Question { turn, .. }
            | Self::Answer { turn, .. } => *turn,
            _ => 0,
        }
    }

    /// Participant whose turn it is.
    pub fn current_participant(&self) -> Option<ParticipantId> {
        match self {
            Self::Countdown { session, turn }
            | Self::Question { session, turn, .. }
            | Self::Answer { session, turn, .. } => session.round().lineup().get(*turn).copied(),
            _ => None,
        }
    }

    /// Question being asked or revealed.
    pub fn current_question(&self) -> Option<&Question> {
        match self {
            Self::Question {
                session,
                question_index,
                ..
            }
            | Self::Answer {
                session,
                question_index,
                ..
            } => session.pool().get(*question_index),
            _ => None,
        }
    }

    /// Locked-in answer; `None` before answering or after a timeout.
    pub fn selected_answer(&self) -> Option<bool> {
        match self {
            Self::Answer { selected, .. } => *selected,
            _ => None,
        }
    }

    /// Results recorded in the current round.
    pub fn round_results(&self) -> &[RoundResult] {
        self.session()
            .map(|s| s.round().results())
            .unwrap_or_default()
    }

    /// Pool indices presented in the current round.
    pub fn used_questions(&self) -> Option<&BTreeSet<usize>> {
        self.session().map(|s| s.round().used_questions())
    }

    /// Correct/incorrect counts for the current round.
    pub fn tally(&self) -> Tally {
        Tally::from_results(self.round_results())
    }

    /// Eliminated and surviving ids the current results would produce.
    pub fn verdict(&self) -> Option<Verdict> {
        self.session().map(Session::verdict)
    }

    /// Whether the host may be offered to stop the game.
    ///
    /// Only true on the result screen while survivors exceed the target.
    pub fn offers_stop(&self) -> bool {
        match self {
            Self::Result { session } => session
                .verdict()
                .offers_stop(session.settings().final_participants()),
            _ => false,
        }
    }

    /// Round decisions so far.
    pub fn history(&self) -> &[RoundRecord] {
        self.session().map(Session::history).unwrap_or_default()
    }

    /// How the game ended, once finished.
    pub fn ending(&self) -> Option<Ending> {
        match self {
            Self::Finished { ending, .. } => Some(*ending),
            _ => None,
        }
    }

    /// Winners, once finished.
    pub fn winners(&self) -> &[ParticipantId] {
        match self {
            Self::Finished { winners, .. } => winners,
            _ => &[],
        }
    }

    #[instrument(skip(self), fields(phase = %self.phase()))]
    fn reject(&self, operation: Operation) -> QuizError {
        warn!(%operation, "Transition rejected");
        QuizError::InvalidTransition {
            operation,
            phase: self.phase(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions
// ─────────────────────────────────────────────────────────────

impl GameState {
    /// Starts a game from setup.
    ///
    /// # Errors
    ///
    /// [`QuizError::Setup`] for an empty pool or invalid settings,
    /// [`QuizError::InvalidTransition`] outside setup.
    #[instrument(skip(self, questions), fields(questions = questions.len()))]
    pub fn start_game(
        &self,
        settings: GameSettings,
        questions: Vec<Question>,
    ) -> Result<GameState, QuizError> {
        if !matches!(self, Self::Setup) {
            return Err(self.reject(Operation::StartGame));
        }
        if questions.is_empty() {
            warn!("No questions loaded");
            return Err(SetupViolation::NoQuestions.into());
        }
        settings.validate()?;

        let pool: Arc<[Question]> = questions.into();
        info!(
            total = settings.total_participants(),
            target = settings.final_participants(),
            mode = %settings.elimination_mode(),
            "Game started"
        );
        Ok(Self::Countdown {
            session: Session::begin(settings, pool),
            turn: 0,
        })
    }

    /// Picks the next question when the countdown completes.
    #[instrument(skip(self, rng), fields(phase = %self.phase()))]
    pub fn start_question<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GameState, QuizError> {
        let Self::Countdown { session, turn } = self else {
            return Err(self.reject(Operation::StartQuestion));
        };

        let mut session = session.clone();
        let pick = pick_question(session.pool.len(), session.round.used_questions(), rng)
            .ok_or(QuizError::Setup(SetupViolation::NoQuestions))?;
        session.round.mark_used(pick.index, pick.exhausted);

        debug!(turn, question_index = pick.index, "Question revealed");
        Ok(Self::Question {
            session,
            turn: *turn,
            question_index: pick.index,
        })
    }

    /// Locks in the current participant's answer.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn answer_question(&self, answer: bool) -> Result<GameState, QuizError> {
        let Self::Question {
            session,
            turn,
            question_index,
        } = self
        else {
            return Err(self.reject(Operation::AnswerQuestion));
        };

        debug!(turn, answer, "Answer recorded");
        Ok(Self::Answer {
            session: session.clone(),
            turn: *turn,
            question_index: *question_index,
            selected: Some(answer),
        })
    }

    /// Ends the current turn without an answer.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn handle_time_up(&self) -> Result<GameState, QuizError> {
        let Self::Question {
            session,
            turn,
            question_index,
        } = self
        else {
            return Err(self.reject(Operation::HandleTimeUp));
        };

        debug!(turn, "Time up");
        Ok(Self::Answer {
            session: session.clone(),
            turn: *turn,
            question_index: *question_index,
            selected: None,
        })
    }

    /// Scores the turn and hands over to the next participant.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn advance_participant(&self) -> Result<GameState, QuizError> {
        let Self::Answer {
            session,
            turn,
            question_index,
            selected,
        } = self
        else {
            return Err(self.reject(Operation::AdvanceParticipant));
        };

        let mut session = session.clone();
        let lineup_len = session.round.lineup().len();
        let (Some(&participant), Some(question)) = (
            session.round.lineup().get(*turn),
            session.pool.get(*question_index),
        ) else {
            return Err(self.reject(Operation::AdvanceParticipant));
        };

        let result = RoundResult::score(participant, *selected, question);
        debug!(
            %participant,
            correct = result.is_correct(),
            answered = result.was_answered(),
            "Turn scored"
        );
        session.round.record(result);

        if *turn + 1 >= lineup_len {
            info!(round = session.round.number(), "Round complete");
            Ok(Self::Result { session })
        } else {
            Ok(Self::Countdown {
                session,
                turn: *turn + 1,
            })
        }
    }

    /// Applies the round verdict: finish, retry, or eliminate and advance.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn continue_game(&self) -> Result<GameState, QuizError> {
        let (Self::Result { session } | Self::Confirmation { session }) = self else {
            return Err(self.reject(Operation::ContinueGame));
        };

        let verdict = session.verdict();
        let round = session.round.number();
        let target = session.settings.final_participants();
        let mut next = session.clone();

        match verdict.decide(target) {
            Decision::GoalReached => {
                info!(round, winners = verdict.survivors().len(), "Target reached");
                next.history.push(RoundRecord::new(
                    round,
                    RoundOutcome::GoalReached {
                        eliminated: verdict.eliminated().to_vec(),
                    },
                ));
                Ok(Self::Finished {
                    session: next,
                    ending: Ending::GoalReached,
                    winners: verdict.survivors().to_vec(),
                })
            }
            Decision::Retry => {
                info!(
                    round,
                    survivors = verdict.survivors().len(),
                    target,
                    "Too few survivors, replaying round"
                );
                next.round = next.round.restart();
                next.history.push(RoundRecord::new(
                    round,
                    RoundOutcome::Retried {
                        would_eliminate: verdict.eliminated().to_vec(),
                    },
                ));
                Ok(Self::Countdown {
                    session: next,
                    turn: 0,
                })
            }
            Decision::Advance => {
                next.eliminate(verdict.eliminated());
                next.history.push(RoundRecord::new(
                    round,
                    RoundOutcome::Advanced {
                        eliminated: verdict.eliminated().to_vec(),
                    },
                ));
                next.round = Round::begin(round + 1, next.active_ids());
                info!(
                    round = round + 1,
                    eliminated = verdict.eliminated().len(),
                    remaining = next.round.lineup().len(),
                    "Round advanced"
                );
                Ok(Self::Countdown {
                    session: next,
                    turn: 0,
                })
            }
        }
    }

    /// Asks the host whether to stop the game.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn show_confirmation(&self) -> Result<GameState, QuizError> {
        match self {
            Self::Result { session } if self.offers_stop() => Ok(Self::Confirmation {
                session: session.clone(),
            }),
            _ => Err(self.reject(Operation::ShowConfirmation)),
        }
    }

    /// Stops the game with the current active participants as winners.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn end_game(&self) -> Result<GameState, QuizError> {
        let Self::Confirmation { session } = self else {
            return Err(self.reject(Operation::EndGame));
        };

        let mut session = session.clone();
        let round = session.round.number();
        session
            .history
            .push(RoundRecord::new(round, RoundOutcome::Stopped));
        let winners = session.active_ids();
        info!(round, winners = winners.len(), "Game stopped by host");
        Ok(Self::Finished {
            session,
            ending: Ending::Stopped,
            winners,
        })
    }

    /// Drops everything and returns to setup. Valid from any phase.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn reset_game(&self) -> GameState {
        info!("Game reset");
        Self::Setup
    }
}
