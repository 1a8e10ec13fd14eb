//! Headless games driven by contestant strategies.

use derive_new::new;
use ox_quiz::{
    Ending, GameSettings, ParticipantId, Phase, Question, QuizEngine, QuizError, RoundOutcome,
    RoundRecord,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Decides how a participant responds to a question.
pub trait Contestant {
    /// `Some(answer)` to answer, `None` to let the clock run out.
    fn respond(&mut self, participant: ParticipantId, question: &Question) -> Option<bool>;
}

impl<F> Contestant for F
where
    F: FnMut(ParticipantId, &Question) -> Option<bool>,
{
    fn respond(&mut self, participant: ParticipantId, question: &Question) -> Option<bool> {
        self(participant, question)
    }
}

/// Answers correctly with probability `accuracy` and sometimes stalls.
#[derive(Debug, Clone)]
pub struct RandomContestant {
    rng: ChaCha8Rng,
    accuracy: f64,
    timeout_rate: f64,
}

impl RandomContestant {
    /// Creates a seeded contestant. Rates are clamped to `0.0..=1.0` and
    /// non-finite rates count as zero.
    pub fn new(seed: u64, accuracy: f64, timeout_rate: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy: probability(accuracy),
            timeout_rate: probability(timeout_rate),
        }
    }
}

fn probability(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Contestant for RandomContestant {
    fn respond(&mut self, _participant: ParticipantId, question: &Question) -> Option<bool> {
        if self.rng.gen_bool(self.timeout_rate) {
            return None;
        }
        let correct = self.rng.gen_bool(self.accuracy);
        Some(if correct {
            question.answer()
        } else {
            !question.answer()
        })
    }
}

/// Limits for a simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct SimulationLimits {
    /// Round decisions (advance or retry) before the host steps in.
    pub max_rounds: u32,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self { max_rounds: 50 }
    }
}

/// Summary of a simulated game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Settings the game ran with.
    pub settings: GameSettings,
    /// How the game ended, `None` when it hit the round limit without a stop offer.
    pub ending: Option<Ending>,
    /// Round decisions made, retries included.
    pub rounds_played: u32,
    /// Rounds that were replayed.
    pub retries: u32,
    /// Turns played across all rounds.
    pub turns: u64,
    /// Winning participants, empty for an incomplete game.
    pub winners: Vec<ParticipantId>,
    /// Per-round decisions.
    pub history: Vec<RoundRecord>,
}

impl SimulationReport {
    /// Whether the game reached the finished phase.
    pub fn is_complete(&self) -> bool {
        self.ending.is_some()
    }
}

/// Plays a game from setup to the end using `contestant` for every turn.
///
/// When `limits.max_rounds` decisions have been made the host stops the game
/// if a stop is on offer; otherwise the report is returned incomplete.
#[instrument(skip(engine, questions, contestant), fields(questions = questions.len()))]
pub fn run_simulation<R: Rng, C: Contestant + ?Sized>(
    engine: &mut QuizEngine<R>,
    settings: GameSettings,
    questions: Vec<Question>,
    contestant: &mut C,
    limits: SimulationLimits,
) -> Result<SimulationReport, QuizError> {
    engine.start_game(settings, questions)?;
    let mut turns = 0u64;

    loop {
        match engine.phase() {
            Phase::Countdown => {
                engine.start_question()?;
            }
            Phase::Question => {
                let state = engine.state();
                let response = match (state.current_participant(), state.current_question()) {
                    (Some(participant), Some(question)) => {
                        contestant.respond(participant, question)
                    }
                    _ => None,
                };
                match response {
                    Some(answer) => engine.answer_question(answer)?,
                    None => engine.handle_time_up()?,
                };
                turns += 1;
            }
            Phase::Answer => {
                engine.advance_participant()?;
            }
            Phase::Result => {
                let decisions = engine.state().history().len() as u32;
                if decisions < limits.max_rounds {
                    engine.continue_game()?;
                } else if engine.state().offers_stop() {
                    info!(decisions, "Round limit reached, stopping game");
                    engine.show_confirmation()?;
                    engine.end_game()?;
                } else {
                    warn!(decisions, "Round limit reached without a stop offer");
                    break;
                }
            }
            Phase::Confirmation => {
                engine.end_game()?;
            }
            Phase::Finished | Phase::Setup => break,
        }
    }

    let state = engine.state();
    let history = state.history().to_vec();
    let retries = history
        .iter()
        .filter(|r| matches!(r.outcome, RoundOutcome::Retried { .. }))
        .count() as u32;
    let report = SimulationReport {
        settings,
        ending: state.ending(),
        rounds_played: history.len() as u32,
        retries,
        turns,
        winners: state.winners().to_vec(),
        history,
    };
    debug!(
        rounds = report.rounds_played,
        retries = report.retries,
        winners = report.winners.len(),
        "Simulation finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_contestant_extremes() {
        let question = Question::new("Is the sky blue?", true);
        let id = ParticipantId::from(1);

        let mut perfect = RandomContestant::new(1, 1.0, 0.0);
        assert!((0..20).all(|_| perfect.respond(id, &question) == Some(true)));

        let mut wrong = RandomContestant::new(1, 0.0, 0.0);
        assert!((0..20).all(|_| wrong.respond(id, &question) == Some(false)));

        let mut silent = RandomContestant::new(1, 1.0, 1.0);
        assert!((0..20).all(|_| silent.respond(id, &question).is_none()));
    }

    #[test]
    fn test_rates_are_clamped() {
        let mut contestant = RandomContestant::new(3, 4.0, -1.0);
        let question = Question::new("1 is odd?", true);
        assert_eq!(contestant.respond(ParticipantId::from(2), &question), Some(true));
    }

    #[test]
    fn test_non_finite_rates_count_as_zero() {
        let question = Question::new("1 is odd?", true);
        let id = ParticipantId::from(1);

        let mut never_right = RandomContestant::new(5, f64::NAN, 0.0);
        assert!((0..20).all(|_| never_right.respond(id, &question) == Some(false)));

        let mut always_answers = RandomContestant::new(5, 1.0, f64::INFINITY);
        assert!((0..20).all(|_| always_answers.respond(id, &question) == Some(true)));

        let mut both = RandomContestant::new(5, f64::NEG_INFINITY, f64::NAN);
        assert_eq!(both.respond(id, &question), Some(false));
    }
}
