//! Tests for the quiz state machine lifecycle and elimination policies.

use ox_quiz::{
    EliminationMode, Ending, GameSettings, GameState, InvariantSet, Operation, ParticipantId,
    Phase, Question, QuizEngine, QuizError, QuizInvariants, RoundOutcome, SetupViolation,
};

fn ids(raw: &[u32]) -> Vec<ParticipantId> {
    raw.iter().copied().map(ParticipantId::from).collect()
}

fn start(total: u32, target: u32, mode: EliminationMode) -> QuizEngine {
    let mut engine = QuizEngine::seeded(11);
    let settings = GameSettings::new(total, target, mode).expect("valid settings");
    engine
        .start_game(settings, vec![Question::new("2+2=4?", true)])
        .expect("game starts");
    engine
}

/// Plays one full round. `None` lets the turn time out.
fn play_round(engine: &mut QuizEngine, answers: &[Option<bool>]) {
    for answer in answers {
        assert_eq!(engine.phase(), Phase::Countdown);
        engine.start_question().expect("countdown completes");
        match answer {
            Some(a) => engine.answer_question(*a).expect("answer accepted"),
            None => engine.handle_time_up().expect("time up accepted"),
        };
        engine.advance_participant().expect("turn scored");
        assert!(QuizInvariants::check_all(engine.state()).is_ok());
    }
    assert_eq!(engine.phase(), Phase::Result);
}

#[test]
fn test_start_creates_sequential_active_roster() {
    let engine = start(6, 2, EliminationMode::EliminateIncorrect);
    let state = engine.state();
    assert_eq!(state.phase(), Phase::Countdown);
    assert_eq!(state.round_number(), 1);
    assert_eq!(state.turn(), 0);
    assert!(state.round_results().is_empty());
    assert_eq!(state.used_questions().map(|u| u.len()), Some(0));

    let roster: Vec<ParticipantId> = state.roster().iter().map(|p| p.id()).collect();
    assert_eq!(roster, ids(&[1, 2, 3, 4, 5, 6]));
    assert!(state.roster().iter().all(|p| p.is_active()));
    assert_eq!(state.lineup(), ids(&[1, 2, 3, 4, 5, 6]).as_slice());
}

#[test]
fn test_start_without_questions_is_blocked() {
    let mut engine = QuizEngine::seeded(1);
    let settings = GameSettings::default();
    let err = engine.start_game(settings, Vec::new()).expect_err("no questions");
    assert_eq!(err, QuizError::Setup(SetupViolation::NoQuestions));
    assert!(err.is_setup_violation());
    assert_eq!(engine.phase(), Phase::Setup);
}

#[test]
fn test_start_with_unchecked_settings_is_blocked() {
    let mut engine = QuizEngine::seeded(1);
    let settings: GameSettings = serde_json::from_str(
        r#"{"total_participants":4,"final_participants":4,"elimination_mode":"correct"}"#,
    )
    .expect("valid json");
    let err = engine
        .start_game(settings, vec![Question::new("q", true)])
        .expect_err("final not below total");
    assert!(matches!(
        err,
        QuizError::Setup(SetupViolation::FinalNotBelowTotal { total: 4, target: 4 })
    ));
    assert_eq!(engine.state(), &GameState::Setup);
}

#[test]
fn test_goal_reached_example() {
    // Participants 1 and 3 correct; 2 and 5 wrong; 4 times out.
    let mut engine = start(5, 2, EliminationMode::EliminateIncorrect);
    play_round(
        &mut engine,
        &[Some(true), Some(false), Some(true), None, Some(false)],
    );

    let verdict = engine.state().verdict().expect("session running");
    assert_eq!(verdict.eliminated(), ids(&[2, 4, 5]).as_slice());
    assert_eq!(verdict.survivors(), ids(&[1, 3]).as_slice());
    assert!(!engine.state().offers_stop());

    assert_eq!(engine.continue_game().expect("verdict applied"), Phase::Finished);
    let state = engine.state();
    assert_eq!(state.ending(), Some(Ending::GoalReached));
    assert_eq!(state.winners(), ids(&[1, 3]).as_slice());
    assert_eq!(state.round_number(), 1);
    // The roster itself is not touched when the target is hit.
    assert_eq!(state.active_participants().len(), 5);
}

#[test]
fn test_round_retry_example() {
    // Four of five miss, which would leave one survivor for a target of two.
    let mut engine = start(5, 2, EliminationMode::EliminateIncorrect);
    play_round(
        &mut engine,
        &[Some(true), Some(false), Some(false), None, Some(false)],
    );
    assert_eq!(
        engine.state().verdict().map(|v| v.survivors().len()),
        Some(1)
    );

    assert_eq!(engine.continue_game().expect("verdict applied"), Phase::Countdown);
    let state = engine.state();
    assert_eq!(state.round_number(), 1);
    assert_eq!(state.turn(), 0);
    assert!(state.round_results().is_empty());
    assert_eq!(state.used_questions().map(|u| u.len()), Some(0));
    assert!(state.roster().iter().all(|p| p.is_active()));
    assert!(matches!(
        state.history().last().map(|r| &r.outcome),
        Some(RoundOutcome::Retried { .. })
    ));
}

#[test]
fn test_correct_mode_retry_when_only_one_is_wrong() {
    // Under EliminateCorrect, everyone but participant 1 leaving undershoots the target.
    let mut engine = start(5, 2, EliminationMode::EliminateCorrect);
    play_round(
        &mut engine,
        &[Some(false), Some(true), Some(true), Some(true), Some(true)],
    );
    engine.continue_game().expect("verdict applied");
    assert_eq!(engine.phase(), Phase::Countdown);
    assert_eq!(engine.state().round_number(), 1);
    assert_eq!(engine.state().active_participants().len(), 5);
}

#[test]
fn test_round_advance_eliminates_and_refreezes_lineup() {
    let mut engine = start(6, 2, EliminationMode::EliminateIncorrect);
    play_round(
        &mut engine,
        &[Some(true), Some(false), Some(true), Some(true), None, Some(true)],
    );
    assert!(engine.state().offers_stop());

    engine.continue_game().expect("verdict applied");
    let state = engine.state();
    assert_eq!(state.phase(), Phase::Countdown);
    assert_eq!(state.round_number(), 2);
    assert_eq!(state.lineup(), ids(&[1, 3, 4, 6]).as_slice());

    let eliminated: Vec<ParticipantId> = state
        .roster()
        .iter()
        .filter(|p| !p.is_active())
        .map(|p| p.id())
        .collect();
    assert_eq!(eliminated, ids(&[2, 5]));
    assert!(
        state
            .roster()
            .iter()
            .filter(|p| !p.is_active())
            .all(|p| p.eliminated_in() == Some(1))
    );
    // Eliminated participants stay in the roster.
    assert_eq!(state.roster().len(), 6);
}

#[test]
fn test_second_round_uses_frozen_lineup() {
    let mut engine = start(4, 1, EliminationMode::EliminateIncorrect);
    play_round(&mut engine, &[Some(true), Some(false), Some(true), Some(true)]);
    engine.continue_game().expect("advance");

    engine.start_question().expect("question");
    assert_eq!(engine.state().current_participant(), Some(ParticipantId::from(1)));
    engine.answer_question(true).expect("answer");
    engine.advance_participant().expect("advance");
    engine.start_question().expect("question");
    // Participant 2 was eliminated, so the second turn belongs to #3.
    assert_eq!(engine.state().current_participant(), Some(ParticipantId::from(3)));
}

#[test]
fn test_timeout_and_wrong_answer_are_distinguished() {
    let mut engine = start(3, 1, EliminationMode::EliminateIncorrect);
    play_round(&mut engine, &[None, Some(false), Some(true)]);

    let results = engine.state().round_results();
    assert!(!results[0].was_answered());
    assert!(!results[0].is_correct());
    assert_eq!(results[0].answer(), None);
    assert!(results[1].was_answered());
    assert!(!results[1].is_correct());
    assert!(results[2].is_correct());

    let tally = engine.state().tally();
    assert_eq!((tally.correct, tally.incorrect, tally.timed_out), (1, 2, 1));
}

#[test]
fn test_second_answer_is_rejected() {
    let mut engine = start(3, 1, EliminationMode::EliminateIncorrect);
    engine.start_question().expect("question");
    engine.answer_question(false).expect("first answer");
    let before = engine.state().clone();

    let err = engine.answer_question(true).expect_err("second answer");
    assert_eq!(
        err,
        QuizError::InvalidTransition {
            operation: Operation::AnswerQuestion,
            phase: Phase::Answer,
        }
    );
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.state().selected_answer(), Some(false));
}

#[test]
fn test_late_time_up_cannot_override_answer() {
    let mut engine = start(3, 1, EliminationMode::EliminateIncorrect);
    engine.start_question().expect("question");
    engine.answer_question(true).expect("answer");
    assert!(engine.handle_time_up().is_err());
    assert_eq!(engine.state().selected_answer(), Some(true));
}

#[test]
fn test_transitions_outside_their_phase_are_rejected() {
    let mut engine = QuizEngine::seeded(5);
    assert!(engine.start_question().is_err());
    assert!(engine.handle_time_up().is_err());
    assert!(engine.advance_participant().is_err());
    assert!(engine.continue_game().is_err());
    assert!(engine.show_confirmation().is_err());
    assert!(engine.end_game().is_err());
    assert_eq!(engine.phase(), Phase::Setup);

    let mut engine = start(3, 1, EliminationMode::EliminateIncorrect);
    let settings = GameSettings::default();
    assert!(matches!(
        engine.start_game(settings, vec![Question::new("q", true)]),
        Err(QuizError::InvalidTransition {
            operation: Operation::StartGame,
            phase: Phase::Countdown
        })
    ));
}

#[test]
fn test_confirmation_then_stop_keeps_current_field() {
    let mut engine = start(6, 2, EliminationMode::EliminateIncorrect);
    play_round(
        &mut engine,
        &[Some(true), Some(false), Some(true), Some(true), Some(true), Some(true)],
    );
    engine.show_confirmation().expect("stop offered");
    assert_eq!(engine.phase(), Phase::Confirmation);

    engine.end_game().expect("stopped");
    let state = engine.state();
    assert_eq!(state.ending(), Some(Ending::Stopped));
    // No elimination is applied when stopping.
    assert_eq!(state.winners().len(), 6);
    assert_eq!(state.history().last().map(|r| &r.outcome), Some(&RoundOutcome::Stopped));
}

#[test]
fn test_confirmation_declined_continues() {
    let mut engine = start(6, 2, EliminationMode::EliminateIncorrect);
    play_round(
        &mut engine,
        &[Some(true), Some(false), Some(true), Some(true), Some(true), Some(true)],
    );
    engine.show_confirmation().expect("stop offered");
    engine.continue_game().expect("declined");
    assert_eq!(engine.phase(), Phase::Countdown);
    assert_eq!(engine.state().round_number(), 2);
    assert_eq!(engine.state().lineup().len(), 5);
}

#[test]
fn test_stop_not_offered_at_or_below_target() {
    let mut engine = start(3, 2, EliminationMode::EliminateIncorrect);
    play_round(&mut engine, &[Some(true), Some(true), Some(false)]);
    assert!(!engine.state().offers_stop());
    assert!(matches!(
        engine.show_confirmation(),
        Err(QuizError::InvalidTransition {
            operation: Operation::ShowConfirmation,
            phase: Phase::Result
        })
    ));
}

#[test]
fn test_reset_from_finished() {
    let mut engine = start(2, 1, EliminationMode::EliminateIncorrect);
    play_round(&mut engine, &[Some(true), Some(false)]);
    engine.continue_game().expect("goal");
    assert_eq!(engine.phase(), Phase::Finished);

    assert_eq!(engine.reset_game(), Phase::Setup);
    assert_eq!(engine.state(), &GameState::Setup);
    assert!(engine.state().history().is_empty());
}
