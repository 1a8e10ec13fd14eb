//! Core domain types for the O/X quiz.

use derive_more::{Display, From};
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// A true/false question from the question pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// Question text shown to the participant.
    text: String,
    /// `true` when the correct response is O, `false` for X.
    answer: bool,
}

impl Question {
    /// Creates a new question.
    pub fn new(text: impl Into<String>, answer: bool) -> Self {
        Self {
            text: text.into(),
            answer,
        }
    }

    /// Returns the question text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the correct answer.
    pub fn answer(&self) -> bool {
        self.answer
    }
}

/// Stable 1-based participant number.
///
/// Assigned once at game start. Never reused or renumbered after elimination.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct ParticipantId(u32);

impl ParticipantId {
    /// Returns the raw participant number.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A numbered participant.
///
/// Participants stay in the roster after elimination so the full field
/// can still be shown at the end of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Participant {
    id: ParticipantId,
    #[new(value = "true")]
    active: bool,
    #[new(default)]
    eliminated_in: Option<u32>,
}

impl Participant {
    /// Returns the participant id.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Returns whether the participant is still in the game.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Round in which the participant was eliminated, if any.
    pub fn eliminated_in(&self) -> Option<u32> {
        self.eliminated_in
    }

    pub(crate) fn eliminate(&mut self, round: u32) {
        self.active = false;
        self.eliminated_in = Some(round);
    }
}

/// One participant's outcome for a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    participant_id: ParticipantId,
    answer: Option<bool>,
    correct: bool,
    was_answered: bool,
}

impl RoundResult {
    /// Scores a turn against the question's answer.
    ///
    /// A missing answer (time up) is never correct.
    pub fn score(participant_id: ParticipantId, answer: Option<bool>, question: &Question) -> Self {
        Self {
            participant_id,
            answer,
            correct: answer == Some(question.answer()),
            was_answered: answer.is_some(),
        }
    }

    /// Returns the participant this result belongs to.
    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }

    /// Returns the submitted answer, `None` when the turn timed out.
    pub fn answer(&self) -> Option<bool> {
        self.answer
    }

    /// Returns whether the submitted answer was correct.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Returns whether an answer was submitted before the time ran out.
    pub fn was_answered(&self) -> bool {
        self.was_answered
    }
}

/// Which group of respondents leaves the game after a round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum EliminationMode {
    /// Participants who answered correctly are eliminated.
    #[serde(rename = "correct")]
    #[strum(serialize = "correct")]
    EliminateCorrect,
    /// Participants who answered incorrectly (or not at all) are eliminated.
    #[default]
    #[serde(rename = "incorrect")]
    #[strum(serialize = "incorrect")]
    EliminateIncorrect,
}

impl EliminationMode {
    /// Returns whether a result with the given correctness is eliminated.
    pub fn eliminates(self, correct: bool) -> bool {
        match self {
            Self::EliminateCorrect => correct,
            Self::EliminateIncorrect => !correct,
        }
    }

    /// Returns the human-readable label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::EliminateCorrect => "Correct answers are eliminated",
            Self::EliminateIncorrect => "Incorrect answers are eliminated",
        }
    }

    /// Toggles between the two modes.
    pub fn toggle(self) -> Self {
        match self {
            Self::EliminateCorrect => Self::EliminateIncorrect,
            Self::EliminateIncorrect => Self::EliminateCorrect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_timeout_is_scored_incorrect_and_unanswered() {
        let question = Question::new("2+2=4?", true);
        let result = RoundResult::score(ParticipantId::from(3), None, &question);
        assert!(!result.is_correct());
        assert!(!result.was_answered());
        assert_eq!(result.answer(), None);
    }

    #[test]
    fn test_wrong_answer_is_answered_but_incorrect() {
        let question = Question::new("2+2=4?", true);
        let result = RoundResult::score(ParticipantId::from(3), Some(false), &question);
        assert!(!result.is_correct());
        assert!(result.was_answered());
    }

    #[test]
    fn test_new_participant_is_active() {
        let participant = Participant::new(ParticipantId::from(1));
        assert!(participant.is_active());
        assert_eq!(participant.eliminated_in(), None);
    }

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!(
            EliminationMode::from_str("Correct").ok(),
            Some(EliminationMode::EliminateCorrect)
        );
        assert_eq!(
            EliminationMode::from_str("incorrect").ok(),
            Some(EliminationMode::EliminateIncorrect)
        );
        assert_eq!(EliminationMode::EliminateCorrect.to_string(), "correct");
    }

    #[test]
    fn test_mode_eliminates() {
        assert!(EliminationMode::EliminateCorrect.eliminates(true));
        assert!(!EliminationMode::EliminateCorrect.eliminates(false));
        assert!(EliminationMode::EliminateIncorrect.eliminates(false));
    }

    #[test]
    fn test_participant_id_display() {
        assert_eq!(ParticipantId::from(7).to_string(), "#7");
    }
}
