//! Round verdicts: who would leave, who would stay, and what happens next.

use crate::types::{EliminationMode, ParticipantId, RoundResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Correct/incorrect counts for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Results with a correct answer.
    pub correct: usize,
    /// Results with a wrong answer or no answer.
    pub incorrect: usize,
    /// Subset of `incorrect` where the time ran out.
    pub timed_out: usize,
}

impl Tally {
    /// Counts the given results.
    pub fn from_results(results: &[RoundResult]) -> Self {
        results.iter().fold(Self::default(), |mut tally, r| {
            if r.is_correct() {
                tally.correct += 1;
            } else {
                tally.incorrect += 1;
                if !r.was_answered() {
                    tally.timed_out += 1;
                }
            }
            tally
        })
    }
}

/// What the engine does with a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Survivors equal the target: the game ends.
    GoalReached,
    /// Too many would be cut: the round is replayed with nobody eliminated.
    Retry,
    /// Eliminate and move on to the next round.
    Advance,
}

/// Eliminated and surviving ids for a round under an elimination mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    eliminated: Vec<ParticipantId>,
    survivors: Vec<ParticipantId>,
}

impl Verdict {
    /// Partitions the round results and filters the active field.
    ///
    /// Unanswered turns count as incorrect.
    #[instrument(skip(active, results), fields(results = results.len()))]
    pub fn compute(
        mode: EliminationMode,
        active: impl IntoIterator<Item = ParticipantId>,
        results: &[RoundResult],
    ) -> Self {
        let eliminated: Vec<ParticipantId> = results
            .iter()
            .filter(|r| mode.eliminates(r.is_correct()))
            .map(RoundResult::participant_id)
            .collect();
        let cut: BTreeSet<ParticipantId> = eliminated.iter().copied().collect();
        let survivors: Vec<ParticipantId> =
            active.into_iter().filter(|id| !cut.contains(id)).collect();

        debug!(
            eliminated = eliminated.len(),
            survivors = survivors.len(),
            "Verdict computed"
        );
        Self {
            eliminated,
            survivors,
        }
    }

    /// Ids the mode removes this round.
    pub fn eliminated(&self) -> &[ParticipantId] {
        &self.eliminated
    }

    /// Active ids that remain after the cut.
    pub fn survivors(&self) -> &[ParticipantId] {
        &self.survivors
    }

    /// Compares the survivor count with the target.
    pub fn decide(&self, final_participants: u32) -> Decision {
        let target = final_participants as usize;
        match self.survivors.len().cmp(&target) {
            std::cmp::Ordering::Equal => Decision::GoalReached,
            std::cmp::Ordering::Less => Decision::Retry,
            std::cmp::Ordering::Greater => Decision::Advance,
        }
    }

    /// Whether the host may be offered to stop the game now.
    pub fn offers_stop(&self, final_participants: u32) -> bool {
        self.survivors.len() > final_participants as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Question;

    fn results(question: &Question, answers: &[(u32, Option<bool>)]) -> Vec<RoundResult> {
        answers
            .iter()
            .map(|&(id, answer)| RoundResult::score(ParticipantId::from(id), answer, question))
            .collect()
    }

    fn ids(raw: &[u32]) -> Vec<ParticipantId> {
        raw.iter().copied().map(ParticipantId::from).collect()
    }

    #[test]
    fn test_incorrect_mode_cuts_wrong_and_timed_out() {
        let q = Question::new("2+2=4?", true);
        let r = results(
            &q,
            &[
                (1, Some(true)),
                (2, Some(false)),
                (3, Some(true)),
                (4, None),
                (5, Some(false)),
            ],
        );
        let verdict =
            Verdict::compute(EliminationMode::EliminateIncorrect, ids(&[1, 2, 3, 4, 5]), &r);
        assert_eq!(verdict.eliminated(), ids(&[2, 4, 5]).as_slice());
        assert_eq!(verdict.survivors(), ids(&[1, 3]).as_slice());
        assert_eq!(verdict.decide(2), Decision::GoalReached);
        assert!(!verdict.offers_stop(2));
    }

    #[test]
    fn test_correct_mode_cuts_right_answers() {
        let q = Question::new("Sky is green?", false);
        let r = results(&q, &[(1, Some(false)), (2, Some(true)), (3, None)]);
        let verdict = Verdict::compute(EliminationMode::EliminateCorrect, ids(&[1, 2, 3]), &r);
        assert_eq!(verdict.eliminated(), ids(&[1]).as_slice());
        assert_eq!(verdict.survivors(), ids(&[2, 3]).as_slice());
        assert_eq!(verdict.decide(1), Decision::Advance);
        assert!(verdict.offers_stop(1));
    }

    #[test]
    fn test_overshoot_retries() {
        let q = Question::new("2+2=4?", true);
        let r = results(&q, &[(1, Some(true)), (2, Some(false)), (3, Some(false))]);
        let verdict = Verdict::compute(EliminationMode::EliminateIncorrect, ids(&[1, 2, 3]), &r);
        assert_eq!(verdict.decide(2), Decision::Retry);
    }

    #[test]
    fn test_tally_counts_timeouts_as_incorrect() {
        let q = Question::new("2+2=4?", true);
        let r = results(&q, &[(1, Some(true)), (2, None), (3, Some(false))]);
        let tally = Tally::from_results(&r);
        assert_eq!(
            tally,
            Tally {
                correct: 1,
                incorrect: 2,
                timed_out: 1
            }
        );
    }
}
