//! Session data shared by every in-game phase.

use crate::elimination::Verdict;
use crate::settings::GameSettings;
use crate::types::{Participant, ParticipantId, Question, RoundResult};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Round-scoped data.
///
/// The lineup is frozen when the round starts, so turn indices keep
/// pointing at the same participants for the whole round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    number: u32,
    lineup: Vec<ParticipantId>,
    results: Vec<RoundResult>,
    used_questions: BTreeSet<usize>,
}

impl Round {
    pub(crate) fn begin(number: u32, lineup: Vec<ParticipantId>) -> Self {
        Self {
            number,
            lineup,
            results: Vec::new(),
            used_questions: BTreeSet::new(),
        }
    }

    /// Same round number and lineup, everything else cleared.
    pub(crate) fn restart(&self) -> Self {
        Self::begin(self.number, self.lineup.clone())
    }

    /// 1-based round number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Participants taking a turn this round, in turn order.
    pub fn lineup(&self) -> &[ParticipantId] {
        &self.lineup
    }

    /// Results recorded so far this round.
    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Pool indices already presented this round.
    pub fn used_questions(&self) -> &BTreeSet<usize> {
        &self.used_questions
    }

    pub(crate) fn record(&mut self, result: RoundResult) {
        self.results.push(result);
    }

    pub(crate) fn mark_used(&mut self, index: usize, exhausted: bool) {
        if exhausted {
            self.used_questions.clear();
        }
        self.used_questions.insert(index);
    }
}

/// What a round decision did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The listed participants were eliminated and the next round began.
    Advanced {
        /// Participants removed.
        eliminated: Vec<ParticipantId>,
    },
    /// The cut would have undershot the target, so the round was replayed.
    Retried {
        /// Participants the discarded cut would have removed.
        would_eliminate: Vec<ParticipantId>,
    },
    /// The survivor count hit the target.
    GoalReached {
        /// Participants outside the winning group.
        eliminated: Vec<ParticipantId>,
    },
    /// The host stopped the game.
    Stopped,
}

/// History entry for one round decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RoundRecord {
    /// Round the decision was made in.
    pub round: u32,
    /// What happened.
    pub outcome: RoundOutcome,
}

/// Everything a running game carries between phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) settings: GameSettings,
    pub(crate) pool: Arc<[Question]>,
    pub(crate) roster: Vec<Participant>,
    pub(crate) round: Round,
    pub(crate) history: Vec<RoundRecord>,
}

impl Session {
    /// Fresh session with participants `1..=total`, all active, in round 1.
    pub(crate) fn begin(settings: GameSettings, pool: Arc<[Question]>) -> Self {
        let roster: Vec<Participant> = (1..=settings.total_participants())
            .map(|n| Participant::new(ParticipantId::from(n)))
            .collect();
        let lineup = roster.iter().map(Participant::id).collect();
        Self {
            settings,
            pool,
            roster,
            round: Round::begin(1, lineup),
            history: Vec::new(),
        }
    }

    /// Session settings.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The loaded question pool.
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    /// Every participant, active or not, in id order.
    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    /// Current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Decisions made so far.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Ids of participants still in the game.
    pub fn active_ids(&self) -> Vec<ParticipantId> {
        self.roster
            .iter()
            .filter(|p| p.is_active())
            .map(Participant::id)
            .collect()
    }

    /// Verdict of the current round results under the session's mode.
    pub fn verdict(&self) -> Verdict {
        Verdict::compute(
            self.settings.elimination_mode(),
            self.active_ids(),
            self.round.results(),
        )
    }

    pub(crate) fn eliminate(&mut self, ids: &[ParticipantId]) {
        let round = self.round.number;
        for participant in self
            .roster
            .iter_mut()
            .filter(|p| p.is_active() && ids.contains(&p.id()))
        {
            participant.eliminate(round);
        }
    }
}
