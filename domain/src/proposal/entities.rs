//! Proposal aggregate

use super::phase::ProposalPhase;
use super::schedule::{VoteSchedule, VoteWindow};
use crate::core::error::DomainError;
use crate::core::ids::{GroupId, ProposalId, SolutionId, UserId};
use crate::core::stance::Stance;
use crate::quorum::Quorum;
use crate::ranking::{RankTarget, Ranking, RankingCounters, RankingLedger};
use crate::vote::{PairwiseCount, PluralityTally, SchulzeTally, VoteOutcome, VoteSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One competing resolution of a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    /// 1-based display and tie-break order
    pub sequence: u32,
    pub title: String,
    /// Number of solutions this one beats pairwise (ranked-choice only)
    pub schulze_score: u32,
}

/// A recorded phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub proposal: ProposalId,
    pub from: ProposalPhase,
    pub to: ProposalPhase,
    pub at: DateTime<Utc>,
}

/// Public view of the tally
///
/// Secret votes expose totals only; open votes also list who voted what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyView {
    pub secret: bool,
    pub summary: VoteSummary,
    pub ranked_ballots: u32,
    pub ballots: Option<Vec<(UserId, Stance)>>,
    pub rankings: Option<Vec<(UserId, Vec<SolutionId>)>>,
    pub scores: Vec<(SolutionId, u32)>,
}

/// Proposal aggregate (Entity)
///
/// Owns its quorum, rankings, tallies and phase. State changes go through
/// [`PhaseEngine`](super::engine::PhaseEngine); this type exposes read
/// access and the few edits that do not involve a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    id: ProposalId,
    group: GroupId,
    title: String,
    pub(crate) phase: ProposalPhase,
    pub(crate) quorum: Quorum,
    pub(crate) rankings: RankingLedger,
    pub(crate) solutions: Vec<Solution>,
    secret_vote: bool,
    vote_schedule: VoteSchedule,
    pub(crate) debate_started_at: Option<DateTime<Utc>>,
    pub(crate) debate_ends_at: Option<DateTime<Utc>>,
    pub(crate) vote_window: Option<VoteWindow>,
    pub(crate) plurality: PluralityTally,
    pub(crate) schulze: SchulzeTally,
    pub(crate) schulze_votes: Vec<PairwiseCount>,
    pub(crate) outcome: Option<VoteOutcome>,
    pub(crate) history: Vec<PhaseTransition>,
    created_at: DateTime<Utc>,
    content_updated_at: DateTime<Utc>,
    last_contribution_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Create a proposal in Presentation with an already assigned quorum.
    ///
    /// `solutions` are numbered 1.. in the given order; a single solution
    /// makes it a plurality vote, several make it ranked-choice.
    pub fn new(
        id: ProposalId,
        group: GroupId,
        title: impl Into<String>,
        quorum: Quorum,
        solutions: Vec<(SolutionId, String)>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if solutions.is_empty() {
            return Err(DomainError::NoSolutions);
        }
        let mut seen = HashSet::new();
        let mut numbered = Vec::with_capacity(solutions.len());
        for (index, (solution_id, title)) in solutions.into_iter().enumerate() {
            if !seen.insert(solution_id) {
                return Err(DomainError::DuplicateSolution(solution_id));
            }
            numbered.push(Solution {
                id: solution_id,
                sequence: index as u32 + 1,
                title,
                schulze_score: 0,
            });
        }

        Ok(Self {
            id,
            group,
            title: title.into(),
            phase: ProposalPhase::Presentation,
            quorum,
            rankings: RankingLedger::new(),
            solutions: numbered,
            secret_vote: false,
            vote_schedule: VoteSchedule::Deferred,
            debate_started_at: None,
            debate_ends_at: None,
            vote_window: None,
            plurality: PluralityTally::new(),
            schulze: SchulzeTally::new(),
            schulze_votes: Vec::new(),
            outcome: None,
            history: Vec::new(),
            created_at: now,
            content_updated_at: now,
            last_contribution_at: None,
        })
    }

    pub fn with_secret_vote(mut self, secret: bool) -> Self {
        self.secret_vote = secret;
        self
    }

    pub fn with_vote_schedule(mut self, schedule: VoteSchedule) -> Self {
        self.vote_schedule = schedule;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phase(&self) -> ProposalPhase {
        self.phase
    }

    pub fn quorum(&self) -> &Quorum {
        &self.quorum
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn solution_ids(&self) -> Vec<SolutionId> {
        self.solutions.iter().map(|s| s.id).collect()
    }

    /// Ranked-choice when more than one solution competes
    pub fn is_ranked_choice(&self) -> bool {
        self.solutions.len() > 1
    }

    pub fn secret_vote(&self) -> bool {
        self.secret_vote
    }

    pub fn vote_schedule(&self) -> &VoteSchedule {
        &self.vote_schedule
    }

    pub fn debate_started_at(&self) -> Option<DateTime<Utc>> {
        self.debate_started_at
    }

    pub fn debate_ends_at(&self) -> Option<DateTime<Utc>> {
        self.debate_ends_at
    }

    pub fn vote_window(&self) -> Option<&VoteWindow> {
        self.vote_window.as_ref()
    }

    pub fn ranking_counters(&self) -> RankingCounters {
        self.rankings.counters()
    }

    pub fn ranking_count(&self) -> u32 {
        self.rankings.counters().ranking_count
    }

    pub fn approval_score(&self) -> u8 {
        self.rankings.counters().approval_score
    }

    pub fn rankings(&self) -> &RankingLedger {
        &self.rankings
    }

    pub fn has_ranked(&self, user: UserId) -> bool {
        self.rankings.contains(user)
    }

    pub fn ranking_of(&self, user: UserId) -> Option<&Ranking> {
        self.rankings.get(user)
    }

    pub fn vote_summary(&self) -> VoteSummary {
        self.plurality.summary()
    }

    pub fn schulze_ballots(&self) -> &SchulzeTally {
        &self.schulze
    }

    /// Pairwise counts built when a ranked-choice vote closed
    pub fn schulze_votes(&self) -> &[PairwiseCount] {
        &self.schulze_votes
    }

    /// Number of distinct members who voted, whatever the method
    pub fn votes_cast(&self) -> u32 {
        if self.is_ranked_choice() {
            self.schulze.len() as u32
        } else {
            self.plurality.summary().total()
        }
    }

    pub fn has_voted(&self, user: UserId) -> bool {
        self.plurality.ballot_of(user).is_some() || self.schulze.ballot_of(user).is_some()
    }

    pub fn outcome(&self) -> Option<&VoteOutcome> {
        self.outcome.as_ref()
    }

    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }

    /// Whether the proposal went through a vote
    pub fn is_voted(&self) -> bool {
        self.phase == ProposalPhase::Voted
            || self.history.iter().any(|t| t.to == ProposalPhase::Voted)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ==================== Content activity ====================

    /// The content changed (a new revision was published)
    pub fn record_revision(&mut self, now: DateTime<Utc>) {
        self.content_updated_at = now;
    }

    /// Someone contributed to the discussion
    pub fn record_contribution(&mut self, now: DateTime<Utc>) {
        self.last_contribution_at = Some(now);
    }

    /// Activity snapshot used by the re-ranking rule
    pub fn ranking_target(&self) -> RankTarget {
        RankTarget {
            updated_at: self.content_updated_at,
            last_reply_at: self.last_contribution_at,
        }
    }

    /// Add a competing solution while the proposal is still debated
    pub fn add_solution(
        &mut self,
        id: SolutionId,
        title: impl Into<String>,
    ) -> Result<&Solution, DomainError> {
        if !self.phase.accepts_rankings() {
            return Err(DomainError::SolutionsLocked(self.phase));
        }
        if self.solutions.iter().any(|s| s.id == id) {
            return Err(DomainError::DuplicateSolution(id));
        }
        let sequence = self.solutions.len() as u32 + 1;
        self.solutions.push(Solution {
            id,
            sequence,
            title: title.into(),
            schulze_score: 0,
        });
        Ok(&self.solutions[self.solutions.len() - 1])
    }

    /// Tally as shown to members, honouring `secret_vote`
    pub fn tally_view(&self) -> TallyView {
        let open = !self.secret_vote;
        TallyView {
            secret: self.secret_vote,
            summary: self.plurality.summary(),
            ranked_ballots: self.schulze.len() as u32,
            ballots: open.then(|| self.plurality.ballots().collect()),
            rankings: open.then(|| {
                self.schulze
                    .ballots()
                    .map(|b| (b.user, b.ranking.clone()))
                    .collect()
            }),
            scores: self
                .solutions
                .iter()
                .map(|s| (s.id, s.schulze_score))
                .collect(),
        }
    }

    // ==================== Transition plumbing ====================

    /// Move to `to`, recording the transition.
    pub(crate) fn transition(
        &mut self,
        to: ProposalPhase,
        at: DateTime<Utc>,
    ) -> Result<PhaseTransition, DomainError> {
        if !self.phase.can_transition_to(to) {
            return Err(DomainError::InvalidPhaseTransition {
                operation: "change phase",
                phase: self.phase,
            });
        }
        let transition = PhaseTransition {
            proposal: self.id,
            from: self.phase,
            to,
            at,
        };
        self.phase = to;
        self.history.push(transition);
        Ok(transition)
    }
}
