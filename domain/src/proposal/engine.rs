//! Phase engine: every transition rule of the proposal lifecycle
//!
//! All functions operate on a `&mut Proposal` and either fully apply or
//! return an error before touching it. Each returned [`PhaseTransition`] is
//! one notification-worthy event.

use super::entities::{PhaseTransition, Proposal};
use super::phase::ProposalPhase;
use crate::core::error::DomainError;
use crate::core::ids::{SolutionId, UserId};
use crate::core::stance::Stance;
use crate::ranking::{Ranking, RankingChange, RankingCounters};
use crate::vote::{RejectionReason, VoteOutcome, VoteSummary};
use chrono::{DateTime, Duration, Utc};

/// Result of a ranking write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingApplied {
    pub change: RankingChange,
    pub counters: RankingCounters,
    /// Transitions triggered by the write (debate opening, debate closing)
    pub transitions: Vec<PhaseTransition>,
}

/// Result of removing a ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRemoved {
    pub removed: Option<Ranking>,
    pub counters: RankingCounters,
    pub transitions: Vec<PhaseTransition>,
}

/// Proposal state machine
pub struct PhaseEngine;

impl PhaseEngine {
    /// Presentation -> InDebate, starting the debate window
    pub fn open_debate(
        proposal: &mut Proposal,
        now: DateTime<Utc>,
    ) -> Result<PhaseTransition, DomainError> {
        if proposal.phase != ProposalPhase::Presentation {
            return Err(invalid("open the debate", proposal));
        }
        let transition = proposal.transition(ProposalPhase::InDebate, now)?;
        proposal.debate_started_at = Some(now);
        proposal.debate_ends_at = Some(now + proposal.quorum.debate_duration());
        Ok(transition)
    }

    /// Record `user`'s ranking and re-evaluate the debate guard.
    ///
    /// The first ranking of a proposal in Presentation opens the debate.
    pub fn rank(
        proposal: &mut Proposal,
        user: UserId,
        stance: Stance,
        now: DateTime<Utc>,
    ) -> Result<RankingApplied, DomainError> {
        if !proposal.phase.accepts_rankings() {
            return Err(invalid("rank", proposal));
        }
        let target = proposal.ranking_target();
        let (change, counters) = proposal.rankings.upsert(user, stance, &target, now)?;

        let mut transitions = Vec::new();
        if proposal.phase == ProposalPhase::Presentation {
            transitions.push(Self::open_debate(proposal, now)?);
        }
        transitions.extend(Self::check(proposal, now, false)?);

        Ok(RankingApplied {
            change,
            counters,
            transitions,
        })
    }

    /// Withdraw `user`'s ranking during debate
    pub fn remove_ranking(
        proposal: &mut Proposal,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<RankingRemoved, DomainError> {
        if !proposal.phase.accepts_rankings() {
            return Err(invalid("withdraw a ranking", proposal));
        }
        let removed = proposal.rankings.remove(user);
        let counters = proposal.rankings.counters();
        let transitions = Self::check(proposal, now, false)?;
        Ok(RankingRemoved {
            removed,
            counters,
            transitions,
        })
    }

    /// Re-evaluate time and quorum guards.
    ///
    /// Idempotent: nothing happens before the debate or vote window ends.
    /// A finished debate goes to Waiting when its quorum holds and is
    /// abandoned otherwise. `force` treats the window as elapsed; it never
    /// bypasses a quorum.
    /// Waiting proposals are left alone: opening the vote needs the voter
    /// count (see [`PhaseEngine::start_votation`]).
    pub fn check(
        proposal: &mut Proposal,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, DomainError> {
        match proposal.phase {
            ProposalPhase::InDebate => {
                if !force && !Self::debate_elapsed(proposal, now) {
                    return Ok(Vec::new());
                }
                let counters = proposal.rankings.counters();
                if proposal
                    .quorum
                    .debate_satisfied(counters.ranking_count, counters.approval_score)
                {
                    return Ok(vec![proposal.transition(ProposalPhase::Waiting, now)?]);
                }
                let transition = proposal.transition(ProposalPhase::Rejected, now)?;
                proposal.outcome = Some(VoteOutcome::rejected(RejectionReason::DebateAbandoned));
                Ok(vec![transition])
            }
            ProposalPhase::Voting => {
                if force || Self::vote_elapsed(proposal, now) {
                    Self::close_vote_phase(proposal, now, true)
                } else {
                    Ok(Vec::new())
                }
            }
            ProposalPhase::Presentation
            | ProposalPhase::Waiting
            | ProposalPhase::Voted
            | ProposalPhase::Accepted
            | ProposalPhase::Rejected => Ok(Vec::new()),
        }
    }

    /// Whether a Waiting proposal's fixed vote window has opened
    pub fn is_vote_start_due(proposal: &Proposal, now: DateTime<Utc>) -> bool {
        proposal.phase == ProposalPhase::Waiting
            && proposal
                .vote_schedule()
                .starts_at()
                .is_some_and(|starts_at| now >= starts_at)
    }

    /// Waiting -> Voting, freezing the vote threshold against `eligible_voters`.
    ///
    /// Without `force`, a fixed schedule must have reached its start.
    pub fn start_votation(
        proposal: &mut Proposal,
        eligible_voters: i64,
        vote_duration: Duration,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<PhaseTransition, DomainError> {
        if proposal.phase != ProposalPhase::Waiting {
            return Err(invalid("start the vote", proposal));
        }
        if !force
            && let Some(starts_at) = proposal.vote_schedule().starts_at()
            && now < starts_at
        {
            return Err(DomainError::VoteWindowNotReached { boundary: "open" });
        }

        // Validate before mutating anything
        let mut quorum = proposal.quorum.clone();
        quorum.freeze_required_votes(eligible_voters)?;

        let window = proposal.vote_schedule().window_from(now, vote_duration);
        let transition = proposal.transition(ProposalPhase::Voting, now)?;
        proposal.quorum = quorum;
        proposal.vote_window = Some(window);
        Ok(transition)
    }

    /// Record a plurality ballot.
    ///
    /// Ballots arriving after the vote window has ended are refused even
    /// while the proposal still waits for its closing check.
    pub fn cast_vote(
        proposal: &mut Proposal,
        user: UserId,
        stance: Stance,
        now: DateTime<Utc>,
    ) -> Result<VoteSummary, DomainError> {
        Self::ensure_vote_open(proposal, now)?;
        if proposal.is_ranked_choice() {
            return Err(DomainError::BallotMismatch {
                solutions: proposal.solutions.len(),
            });
        }
        Ok(proposal.plurality.cast(user, stance))
    }

    /// Record a ranked ballot; returns `true` when it replaced an earlier one
    pub fn cast_ballot(
        proposal: &mut Proposal,
        user: UserId,
        ranking: Vec<SolutionId>,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Self::ensure_vote_open(proposal, now)?;
        if !proposal.is_ranked_choice() {
            return Err(DomainError::BallotMismatch {
                solutions: proposal.solutions.len(),
            });
        }
        let solutions = proposal.solution_ids();
        proposal.schulze.cast(user, ranking, &solutions, now)
    }

    /// Voting -> Voted -> Accepted | Rejected
    ///
    /// Without `force`, the vote window must have ended.
    pub fn close_vote_phase(
        proposal: &mut Proposal,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, DomainError> {
        if proposal.phase != ProposalPhase::Voting {
            return Err(invalid("close the vote", proposal));
        }
        if !force && !Self::vote_elapsed(proposal, now) {
            return Err(DomainError::VoteWindowNotReached { boundary: "close" });
        }

        let voted = proposal.transition(ProposalPhase::Voted, now)?;
        let outcome = Self::resolve(proposal);
        let final_phase = if outcome.is_accepted() {
            ProposalPhase::Accepted
        } else {
            ProposalPhase::Rejected
        };
        let resolved = proposal.transition(final_phase, now)?;
        proposal.outcome = Some(outcome);
        Ok(vec![voted, resolved])
    }

    fn resolve(proposal: &mut Proposal) -> VoteOutcome {
        if !proposal.is_ranked_choice() {
            return proposal.plurality.summary().resolve(&proposal.quorum);
        }
        let solutions = proposal.solution_ids();
        let result = proposal.schulze.resolve(&solutions, &proposal.quorum);
        for solution in proposal.solutions.iter_mut() {
            solution.schulze_score = result.score_of(solution.id).unwrap_or(0);
        }
        proposal.schulze_votes = result.pairwise;
        result.outcome
    }

    fn ensure_vote_open(proposal: &Proposal, now: DateTime<Utc>) -> Result<(), DomainError> {
        if proposal.phase != ProposalPhase::Voting {
            return Err(invalid("vote", proposal));
        }
        if Self::vote_elapsed(proposal, now) {
            return Err(DomainError::VoteWindowClosed);
        }
        Ok(())
    }

    fn debate_elapsed(proposal: &Proposal, now: DateTime<Utc>) -> bool {
        proposal.debate_ends_at.is_some_and(|ends_at| now >= ends_at)
    }

    fn vote_elapsed(proposal: &Proposal, now: DateTime<Utc>) -> bool {
        proposal
            .vote_window
            .is_some_and(|window| window.has_ended(now))
    }
}

fn invalid(operation: &'static str, proposal: &Proposal) -> DomainError {
    DomainError::InvalidPhaseTransition {
        operation,
        phase: proposal.phase,
    }
}
