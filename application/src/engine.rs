//! Deliberation engine facade
//!
//! One entry point over the use cases, for callers that do not want to wire
//! them one by one. Cloning is cheap; clones share the same context and
//! therefore the same proposal locks.

use crate::error::EngineError;
use crate::use_cases::cast_vote::CastVoteUseCase;
use crate::use_cases::check_phase::CheckPhaseUseCase;
use crate::use_cases::create_proposal::{CreateProposalInput, CreateProposalUseCase};
use crate::use_cases::rank_proposal::RankProposalUseCase;
use crate::use_cases::shared::EngineContext;
use crate::use_cases::sweep::{SweepReport, SweepUseCase};
use crate::use_cases::vote_period::VotePeriodUseCase;
use agora_domain::{
    PhaseTransition, Proposal, ProposalId, RankingApplied, RankingRemoved, Solution, SolutionId,
    Stance, TallyView, UserId, VoteSummary,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeliberationEngine {
    ctx: Arc<EngineContext>,
    create: CreateProposalUseCase,
    rank: RankProposalUseCase,
    check: CheckPhaseUseCase,
    vote_period: VotePeriodUseCase,
    cast: CastVoteUseCase,
    sweep: SweepUseCase,
}

impl DeliberationEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self::from_shared(Arc::new(ctx))
    }

    /// Build over a context already shared with other callers
    pub fn from_shared(ctx: Arc<EngineContext>) -> Self {
        Self {
            create: CreateProposalUseCase::new(ctx.clone()),
            rank: RankProposalUseCase::new(ctx.clone()),
            check: CheckPhaseUseCase::new(ctx.clone()),
            vote_period: VotePeriodUseCase::new(ctx.clone()),
            cast: CastVoteUseCase::new(ctx.clone()),
            sweep: SweepUseCase::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ==================== Proposals ====================

    pub async fn create_proposal(
        &self,
        input: CreateProposalInput,
    ) -> Result<Proposal, EngineError> {
        self.create.execute(input).await
    }

    pub async fn proposal(&self, id: ProposalId) -> Result<Proposal, EngineError> {
        Ok(self.ctx.repository.load(id).await?)
    }

    pub async fn add_solution(
        &self,
        id: ProposalId,
        title: impl Into<String>,
    ) -> Result<Solution, EngineError> {
        self.rank.add_solution(id, title).await
    }

    pub async fn record_revision(&self, id: ProposalId) -> Result<(), EngineError> {
        self.rank.record_revision(id).await
    }

    pub async fn record_contribution(&self, id: ProposalId) -> Result<(), EngineError> {
        self.rank.record_contribution(id).await
    }

    // ==================== Debate ====================

    pub async fn rank(
        &self,
        id: ProposalId,
        user: UserId,
        stance: Stance,
    ) -> Result<RankingApplied, EngineError> {
        self.rank.rank(id, user, stance).await
    }

    pub async fn withdraw_ranking(
        &self,
        id: ProposalId,
        user: UserId,
    ) -> Result<RankingRemoved, EngineError> {
        self.rank.withdraw(id, user).await
    }

    pub async fn open_debate(&self, id: ProposalId) -> Result<PhaseTransition, EngineError> {
        self.check.open_debate(id).await
    }

    pub async fn check(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, EngineError> {
        self.check.execute(id, force).await
    }

    // ==================== Vote ====================

    pub async fn start_votation(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<PhaseTransition, EngineError> {
        self.vote_period.start_votation(id, force).await
    }

    pub async fn cast_vote(
        &self,
        id: ProposalId,
        user: UserId,
        stance: Stance,
    ) -> Result<VoteSummary, EngineError> {
        self.cast.cast_vote(id, user, stance).await
    }

    pub async fn cast_ballot(
        &self,
        id: ProposalId,
        user: UserId,
        ranking: Vec<SolutionId>,
    ) -> Result<bool, EngineError> {
        self.cast.cast_ballot(id, user, ranking).await
    }

    pub async fn close_vote_phase(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, EngineError> {
        self.vote_period.close_vote_phase(id, force).await
    }

    pub async fn end_votation(&self, id: ProposalId) -> Result<Vec<PhaseTransition>, EngineError> {
        self.vote_period.end_votation(id).await
    }

    // ==================== Queries ====================

    pub async fn has_ranked(&self, id: ProposalId, user: UserId) -> Result<bool, EngineError> {
        Ok(self.proposal(id).await?.has_ranked(user))
    }

    pub async fn tally(&self, id: ProposalId) -> Result<TallyView, EngineError> {
        Ok(self.proposal(id).await?.tally_view())
    }

    pub async fn sweep(&self) -> Result<SweepReport, EngineError> {
        self.sweep.execute().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::notifier::NotificationEvent;
    use crate::test_support::{Harness, harness};
    use agora_domain::{DomainError, GroupId, ProposalPhase, RejectionReason, VoteOutcome};

    fn engine(h: &Harness) -> DeliberationEngine {
        DeliberationEngine::from_shared(h.ctx.clone())
    }

    /// Create a proposal and carry it through debate into an open vote
    async fn open_vote(engine: &DeliberationEngine, solutions: &[&str]) -> ProposalId {
        let id = engine
            .create_proposal(
                CreateProposalInput::new(GroupId::new(1), "Community garden")
                    .with_solutions(solutions.iter().copied()),
            )
            .await
            .unwrap()
            .id();
        for user in 1..=10 {
            engine
                .rank(id, UserId::new(user), Stance::Positive)
                .await
                .unwrap();
        }
        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.phase(), ProposalPhase::InDebate);
        assert_eq!(proposal.ranking_count(), 10);
        assert_eq!(proposal.approval_score(), 100);

        engine.check(id, true).await.unwrap();
        assert_eq!(engine.proposal(id).await.unwrap().phase(), ProposalPhase::Waiting);
        engine.start_votation(id, false).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_plurality_vote_accepted() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &[]).await;
        assert_eq!(
            engine.proposal(id).await.unwrap().quorum().required_votes(),
            Some(3)
        );

        for user in 1..=3 {
            engine
                .cast_vote(id, UserId::new(user), Stance::Positive)
                .await
                .unwrap();
        }
        engine
            .cast_vote(id, UserId::new(4), Stance::Negative)
            .await
            .unwrap();

        let transitions = engine.close_vote_phase(id, true).await.unwrap();

        assert_eq!(transitions.len(), 2);
        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.phase(), ProposalPhase::Accepted);
        assert!(proposal.is_voted());
        assert_eq!(proposal.outcome(), Some(&VoteOutcome::accepted(None)));
        assert_eq!(
            h.notifier.phases(),
            vec![
                (ProposalPhase::Presentation, ProposalPhase::InDebate),
                (ProposalPhase::InDebate, ProposalPhase::Waiting),
                (ProposalPhase::Waiting, ProposalPhase::Voting),
                (ProposalPhase::Voting, ProposalPhase::Voted),
                (ProposalPhase::Voted, ProposalPhase::Accepted),
            ]
        );
    }

    #[tokio::test]
    async fn test_plurality_vote_not_approved() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &[]).await;

        engine
            .cast_vote(id, UserId::new(1), Stance::Positive)
            .await
            .unwrap();
        for user in 2..=4 {
            engine
                .cast_vote(id, UserId::new(user), Stance::Negative)
                .await
                .unwrap();
        }
        engine.end_votation(id).await.unwrap();

        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.phase(), ProposalPhase::Rejected);
        assert_eq!(
            proposal.outcome().and_then(VoteOutcome::rejection_reason),
            Some(RejectionReason::NotApproved)
        );
    }

    #[tokio::test]
    async fn test_revote_replaces_earlier_vote() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &[]).await;
        let user = UserId::new(1);

        engine.cast_vote(id, user, Stance::Negative).await.unwrap();
        let summary = engine.cast_vote(id, user, Stance::Positive).await.unwrap();

        assert_eq!(summary.total(), 1);
        assert_eq!(summary.positive, 1);
        assert_eq!(summary.negative, 0);
    }

    #[tokio::test]
    async fn test_schulze_vote_picks_preferred_solution() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &["Roses", "Vegetables"]).await;
        let ids = engine.proposal(id).await.unwrap().solution_ids();
        let (roses, vegetables) = (ids[0], ids[1]);

        for user in 1..=4 {
            engine
                .cast_ballot(id, UserId::new(user), vec![vegetables, roses])
                .await
                .unwrap();
        }
        engine.close_vote_phase(id, true).await.unwrap();

        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.phase(), ProposalPhase::Accepted);
        assert_eq!(proposal.outcome().and_then(VoteOutcome::winner), Some(vegetables));
        assert_eq!(proposal.solutions()[0].schulze_score, 0);
        assert_eq!(proposal.solutions()[1].schulze_score, 1);
        assert!(!proposal.schulze_votes().is_empty());
    }

    #[tokio::test]
    async fn test_schulze_without_ballots_is_rejected() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &["Roses", "Vegetables"]).await;

        engine.close_vote_phase(id, true).await.unwrap();

        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.phase(), ProposalPhase::Rejected);
        assert_eq!(
            proposal.outcome().and_then(VoteOutcome::rejection_reason),
            Some(RejectionReason::NoBallots)
        );
    }

    #[tokio::test]
    async fn test_ballot_kind_must_match_solution_count() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &["Roses", "Vegetables"]).await;

        let err = engine
            .cast_vote(id, UserId::new(1), Stance::Positive)
            .await
            .unwrap_err();

        assert_eq!(
            err.domain(),
            Some(&DomainError::BallotMismatch { solutions: 2 })
        );
    }

    #[tokio::test]
    async fn test_denied_voter_is_refused() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &[]).await;
        h.permissions.denied.lock().unwrap().insert(UserId::new(7));

        let err = engine
            .cast_vote(id, UserId::new(7), Stance::Positive)
            .await
            .unwrap_err();

        assert!(err.domain().is_some_and(DomainError::is_unauthorized));
        assert_eq!(engine.tally(id).await.unwrap().summary.total(), 0);
    }

    #[tokio::test]
    async fn test_open_tally_lists_ballots() {
        let h = harness(20);
        let engine = engine(&h);
        let id = open_vote(&engine, &[]).await;
        engine
            .cast_vote(id, UserId::new(1), Stance::Positive)
            .await
            .unwrap();

        let open = engine.tally(id).await.unwrap();
        assert!(!open.secret);
        assert_eq!(open.ballots.map(|b| b.len()), Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rankings_are_serialized() {
        let h = harness(1000);
        let engine = engine(&h);
        let id = engine
            .create_proposal(CreateProposalInput::new(GroupId::new(1), "Busy"))
            .await
            .unwrap()
            .id();

        let tasks: Vec<_> = (1..=50)
            .map(|user| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    engine.rank(id, UserId::new(user), Stance::Positive).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let proposal = engine.proposal(id).await.unwrap();
        assert_eq!(proposal.ranking_count(), 50);
        assert_eq!(proposal.phase(), ProposalPhase::InDebate);
        let opened = h
            .notifier
            .seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                n.event
                    == NotificationEvent::PhaseChanged {
                        from: ProposalPhase::Presentation,
                        to: ProposalPhase::InDebate,
                    }
            })
            .count();
        assert_eq!(opened, 1);
        assert_eq!(h.notifier.ranking_events(), 50);
    }
}
