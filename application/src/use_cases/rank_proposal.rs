//! Rank Proposal use case.
//!
//! Members rank a proposal while it is presented or debated. Every write
//! re-evaluates the phase guards, so a ranking that lands after the debate
//! window has elapsed also closes the debate.

use crate::error::EngineError;
use crate::ports::notifier::Notification;
use crate::use_cases::shared::{EngineContext, with_proposal};
use agora_domain::{
    DomainError, PhaseEngine, ProposalId, RankingApplied, RankingRemoved, Solution, Stance,
    UserId,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RankProposalUseCase {
    ctx: Arc<EngineContext>,
}

impl RankProposalUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Create or update `user`'s ranking.
    ///
    /// A new ranking notifies once; an update does not.
    pub async fn rank(
        &self,
        id: ProposalId,
        user: UserId,
        stance: Stance,
    ) -> Result<RankingApplied, EngineError> {
        if !self.ctx.permissions.can_rank(user, id).await {
            return Err(DomainError::Unauthorized {
                user,
                action: "rank",
            }
            .into());
        }

        with_proposal(&self.ctx, id, |proposal, now, outbox| {
            let applied = PhaseEngine::rank(proposal, user, stance, now)?;
            if applied.change.is_created() {
                outbox.push(Notification::ranking_created(id, user, stance, now));
            }
            outbox.transitions(&applied.transitions);
            debug!(
                proposal = %id,
                %user,
                %stance,
                count = applied.counters.ranking_count,
                score = applied.counters.approval_score,
                "Ranking recorded"
            );
            Ok(applied)
        })
        .await
    }

    /// Withdraw `user`'s ranking
    pub async fn withdraw(
        &self,
        id: ProposalId,
        user: UserId,
    ) -> Result<RankingRemoved, EngineError> {
        if !self.ctx.permissions.can_rank(user, id).await {
            return Err(DomainError::Unauthorized {
                user,
                action: "withdraw a ranking",
            }
            .into());
        }

        with_proposal(&self.ctx, id, |proposal, now, outbox| {
            let removed = PhaseEngine::remove_ranking(proposal, user, now)?;
            outbox.transitions(&removed.transitions);
            Ok(removed)
        })
        .await
    }

    /// Mark the proposal's content as revised, re-opening ranking to
    /// members who already ranked
    pub async fn record_revision(&self, id: ProposalId) -> Result<(), EngineError> {
        with_proposal(&self.ctx, id, |proposal, now, _| {
            proposal.record_revision(now);
            Ok(())
        })
        .await
    }

    /// Record a new contribution to the proposal's discussion
    pub async fn record_contribution(&self, id: ProposalId) -> Result<(), EngineError> {
        with_proposal(&self.ctx, id, |proposal, now, _| {
            proposal.record_contribution(now);
            Ok(())
        })
        .await
    }

    /// Add a competing solution while the proposal is still debated
    pub async fn add_solution(
        &self,
        id: ProposalId,
        title: impl Into<String>,
    ) -> Result<Solution, EngineError> {
        let solution_id = self.ctx.repository.next_solution_id().await?;
        let title = title.into();
        with_proposal(&self.ctx, id, |proposal, _, _| {
            proposal.add_solution(solution_id, title).cloned()
        })
        .await
    }
}
