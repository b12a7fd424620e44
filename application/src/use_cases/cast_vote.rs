//! Cast Vote use case.
//!
//! Plurality ballots for single-solution proposals, ranked ballots for
//! proposals with competing solutions. Casting again replaces the earlier
//! ballot. A ballot arriving after the vote window is refused and closes the
//! vote on the spot instead of waiting for the next sweep.

use crate::error::EngineError;
use crate::use_cases::check_phase::CheckPhaseUseCase;
use crate::use_cases::shared::{EngineContext, with_proposal};
use agora_domain::{
    DomainError, PhaseEngine, ProposalId, SolutionId, Stance, UserId, VoteSummary,
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CastVoteUseCase {
    ctx: Arc<EngineContext>,
    check: CheckPhaseUseCase,
}

impl CastVoteUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        let check = CheckPhaseUseCase::new(ctx.clone());
        Self { ctx, check }
    }

    /// Record a positive, neutral or negative vote
    pub async fn cast_vote(
        &self,
        id: ProposalId,
        user: UserId,
        stance: Stance,
    ) -> Result<VoteSummary, EngineError> {
        self.authorize(id, user).await?;
        let result = with_proposal(&self.ctx, id, |proposal, now, _| {
            let summary = PhaseEngine::cast_vote(proposal, user, stance, now)?;
            debug!(proposal = %id, %user, %stance, total = summary.total(), "Vote recorded");
            Ok(summary)
        })
        .await;
        self.close_if_late(id, result).await
    }

    /// Record a ranked ballot, most preferred solution first.
    ///
    /// Returns `true` when it replaced an earlier ballot of `user`.
    pub async fn cast_ballot(
        &self,
        id: ProposalId,
        user: UserId,
        ranking: Vec<SolutionId>,
    ) -> Result<bool, EngineError> {
        self.authorize(id, user).await?;
        let result = with_proposal(&self.ctx, id, |proposal, now, _| {
            let replaced = PhaseEngine::cast_ballot(proposal, user, ranking, now)?;
            debug!(proposal = %id, %user, replaced, "Ranked ballot recorded");
            Ok(replaced)
        })
        .await;
        self.close_if_late(id, result).await
    }

    /// Run the closing check when a ballot was refused for a finished window
    async fn close_if_late<T>(
        &self,
        id: ProposalId,
        result: Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        if let Err(EngineError::Domain(DomainError::VoteWindowClosed)) = &result {
            let transitions = self.check.execute(id, false).await?;
            info!(
                proposal = %id,
                transitions = transitions.len(),
                "Late ballot refused, vote closed"
            );
        }
        result
    }

    async fn authorize(&self, id: ProposalId, user: UserId) -> Result<(), EngineError> {
        if self.ctx.permissions.can_vote(user, id).await {
            Ok(())
        } else {
            Err(DomainError::Unauthorized {
                user,
                action: "vote",
            }
            .into())
        }
    }
}
