//! Vote Period use case.
//!
//! Opens and closes the vote of a proposal. Opening freezes the number of
//! votes required against the group's voters at that moment.

use crate::error::EngineError;
use crate::use_cases::shared::{EngineContext, with_proposal};
use agora_domain::{PhaseEngine, PhaseTransition, ProposalId};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct VotePeriodUseCase {
    ctx: Arc<EngineContext>,
}

impl VotePeriodUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Waiting -> Voting
    ///
    /// Without `force` a fixed schedule must have reached its start.
    pub async fn start_votation(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<PhaseTransition, EngineError> {
        let group = self.ctx.repository.load(id).await?.group();
        let voters = self.ctx.membership.eligible_voters(group).await;
        let duration = self.ctx.config.vote_duration();

        let (transition, required) = with_proposal(&self.ctx, id, |proposal, now, outbox| {
            let transition = PhaseEngine::start_votation(proposal, voters, duration, now, force)?;
            outbox.transitions(&[transition]);
            Ok((transition, proposal.quorum().required_votes()))
        })
        .await?;

        info!(proposal = %id, voters, required_votes = ?required, "Vote opened");
        Ok(transition)
    }

    /// Voting -> Voted -> Accepted | Rejected
    ///
    /// Without `force` the vote window must have ended.
    pub async fn close_vote_phase(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, EngineError> {
        let (transitions, outcome, votes) =
            with_proposal(&self.ctx, id, |proposal, now, outbox| {
                let transitions = PhaseEngine::close_vote_phase(proposal, now, force)?;
                outbox.transitions(&transitions);
                Ok((transitions, proposal.outcome().cloned(), proposal.votes_cast()))
            })
            .await?;

        info!(proposal = %id, ?outcome, votes, "Vote closed");
        Ok(transitions)
    }

    /// Close the vote right away, regardless of the window
    pub async fn end_votation(&self, id: ProposalId) -> Result<Vec<PhaseTransition>, EngineError> {
        self.close_vote_phase(id, true).await
    }
}
