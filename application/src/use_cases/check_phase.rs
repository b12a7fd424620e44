//! Check Phase use case.
//!
//! Re-evaluates the time and quorum guards of one proposal. Safe to call at
//! any time and from anywhere: a check that finds nothing to do changes
//! nothing.

use crate::error::EngineError;
use crate::use_cases::shared::{EngineContext, with_proposal};
use agora_domain::{PhaseEngine, PhaseTransition, Proposal, ProposalId, ProposalPhase};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct CheckPhaseUseCase {
    ctx: Arc<EngineContext>,
}

impl CheckPhaseUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Apply every transition whose guard holds.
    ///
    /// `force` treats the debate or vote window as elapsed. A Waiting
    /// proposal with a fixed schedule opens its vote once the start is due.
    pub async fn execute(
        &self,
        id: ProposalId,
        force: bool,
    ) -> Result<Vec<PhaseTransition>, EngineError> {
        let snapshot = self.ctx.repository.load(id).await?;
        let voters = if may_open_vote(&snapshot, self.ctx.clock.now()) {
            Some(self.ctx.membership.eligible_voters(snapshot.group()).await)
        } else {
            None
        };
        let duration = self.ctx.config.vote_duration();

        with_proposal(&self.ctx, id, |proposal, now, outbox| {
            let mut transitions = PhaseEngine::check(proposal, now, force)?;
            if let Some(voters) = voters
                && PhaseEngine::is_vote_start_due(proposal, now)
            {
                transitions.push(PhaseEngine::start_votation(
                    proposal, voters, duration, now, false,
                )?);
            }
            outbox.transitions(&transitions);
            Ok(transitions)
        })
        .await
    }

    /// Presentation -> InDebate without waiting for a first ranking
    pub async fn open_debate(&self, id: ProposalId) -> Result<PhaseTransition, EngineError> {
        with_proposal(&self.ctx, id, |proposal, now, outbox| {
            let transition = PhaseEngine::open_debate(proposal, now)?;
            outbox.transitions(&[transition]);
            Ok(transition)
        })
        .await
    }
}

/// A debate closing in this check can open a due fixed vote right after
fn may_open_vote(proposal: &Proposal, now: DateTime<Utc>) -> bool {
    matches!(
        proposal.phase(),
        ProposalPhase::InDebate | ProposalPhase::Waiting
    ) && proposal
        .vote_schedule()
        .starts_at()
        .is_some_and(|starts_at| now >= starts_at)
}
