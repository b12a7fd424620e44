//! Create Proposal use case.
//!
//! Assigns the quorum against the group's current membership and stores the
//! new proposal in Presentation.

use crate::error::EngineError;
use crate::use_cases::shared::EngineContext;
use agora_domain::{GroupId, Proposal, QuorumPolicy, VoteSchedule};
use std::sync::Arc;
use tracing::info;

/// Input for the [`CreateProposalUseCase`].
#[derive(Debug, Clone)]
pub struct CreateProposalInput {
    pub group: GroupId,
    pub title: String,
    /// Solution titles in presentation order. Empty means a single solution
    /// named after the proposal.
    pub solutions: Vec<String>,
    /// Overrides the engine's default policy
    pub policy: Option<QuorumPolicy>,
    pub schedule: VoteSchedule,
    pub secret_vote: bool,
}

impl CreateProposalInput {
    pub fn new(group: GroupId, title: impl Into<String>) -> Self {
        Self {
            group,
            title: title.into(),
            solutions: Vec::new(),
            policy: None,
            schedule: VoteSchedule::Deferred,
            secret_vote: false,
        }
    }

    pub fn with_solutions<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.solutions = titles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_policy(mut self, policy: QuorumPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_schedule(mut self, schedule: VoteSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_secret_vote(mut self, secret: bool) -> Self {
        self.secret_vote = secret;
        self
    }
}

#[derive(Clone)]
pub struct CreateProposalUseCase {
    ctx: Arc<EngineContext>,
}

impl CreateProposalUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: CreateProposalInput) -> Result<Proposal, EngineError> {
        let policy = input.policy.unwrap_or(self.ctx.config.default_policy);
        let participants = self.ctx.membership.eligible_participants(input.group).await;
        let quorum = policy.assign(participants)?;

        let titles = if input.solutions.is_empty() {
            vec![input.title.clone()]
        } else {
            input.solutions
        };
        let mut solutions = Vec::with_capacity(titles.len());
        for title in titles {
            solutions.push((self.ctx.repository.next_solution_id().await?, title));
        }

        let id = self.ctx.repository.next_proposal_id().await?;
        let now = self.ctx.clock.now();
        let proposal = Proposal::new(id, input.group, input.title, quorum, solutions, now)?
            .with_secret_vote(input.secret_vote)
            .with_vote_schedule(input.schedule);

        self.ctx.repository.save(&proposal).await?;
        info!(
            proposal = %id,
            group = %input.group,
            participants,
            required_rankings = proposal.quorum().required_rankings(),
            "Proposal created"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use agora_domain::{DomainError, ProposalPhase};

    #[tokio::test]
    async fn test_create_assigns_quorum_from_membership() {
        let h = harness(20);
        let uc = CreateProposalUseCase::new(h.ctx.clone());

        let proposal = uc
            .execute(CreateProposalInput::new(GroupId::new(1), "Bike racks"))
            .await
            .unwrap();

        assert_eq!(proposal.phase(), ProposalPhase::Presentation);
        assert_eq!(proposal.quorum().required_rankings(), 3);
        assert_eq!(proposal.quorum().required_good_score(), 50);
        assert_eq!(proposal.quorum().required_votes(), None);
        assert_eq!(proposal.solutions().len(), 1);
        assert_eq!(proposal.solutions()[0].title, "Bike racks");
        assert_eq!(h.repository.get(proposal.id()), proposal);
    }

    #[tokio::test]
    async fn test_create_with_several_solutions_is_ranked_choice() {
        let h = harness(10);
        let uc = CreateProposalUseCase::new(h.ctx.clone());

        let proposal = uc
            .execute(
                CreateProposalInput::new(GroupId::new(1), "Meeting day")
                    .with_solutions(["Monday", "Thursday"])
                    .with_secret_vote(true),
            )
            .await
            .unwrap();

        assert!(proposal.is_ranked_choice());
        assert!(proposal.secret_vote());
        assert_eq!(proposal.quorum().required_rankings(), 2);
        assert_eq!(proposal.solutions()[1].sequence, 2);
    }

    #[tokio::test]
    async fn test_create_without_participants_fails() {
        let h = harness(0);
        let uc = CreateProposalUseCase::new(h.ctx.clone());

        let err = uc
            .execute(CreateProposalInput::new(GroupId::new(1), "Nobody home"))
            .await
            .unwrap_err();

        assert_eq!(err.domain(), Some(&DomainError::QuorumNotAssignable(0)));
    }
}
