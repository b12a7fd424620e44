//! Proposal persistence port

use agora_domain::{Proposal, ProposalId, ProposalPhase, SolutionId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a proposal store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(ProposalId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Storage of proposal aggregates
///
/// `save` replaces the whole aggregate in one step, so counters, tallies
/// and phase are never observed half-written. Callers serialize writes to
/// the same proposal (see [`ProposalLocks`](crate::locks::ProposalLocks)).
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn next_proposal_id(&self) -> Result<ProposalId, RepositoryError>;

    async fn next_solution_id(&self) -> Result<SolutionId, RepositoryError>;

    async fn load(&self, id: ProposalId) -> Result<Proposal, RepositoryError>;

    /// Insert or replace the aggregate
    async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError>;

    /// Identifiers of proposals currently in one of `phases`
    async fn list_in_phases(
        &self,
        phases: &[ProposalPhase],
    ) -> Result<Vec<ProposalId>, RepositoryError>;
}
