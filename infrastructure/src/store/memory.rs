//! In-memory proposal repository.
//!
//! Aggregates are stored whole behind an `RwLock`; `save` swaps the stored
//! copy in a single write, so readers never see a half-applied mutation.

use agora_application::{ProposalRepository, RepositoryError};
use agora_domain::{Proposal, ProposalId, ProposalPhase, SolutionId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryProposalRepository {
    proposals: RwLock<BTreeMap<ProposalId, Proposal>>,
    next_proposal: AtomicU64,
    next_solution: AtomicU64,
}

impl InMemoryProposalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.proposals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.proposals.read().await.is_empty()
    }

    /// Every stored proposal, by id
    pub async fn all(&self) -> Vec<Proposal> {
        self.proposals.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ProposalRepository for InMemoryProposalRepository {
    async fn next_proposal_id(&self) -> Result<ProposalId, RepositoryError> {
        Ok(ProposalId::new(
            self.next_proposal.fetch_add(1, Ordering::Relaxed) + 1,
        ))
    }

    async fn next_solution_id(&self) -> Result<SolutionId, RepositoryError> {
        Ok(SolutionId::new(
            self.next_solution.fetch_add(1, Ordering::Relaxed) + 1,
        ))
    }

    async fn load(&self, id: ProposalId) -> Result<Proposal, RepositoryError> {
        self.proposals
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        self.proposals
            .write()
            .await
            .insert(proposal.id(), proposal.clone());
        Ok(())
    }

    async fn list_in_phases(
        &self,
        phases: &[ProposalPhase],
    ) -> Result<Vec<ProposalId>, RepositoryError> {
        Ok(self
            .proposals
            .read()
            .await
            .values()
            .filter(|p| phases.contains(&p.phase()))
            .map(Proposal::id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{GroupId, QuorumPolicy};
    use chrono::Utc;

    async fn proposal(repo: &InMemoryProposalRepository) -> Proposal {
        let quorum = QuorumPolicy::default().assign(20).unwrap();
        let solution = repo.next_solution_id().await.unwrap();
        Proposal::new(
            repo.next_proposal_id().await.unwrap(),
            GroupId::new(1),
            "Stored",
            quorum,
            vec![(solution, "Stored".to_string())],
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = InMemoryProposalRepository::new();
        let stored = proposal(&repo).await;

        repo.save(&stored).await.unwrap();

        assert_eq!(repo.load(stored.id()).await.unwrap(), stored);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let repo = InMemoryProposalRepository::new();
        let id = ProposalId::new(42);

        assert_eq!(repo.load(id).await, Err(RepositoryError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let repo = InMemoryProposalRepository::new();
        let a = repo.next_proposal_id().await.unwrap();
        let b = repo.next_proposal_id().await.unwrap();
        assert!(a < b);
    }

    #[tokio::test]
    async fn test_list_in_phases_filters() {
        let repo = InMemoryProposalRepository::new();
        let stored = proposal(&repo).await;
        repo.save(&stored).await.unwrap();

        let presented = repo
            .list_in_phases(&[ProposalPhase::Presentation])
            .await
            .unwrap();
        let voting = repo.list_in_phases(&[ProposalPhase::Voting]).await.unwrap();

        assert_eq!(presented, vec![stored.id()]);
        assert!(voting.is_empty());
    }
}
