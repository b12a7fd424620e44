//! Permission port

use agora_domain::{ProposalId, UserId};
use async_trait::async_trait;

/// Capability checks consulted before accepting a ranking or a ballot
///
/// The engine does not implement the rules; it only refuses the write when
/// the answer is `false`.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn can_rank(&self, user: UserId, proposal: ProposalId) -> bool;

    async fn can_vote(&self, user: UserId, proposal: ProposalId) -> bool;
}

/// Grants every capability (single-user tools and tests)
pub struct AllowAll;

#[async_trait]
impl PermissionChecker for AllowAll {
    async fn can_rank(&self, _user: UserId, _proposal: ProposalId) -> bool {
        true
    }

    async fn can_vote(&self, _user: UserId, _proposal: ProposalId) -> bool {
        true
    }
}
