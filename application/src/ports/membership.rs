//! Group membership port

use agora_domain::GroupId;
use async_trait::async_trait;

/// Counts of group members allowed to take part in a proposal
///
/// Values are point-in-time snapshots. Counts are signed so that a broken
/// directory returning zero or a negative number can be rejected instead of
/// producing an always-satisfied quorum.
#[async_trait]
pub trait GroupMembership: Send + Sync {
    /// Members allowed to rank proposals of `group`
    async fn eligible_participants(&self, group: GroupId) -> i64;

    /// Members allowed to vote on proposals of `group`
    async fn eligible_voters(&self, group: GroupId) -> i64;
}
