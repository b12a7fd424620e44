//! Engine configuration
//!
//! Values the use cases need but that are not owned by a single proposal.

use agora_domain::QuorumPolicy;
use chrono::Duration;

/// Behavioral settings of the deliberation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Policy copied onto proposals created without an explicit override
    pub default_policy: QuorumPolicy,
    /// Length of a deferred vote window
    pub vote_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_policy: QuorumPolicy::default(),
            vote_minutes: Self::DEFAULT_VOTE_MINUTES,
        }
    }
}

impl EngineConfig {
    /// Default vote window: five days
    pub const DEFAULT_VOTE_MINUTES: u32 = 5 * 24 * 60;

    pub fn with_default_policy(mut self, policy: QuorumPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn with_vote_minutes(mut self, minutes: u32) -> Self {
        self.vote_minutes = minutes;
        self
    }

    pub fn vote_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.vote_minutes))
    }
}
