//! Default quorum policy from TOML (`[quorum]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [quorum]
//! participation_pct = 10   # share of members who must rank
//! good_score_pct = 50      # approval score needed to leave debate
//! vote_pct = 10            # share of voters who must vote
//! debate_minutes = 2880    # debate window (2 days)
//! ```

use super::ConfigIssue;
use agora_domain::{DomainError, QuorumPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    pub participation_pct: u32,
    pub good_score_pct: u32,
    pub vote_pct: u32,
    pub debate_minutes: u32,
}

impl Default for FileQuorumConfig {
    fn default() -> Self {
        let policy = QuorumPolicy::default();
        Self {
            participation_pct: u32::from(policy.participation_pct()),
            good_score_pct: u32::from(policy.good_score_pct()),
            vote_pct: u32::from(policy.vote_pct()),
            debate_minutes: QuorumPolicy::DEFAULT_DEBATE_MINUTES,
        }
    }
}

impl FileQuorumConfig {
    pub fn to_policy(&self) -> Result<QuorumPolicy, DomainError> {
        Ok(
            QuorumPolicy::new(self.participation_pct, self.good_score_pct, self.vote_pct)?
                .with_debate_minutes(self.debate_minutes),
        )
    }

    pub(crate) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("quorum.participation_pct", self.participation_pct),
            ("quorum.good_score_pct", self.good_score_pct),
            ("quorum.vote_pct", self.vote_pct),
        ] {
            if value > 100 {
                issues.push(ConfigIssue::error(
                    field,
                    format!("{value} is not a percentage (expected 0-100)"),
                ));
            }
        }
        if self.debate_minutes == 0 {
            issues.push(ConfigIssue::warning(
                "quorum.debate_minutes",
                "debates end as soon as they open; only proposals reaching the quorum on their first ranking survive",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_config_default_matches_policy() {
        let config = FileQuorumConfig::default();
        assert_eq!(config.to_policy().unwrap(), QuorumPolicy::default());
    }

    #[test]
    fn test_out_of_range_percentage_is_error() {
        let config = FileQuorumConfig {
            vote_pct: 101,
            ..FileQuorumConfig::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "quorum.vote_pct");
        assert!(matches!(
            config.to_policy(),
            Err(DomainError::InvalidPercentage { value: 101, .. })
        ));
    }
}
