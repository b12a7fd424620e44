//! Vote window configuration from TOML (`[voting]` section)

use super::ConfigIssue;
use agora_application::EngineConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Length of a vote opened without a fixed schedule
    pub vote_minutes: u32,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            vote_minutes: EngineConfig::DEFAULT_VOTE_MINUTES,
        }
    }
}

impl FileVotingConfig {
    pub(crate) fn validate(&self) -> Vec<ConfigIssue> {
        if self.vote_minutes == 0 {
            vec![ConfigIssue::error(
                "voting.vote_minutes",
                "vote window cannot be empty",
            )]
        } else {
            Vec::new()
        }
    }
}
