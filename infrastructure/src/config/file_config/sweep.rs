//! Phase sweep configuration from TOML (`[sweep]` section)

use super::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSweepConfig {
    /// Seconds between two sweeps
    pub interval_secs: u64,
}

impl Default for FileSweepConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl FileSweepConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub(crate) fn validate(&self) -> Vec<ConfigIssue> {
        if self.interval_secs == 0 {
            vec![ConfigIssue::error(
                "sweep.interval_secs",
                "sweep interval must be at least one second",
            )]
        } else {
            Vec::new()
        }
    }
}
