//! Re-ranking eligibility
//!
//! A member who already ranked a target may only change their mind when
//! something new happened to it: the target was revised, or someone replied
//! after the previous ranking.

use super::ledger::Ranking;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the ranked target's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTarget {
    /// Last time the target's content changed
    pub updated_at: DateTime<Utc>,
    /// Creation time of the newest reply, if any
    pub last_reply_at: Option<DateTime<Utc>>,
}

impl RankTarget {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            updated_at,
            last_reply_at: None,
        }
    }

    pub fn with_last_reply(mut self, at: DateTime<Utc>) -> Self {
        self.last_reply_at = Some(at);
        self
    }
}

/// Whether a (new) ranking may be written given the member's prior one
pub fn can_rank_again(prior: Option<&Ranking>, target: &RankTarget) -> bool {
    let Some(prior) = prior else {
        return true;
    };
    if prior.updated_at < target.updated_at {
        return true;
    }
    target
        .last_reply_at
        .is_some_and(|reply| prior.updated_at < reply)
}
