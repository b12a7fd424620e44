//! Ranking ledger with its counter cache

use super::eligibility::{RankTarget, can_rank_again};
use crate::core::error::DomainError;
use crate::core::ids::UserId;
use crate::core::stance::Stance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One member's ranking of a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub user: UserId,
    pub stance: Stance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ranking {
    pub fn new(user: UserId, stance: Stance, at: DateTime<Utc>) -> Self {
        Self {
            user,
            stance,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Derived counters cached on the proposal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingCounters {
    /// Number of ranking rows
    pub ranking_count: u32,
    /// Rounded percentage of positive rankings (0-100)
    pub approval_score: u8,
}

impl RankingCounters {
    /// Counters for `positive` positive rankings out of `total`.
    ///
    /// Rounds half away from zero: 1 of 8 positive scores 13.
    pub fn from_counts(positive: u32, total: u32) -> Self {
        if total == 0 {
            return Self::default();
        }
        let positive = u64::from(positive.min(total));
        let total_wide = u64::from(total);
        let score = (200 * positive + total_wide) / (2 * total_wide);
        Self {
            ranking_count: total,
            approval_score: score as u8,
        }
    }
}

/// What an upsert did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingChange {
    /// First ranking by this member
    Created,
    /// An existing ranking was overwritten
    Updated { previous: Stance },
}

impl RankingChange {
    pub fn is_created(&self) -> bool {
        matches!(self, RankingChange::Created)
    }
}

/// Rankings of one proposal, unique per member
///
/// Every mutation recomputes the counters from the rows before returning,
/// so the cached values are never stale when read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingLedger {
    rankings: BTreeMap<UserId, Ranking>,
    counters: RankingCounters,
}

impl RankingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `user`'s ranking.
    ///
    /// Fails with [`DomainError::StaleRankingNotAllowed`] when the member
    /// already ranked and nothing happened to `target` since; the ledger is
    /// left untouched in that case.
    pub fn upsert(
        &mut self,
        user: UserId,
        stance: Stance,
        target: &RankTarget,
        now: DateTime<Utc>,
    ) -> Result<(RankingChange, RankingCounters), DomainError> {
        let prior = self.rankings.get(&user);
        if !can_rank_again(prior, target) {
            return Err(DomainError::StaleRankingNotAllowed { user });
        }

        let change = match self.rankings.get_mut(&user) {
            Some(existing) => {
                let previous = existing.stance;
                existing.stance = stance;
                existing.updated_at = now;
                RankingChange::Updated { previous }
            }
            None => {
                self.rankings.insert(user, Ranking::new(user, stance, now));
                RankingChange::Created
            }
        };

        Ok((change, self.recompute()))
    }

    /// Remove `user`'s ranking, if any
    pub fn remove(&mut self, user: UserId) -> Option<Ranking> {
        let removed = self.rankings.remove(&user);
        if removed.is_some() {
            self.recompute();
        }
        removed
    }

    /// Recompute the counters from the ranking rows
    pub fn recompute(&mut self) -> RankingCounters {
        let total = self.rankings.len() as u32;
        let positive = self
            .rankings
            .values()
            .filter(|r| r.stance.is_positive())
            .count() as u32;
        self.counters = RankingCounters::from_counts(positive, total);
        self.counters
    }

    pub fn counters(&self) -> RankingCounters {
        self.counters
    }

    pub fn get(&self, user: UserId) -> Option<&Ranking> {
        self.rankings.get(&user)
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.rankings.contains_key(&user)
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ranking> {
        self.rankings.values()
    }

    /// Number of rankings with the given stance
    pub fn count_of(&self, stance: Stance) -> usize {
        self.rankings.values().filter(|r| r.stance == stance).count()
    }
}
