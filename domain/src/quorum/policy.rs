//! Quorum policy and assigned thresholds

use crate::core::error::DomainError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Minimum count required out of `eligible` for a percentage threshold.
///
/// `floor(pct / 100 * eligible) + 1`: never zero, and 10% of 20 gives 3.
///
/// ```
/// use agora_domain::quorum::minimum_count;
///
/// assert_eq!(minimum_count(10, 20), 3);
/// assert_eq!(minimum_count(10, 10), 2);
/// assert_eq!(minimum_count(0, 50), 1);
/// ```
pub fn minimum_count(pct: u8, eligible: u32) -> u32 {
    let count = u64::from(pct) * u64::from(eligible) / 100 + 1;
    // Saturate: a wrapped requirement would be satisfied by anything
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Group-level quorum configuration, copied onto each new proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    participation_pct: u8,
    good_score_pct: u8,
    vote_pct: u8,
    debate_minutes: u32,
}

impl QuorumPolicy {
    /// Default debate length: two days
    pub const DEFAULT_DEBATE_MINUTES: u32 = 2 * 24 * 60;

    pub fn new(
        participation_pct: u32,
        good_score_pct: u32,
        vote_pct: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            participation_pct: check_pct("participation_pct", participation_pct)?,
            good_score_pct: check_pct("good_score_pct", good_score_pct)?,
            vote_pct: check_pct("vote_pct", vote_pct)?,
            debate_minutes: Self::DEFAULT_DEBATE_MINUTES,
        })
    }

    pub fn with_debate_minutes(mut self, minutes: u32) -> Self {
        self.debate_minutes = minutes;
        self
    }

    pub fn participation_pct(&self) -> u8 {
        self.participation_pct
    }

    pub fn good_score_pct(&self) -> u8 {
        self.good_score_pct
    }

    pub fn vote_pct(&self) -> u8 {
        self.vote_pct
    }

    pub fn debate_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.debate_minutes))
    }

    /// Derive the debate thresholds for a group of `eligible_participants`.
    ///
    /// Pure; called once when the proposal is created. The vote threshold is
    /// left open until the vote starts (see [`Quorum::freeze_required_votes`]).
    pub fn assign(&self, eligible_participants: i64) -> Result<Quorum, DomainError> {
        let eligible = positive_count(eligible_participants)?;
        Ok(Quorum {
            participation_pct: self.participation_pct,
            good_score_pct: self.good_score_pct,
            vote_pct: self.vote_pct,
            debate_minutes: self.debate_minutes,
            required_rankings: minimum_count(self.participation_pct, eligible),
            required_good_score: self.good_score_pct,
            required_votes: None,
            assigned: true,
        })
    }
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            participation_pct: 10,
            good_score_pct: 50,
            vote_pct: 10,
            debate_minutes: Self::DEFAULT_DEBATE_MINUTES,
        }
    }
}

/// Thresholds owned by one proposal
///
/// Fields are read-only from outside the module: once `assigned` is set the
/// debate thresholds are frozen, and `required_votes` is written exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quorum {
    participation_pct: u8,
    good_score_pct: u8,
    vote_pct: u8,
    debate_minutes: u32,
    required_rankings: u32,
    required_good_score: u8,
    required_votes: Option<u32>,
    assigned: bool,
}

impl Quorum {
    pub fn participation_pct(&self) -> u8 {
        self.participation_pct
    }

    pub fn good_score_pct(&self) -> u8 {
        self.good_score_pct
    }

    pub fn vote_pct(&self) -> u8 {
        self.vote_pct
    }

    pub fn debate_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.debate_minutes))
    }

    pub fn required_rankings(&self) -> u32 {
        self.required_rankings
    }

    pub fn required_good_score(&self) -> u8 {
        self.required_good_score
    }

    /// Vote threshold, known once the vote has started
    pub fn required_votes(&self) -> Option<u32> {
        self.required_votes
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Debate guard: enough rankings and a good enough approval score
    pub fn debate_satisfied(&self, ranking_count: u32, approval_score: u8) -> bool {
        ranking_count >= self.required_rankings && approval_score >= self.required_good_score
    }

    /// Fix the vote threshold against the eligible voters at vote start.
    ///
    /// Idempotent: a threshold that is already frozen is returned unchanged.
    pub fn freeze_required_votes(&mut self, eligible_voters: i64) -> Result<u32, DomainError> {
        if let Some(required) = self.required_votes {
            return Ok(required);
        }
        let eligible = positive_count(eligible_voters)?;
        let required = minimum_count(self.vote_pct, eligible);
        self.required_votes = Some(required);
        Ok(required)
    }

    /// Whether `votes_cast` reaches the frozen vote threshold
    ///
    /// An unfrozen threshold is never met.
    pub fn votes_satisfied(&self, votes_cast: u32) -> bool {
        self.required_votes
            .is_some_and(|required| votes_cast >= required)
    }
}

fn check_pct(field: &'static str, value: u32) -> Result<u8, DomainError> {
    if value > 100 {
        return Err(DomainError::InvalidPercentage { field, value });
    }
    Ok(value as u8)
}

fn positive_count(count: i64) -> Result<u32, DomainError> {
    if count <= 0 {
        return Err(DomainError::QuorumNotAssignable(count));
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
