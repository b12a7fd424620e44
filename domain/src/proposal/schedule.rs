//! Vote period scheduling

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// When the vote period is meant to happen, chosen at proposal creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteSchedule {
    /// Fixed window: the vote opens and closes at these instants
    Fixed {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
    /// The window opens when an operator starts it and lasts the configured
    /// vote duration
    #[default]
    Deferred,
}

impl VoteSchedule {
    pub fn fixed(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        VoteSchedule::Fixed { starts_at, ends_at }
    }

    /// Scheduled opening, if fixed
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        match self {
            VoteSchedule::Fixed { starts_at, .. } => Some(*starts_at),
            VoteSchedule::Deferred => None,
        }
    }

    /// Window actually used when the vote starts at `now`
    pub fn window_from(&self, now: DateTime<Utc>, vote_duration: Duration) -> VoteWindow {
        match self {
            VoteSchedule::Fixed { ends_at, .. } => VoteWindow {
                starts_at: now,
                ends_at: (*ends_at).max(now),
            },
            VoteSchedule::Deferred => VoteWindow {
                starts_at: now,
                ends_at: now + vote_duration,
            },
        }
    }
}

/// The open vote window of a proposal in vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl VoteWindow {
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_deferred_window_uses_duration() {
        let window = VoteSchedule::Deferred.window_from(t0(), Duration::days(5));
        assert_eq!(window.starts_at, t0());
        assert_eq!(window.ends_at, t0() + Duration::days(5));
        assert!(!window.has_ended(t0() + Duration::days(4)));
        assert!(window.has_ended(t0() + Duration::days(5)));
    }

    #[test]
    fn test_fixed_window_keeps_end() {
        let schedule = VoteSchedule::fixed(t0(), t0() + Duration::days(4));
        let window = schedule.window_from(t0() + Duration::hours(1), Duration::days(5));
        assert_eq!(window.ends_at, t0() + Duration::days(4));
        assert_eq!(schedule.starts_at(), Some(t0()));
    }

    #[test]
    fn test_fixed_window_started_late_never_ends_before_start() {
        let schedule = VoteSchedule::fixed(t0(), t0() + Duration::days(1));
        let late = t0() + Duration::days(3);
        let window = schedule.window_from(late, Duration::days(5));
        assert_eq!(window.ends_at, late);
    }
}
