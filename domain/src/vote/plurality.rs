//! Plurality tally for single-solution proposals

use super::outcome::{RejectionReason, VoteOutcome};
use crate::core::ids::UserId;
use crate::core::stance::Stance;
use crate::quorum::Quorum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counters of a plurality vote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl VoteSummary {
    /// Number of distinct voters
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }

    pub fn count(&self, stance: Stance) -> u32 {
        match stance {
            Stance::Positive => self.positive,
            Stance::Neutral => self.neutral,
            Stance::Negative => self.negative,
        }
    }

    fn slot(&mut self, stance: Stance) -> &mut u32 {
        match stance {
            Stance::Positive => &mut self.positive,
            Stance::Neutral => &mut self.neutral,
            Stance::Negative => &mut self.negative,
        }
    }

    /// Resolve the vote against the proposal's quorum.
    ///
    /// Neutral ballots count toward the vote quorum but not toward the
    /// positive/negative comparison.
    pub fn resolve(&self, quorum: &Quorum) -> VoteOutcome {
        if !quorum.votes_satisfied(self.total()) {
            return VoteOutcome::rejected(RejectionReason::QuorumNotMet);
        }
        if self.positive > self.negative {
            VoteOutcome::accepted(None)
        } else {
            VoteOutcome::rejected(RejectionReason::NotApproved)
        }
    }
}

/// Ballots of a plurality vote, one per member
///
/// Re-voting replaces the previous ballot: the old stance is decremented and
/// the new one incremented in the same call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralityTally {
    ballots: BTreeMap<UserId, Stance>,
    summary: VoteSummary,
}

impl PluralityTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user`'s ballot, returning the updated summary
    pub fn cast(&mut self, user: UserId, stance: Stance) -> VoteSummary {
        match self.ballots.insert(user, stance) {
            Some(previous) if previous == stance => {}
            Some(previous) => {
                let slot = self.summary.slot(previous);
                *slot = slot.saturating_sub(1);
                *self.summary.slot(stance) += 1;
            }
            None => *self.summary.slot(stance) += 1,
        }
        self.summary
    }

    pub fn summary(&self) -> VoteSummary {
        self.summary
    }

    pub fn ballot_of(&self, user: UserId) -> Option<Stance> {
        self.ballots.get(&user).copied()
    }

    pub fn ballots(&self) -> impl Iterator<Item = (UserId, Stance)> + '_ {
        self.ballots.iter().map(|(user, stance)| (*user, *stance))
    }

    /// Summary recounted from the ballot rows
    pub fn recount(&self) -> VoteSummary {
        let mut summary = VoteSummary::default();
        for stance in self.ballots.values() {
            *summary.slot(*stance) += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::QuorumPolicy;

    fn quorum_requiring(votes_of: i64) -> Quorum {
        // 10% of 20 -> 3 required votes
        let mut quorum = QuorumPolicy::new(10, 50, 10).unwrap().assign(20).unwrap();
        quorum.freeze_required_votes(votes_of).unwrap();
        quorum
    }

    fn tally_of(stances: &[Stance]) -> PluralityTally {
        let mut tally = PluralityTally::new();
        for (i, stance) in stances.iter().enumerate() {
            tally.cast(UserId::new(i as u64 + 1), *stance);
        }
        tally
    }

    #[test]
    fn test_positive_majority_accepted() {
        use Stance::*;
        let tally = tally_of(&[Positive, Positive, Negative, Neutral, Positive]);
        let summary = tally.summary();

        assert_eq!(summary.positive, 3);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.resolve(&quorum_requiring(20)), VoteOutcome::accepted(None));
    }

    #[test]
    fn test_negative_majority_rejected() {
        use Stance::*;
        let tally = tally_of(&[Negative, Negative, Neutral, Negative]);
        assert_eq!(
            tally.summary().resolve(&quorum_requiring(20)),
            VoteOutcome::rejected(RejectionReason::NotApproved)
        );
    }

    #[test]
    fn test_even_split_rejected() {
        use Stance::*;
        let tally = tally_of(&[Positive, Negative, Neutral, Neutral]);
        assert!(tally.summary().resolve(&quorum_requiring(20)).is_rejected());
    }

    #[test]
    fn test_below_vote_quorum_rejected() {
        use Stance::*;
        let tally = tally_of(&[Positive, Positive]);
        assert_eq!(
            tally.summary().resolve(&quorum_requiring(20)),
            VoteOutcome::rejected(RejectionReason::QuorumNotMet)
        );
    }

    #[test]
    fn test_neutral_counts_toward_quorum() {
        use Stance::*;
        let tally = tally_of(&[Positive, Neutral, Neutral]);
        assert!(tally.summary().resolve(&quorum_requiring(20)).is_accepted());
    }

    #[test]
    fn test_unfrozen_quorum_never_satisfied() {
        let quorum = QuorumPolicy::default().assign(20).unwrap();
        let tally = tally_of(&[Stance::Positive; 10]);
        assert_eq!(
            tally.summary().resolve(&quorum),
            VoteOutcome::rejected(RejectionReason::QuorumNotMet)
        );
    }

    #[test]
    fn test_same_revote_leaves_summary_unchanged() {
        let mut tally = tally_of(&[Stance::Positive, Stance::Negative]);
        let before = tally.summary();
        let after = tally.cast(UserId::new(1), Stance::Positive);
        assert_eq!(before, after);
    }

    #[test]
    fn test_changed_revote_moves_one_ballot() {
        let mut tally = tally_of(&[Stance::Positive, Stance::Negative]);
        let after = tally.cast(UserId::new(1), Stance::Neutral);

        assert_eq!(after.positive, 0);
        assert_eq!(after.neutral, 1);
        assert_eq!(after.negative, 1);
        assert_eq!(after.total(), 2);
        assert_eq!(tally.recount(), after);
        assert_eq!(tally.ballot_of(UserId::new(1)), Some(Stance::Neutral));
    }
}
