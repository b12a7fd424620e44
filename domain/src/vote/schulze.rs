//! Ranked-choice tally using the Schulze method
//!
//! # Algorithm
//!
//! 1. `d[a][b]`: ballots ranking `a` strictly before `b`. A solution left off
//!    a ballot ranks after every listed one; two unlisted solutions are tied.
//! 2. `p[a][b] = d[a][b]` if `d[a][b] > d[b][a]`, else 0.
//! 3. Widest paths: `p[a][b] = max(p[a][b], min(p[a][c], p[c][b]))` over
//!    every intermediate `c`.
//! 4. `a` beats `b` iff `p[a][b] > p[b][a]`; a solution's score is the number
//!    of solutions it beats.
//! 5. The winner holds the strict maximum score. Ties have no winner.

use super::outcome::{RejectionReason, VoteOutcome};
use crate::core::error::DomainError;
use crate::core::ids::{SolutionId, UserId};
use crate::quorum::Quorum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One member's ranked ballot, most preferred first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchulzeBallot {
    pub user: UserId,
    pub ranking: Vec<SolutionId>,
    pub cast_at: DateTime<Utc>,
}

/// Number of ballots preferring `solution_a` over `solution_b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseCount {
    pub solution_a: SolutionId,
    pub solution_b: SolutionId,
    pub count: u32,
}

/// Result of resolving a ranked-choice vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchulzeResult {
    pub total_ballots: u32,
    /// Pairwise preference counts, one row per ordered pair
    pub pairwise: Vec<PairwiseCount>,
    /// Score per solution, in solution order
    pub scores: Vec<(SolutionId, u32)>,
    pub winner: Option<SolutionId>,
    pub outcome: VoteOutcome,
}

impl SchulzeResult {
    pub fn score_of(&self, solution: SolutionId) -> Option<u32> {
        self.scores
            .iter()
            .find(|(id, _)| *id == solution)
            .map(|(_, score)| *score)
    }
}

/// Ranked ballots of a multi-solution proposal, one per member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchulzeTally {
    ballots: BTreeMap<UserId, SchulzeBallot>,
}

impl SchulzeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user`'s ballot over `solutions`, replacing any earlier one.
    ///
    /// Returns `true` when an earlier ballot was replaced.
    pub fn cast(
        &mut self,
        user: UserId,
        ranking: Vec<SolutionId>,
        solutions: &[SolutionId],
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        validate_ballot(&ranking, solutions)?;
        let ballot = SchulzeBallot {
            user,
            ranking,
            cast_at: now,
        };
        Ok(self.ballots.insert(user, ballot).is_some())
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn ballot_of(&self, user: UserId) -> Option<&SchulzeBallot> {
        self.ballots.get(&user)
    }

    pub fn ballots(&self) -> impl Iterator<Item = &SchulzeBallot> {
        self.ballots.values()
    }

    /// Resolve all recorded ballots
    pub fn resolve(&self, solutions: &[SolutionId], quorum: &Quorum) -> SchulzeResult {
        let rankings: Vec<&[SolutionId]> =
            self.ballots.values().map(|b| b.ranking.as_slice()).collect();
        resolve(&rankings, solutions, quorum)
    }
}

fn validate_ballot(ranking: &[SolutionId], solutions: &[SolutionId]) -> Result<(), DomainError> {
    if ranking.is_empty() {
        return Err(DomainError::InvalidBallot("ballot ranks no solution".to_string()));
    }
    let mut seen = HashSet::with_capacity(ranking.len());
    for id in ranking {
        if !solutions.contains(id) {
            return Err(DomainError::UnknownSolution(*id));
        }
        if !seen.insert(*id) {
            return Err(DomainError::InvalidBallot(format!("{} ranked twice", id)));
        }
    }
    Ok(())
}

/// Resolve ranked `ballots` over `solutions` (in sequence order).
pub fn resolve(
    ballots: &[&[SolutionId]],
    solutions: &[SolutionId],
    quorum: &Quorum,
) -> SchulzeResult {
    let n = solutions.len();
    let d = preference_matrix(ballots, solutions);
    let p = widest_paths(&d);

    let scores: Vec<u32> = (0..n)
        .map(|a| (0..n).filter(|&b| b != a && p[a][b] > p[b][a]).count() as u32)
        .collect();

    let total_ballots = ballots.len() as u32;
    let winner = if total_ballots == 0 {
        None
    } else {
        strict_max(&scores).map(|index| solutions[index])
    };

    let outcome = if total_ballots == 0 {
        VoteOutcome::rejected(RejectionReason::NoBallots)
    } else if !quorum.votes_satisfied(total_ballots) {
        VoteOutcome::rejected(RejectionReason::QuorumNotMet)
    } else {
        match winner {
            Some(id) => VoteOutcome::accepted(Some(id)),
            None => VoteOutcome::rejected(RejectionReason::TieWithNoWinner),
        }
    };

    let mut pairwise = Vec::with_capacity(n * n.saturating_sub(1));
    for a in 0..n {
        for b in 0..n {
            if a != b {
                pairwise.push(PairwiseCount {
                    solution_a: solutions[a],
                    solution_b: solutions[b],
                    count: d[a][b],
                });
            }
        }
    }

    SchulzeResult {
        total_ballots,
        pairwise,
        scores: solutions.iter().copied().zip(scores).collect(),
        winner,
        outcome,
    }
}

/// `d[a][b]`: ballots ranking `a` strictly before `b`
fn preference_matrix(ballots: &[&[SolutionId]], solutions: &[SolutionId]) -> Vec<Vec<u32>> {
    let n = solutions.len();
    let mut d = vec![vec![0u32; n]; n];
    for ballot in ballots {
        // Unlisted solutions share the last position
        let position: Vec<usize> = solutions
            .iter()
            .map(|id| ballot.iter().position(|ranked| ranked == id).unwrap_or(usize::MAX))
            .collect();
        for a in 0..n {
            for b in 0..n {
                if a != b && position[a] < position[b] {
                    d[a][b] += 1;
                }
            }
        }
    }
    d
}

/// Strength of the strongest beatpath between every pair
fn widest_paths(d: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let n = d.len();
    let mut p = vec![vec![0u32; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a != b && d[a][b] > d[b][a] {
                p[a][b] = d[a][b];
            }
        }
    }
    for c in 0..n {
        for a in 0..n {
            if a == c {
                continue;
            }
            for b in 0..n {
                if b == a || b == c {
                    continue;
                }
                p[a][b] = p[a][b].max(p[a][c].min(p[c][b]));
            }
        }
    }
    p
}

fn strict_max(scores: &[u32]) -> Option<usize> {
    let best = *scores.iter().max()?;
    let mut leaders = scores.iter().enumerate().filter(|(_, s)| **s == best);
    let (index, _) = leaders.next()?;
    if leaders.next().is_some() {
        None
    } else {
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::QuorumPolicy;
    use chrono::TimeZone;

    fn ids(raw: &[u64]) -> Vec<SolutionId> {
        raw.iter().copied().map(SolutionId::new).collect()
    }

    /// Quorum over 10 voters at 10%: 2 required votes
    fn quorum() -> Quorum {
        let mut quorum = QuorumPolicy::new(10, 50, 10).unwrap().assign(10).unwrap();
        quorum.freeze_required_votes(10).unwrap();
        quorum
    }

    fn resolve_owned(ballots: &[Vec<SolutionId>], solutions: &[SolutionId]) -> SchulzeResult {
        let refs: Vec<&[SolutionId]> = ballots.iter().map(Vec::as_slice).collect();
        resolve(&refs, solutions, &quorum())
    }

    fn repeat(ballot: &[u64], times: usize) -> Vec<Vec<SolutionId>> {
        vec![ids(ballot); times]
    }

    #[test]
    fn test_no_ballots_no_winner() {
        let solutions = ids(&[10, 11]);
        let result = resolve_owned(&[], &solutions);

        assert_eq!(result.score_of(SolutionId::new(10)), Some(0));
        assert_eq!(result.score_of(SolutionId::new(11)), Some(0));
        assert_eq!(result.winner, None);
        assert_eq!(
            result.outcome,
            VoteOutcome::rejected(RejectionReason::NoBallots)
        );
        assert_eq!(result.pairwise.iter().map(|p| p.count).sum::<u32>(), 0);
    }

    #[test]
    fn test_unanimous_second_solution_wins() {
        let solutions = ids(&[10, 11]);
        let result = resolve_owned(&repeat(&[11, 10], 4), &solutions);

        assert_eq!(result.score_of(SolutionId::new(11)), Some(1));
        assert_eq!(result.score_of(SolutionId::new(10)), Some(0));
        assert_eq!(result.winner, Some(SolutionId::new(11)));
        assert_eq!(result.outcome, VoteOutcome::accepted(Some(SolutionId::new(11))));
        assert_eq!(result.pairwise.iter().map(|p| p.count).sum::<u32>(), 4);
    }

    #[test]
    fn test_partial_ballot_ranks_unlisted_last() {
        let solutions = ids(&[1, 2, 3]);
        // Only solution 3 listed: it beats 1 and 2, which stay tied
        let result = resolve_owned(&repeat(&[3], 3), &solutions);
        let d = |a: u64, b: u64| {
            result
                .pairwise
                .iter()
                .find(|p| p.solution_a.get() == a && p.solution_b.get() == b)
                .map(|p| p.count)
                .unwrap()
        };

        assert_eq!(d(3, 1), 3);
        assert_eq!(d(3, 2), 3);
        assert_eq!(d(1, 2), 0);
        assert_eq!(d(2, 1), 0);
        assert_eq!(result.score_of(SolutionId::new(3)), Some(2));
        assert_eq!(result.winner, Some(SolutionId::new(3)));
    }

    #[test]
    fn test_two_way_tie_rejected_not_resolved_by_sequence() {
        let solutions = ids(&[1, 2]);
        let mut ballots = repeat(&[1, 2], 2);
        ballots.extend(repeat(&[2, 1], 2));
        let result = resolve_owned(&ballots, &solutions);

        assert_eq!(result.score_of(SolutionId::new(1)), Some(0));
        assert_eq!(result.score_of(SolutionId::new(2)), Some(0));
        assert_eq!(result.winner, None);
        assert_eq!(
            result.outcome,
            VoteOutcome::rejected(RejectionReason::TieWithNoWinner)
        );
    }

    #[test]
    fn test_condorcet_cycle_resolved_by_beatpath() {
        // Classic Schulze example (Wikipedia, 45 voters, candidates A-E)
        let solutions = ids(&[1, 2, 3, 4, 5]);
        let (a, b, c, d, e) = (1, 2, 3, 4, 5);
        let mut ballots = Vec::new();
        ballots.extend(repeat(&[a, c, b, e, d], 5));
        ballots.extend(repeat(&[a, d, e, c, b], 5));
        ballots.extend(repeat(&[b, e, d, a, c], 8));
        ballots.extend(repeat(&[c, a, b, e, d], 3));
        ballots.extend(repeat(&[c, a, e, b, d], 7));
        ballots.extend(repeat(&[c, b, a, d, e], 2));
        ballots.extend(repeat(&[d, c, e, b, a], 7));
        ballots.extend(repeat(&[e, b, a, d, c], 8));

        let result = resolve_owned(&ballots, &solutions);

        assert_eq!(result.total_ballots, 45);
        assert_eq!(result.winner, Some(SolutionId::new(e)));
        // Final order E > A > C > B > D
        assert_eq!(result.score_of(SolutionId::new(e)), Some(4));
        assert_eq!(result.score_of(SolutionId::new(a)), Some(3));
        assert_eq!(result.score_of(SolutionId::new(c)), Some(2));
        assert_eq!(result.score_of(SolutionId::new(b)), Some(1));
        assert_eq!(result.score_of(SolutionId::new(d)), Some(0));
    }

    #[test]
    fn test_winner_below_vote_quorum_rejected() {
        let solutions = ids(&[1, 2]);
        let result = resolve_owned(&repeat(&[2, 1], 1), &solutions);

        assert_eq!(result.winner, Some(SolutionId::new(2)));
        assert_eq!(
            result.outcome,
            VoteOutcome::rejected(RejectionReason::QuorumNotMet)
        );
    }

    #[test]
    fn test_cast_validates_and_replaces() {
        let solutions = ids(&[1, 2]);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut tally = SchulzeTally::new();
        let voter = UserId::new(7);

        assert!(!tally.cast(voter, ids(&[1, 2]), &solutions, now).unwrap());
        assert!(tally.cast(voter, ids(&[2, 1]), &solutions, now).unwrap());
        assert_eq!(tally.len(), 1);
        assert_eq!(tally.ballot_of(voter).unwrap().ranking, ids(&[2, 1]));

        assert_eq!(
            tally.cast(voter, ids(&[3]), &solutions, now),
            Err(DomainError::UnknownSolution(SolutionId::new(3)))
        );
        assert!(matches!(
            tally.cast(voter, ids(&[1, 1]), &solutions, now),
            Err(DomainError::InvalidBallot(_))
        ));
        assert!(matches!(
            tally.cast(voter, vec![], &solutions, now),
            Err(DomainError::InvalidBallot(_))
        ));
        // Rejected ballots leave the earlier one in place
        assert_eq!(tally.ballot_of(voter).unwrap().ranking, ids(&[2, 1]));
    }
}
