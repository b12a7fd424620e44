//! Vote outcome types

use crate::core::ids::SolutionId;
use serde::{Deserialize, Serialize};

/// Why a proposal ended up rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Debate window elapsed without reaching the debate quorum
    DebateAbandoned,
    /// Fewer votes than the frozen vote threshold
    QuorumNotMet,
    /// Enough votes, but positive did not beat negative
    NotApproved,
    /// Ranked-choice vote closed without any ballot
    NoBallots,
    /// Ranked-choice vote where several solutions share the top score
    TieWithNoWinner,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::DebateAbandoned => "debate_abandoned",
            RejectionReason::QuorumNotMet => "quorum_not_met",
            RejectionReason::NotApproved => "not_approved",
            RejectionReason::NoBallots => "no_ballots",
            RejectionReason::TieWithNoWinner => "tie_with_no_winner",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved outcome of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Accepted; ranked-choice votes also name the winning solution
    Accepted { winner: Option<SolutionId> },
    /// Rejected, with the reason
    Rejected { reason: RejectionReason },
}

impl VoteOutcome {
    pub fn accepted(winner: Option<SolutionId>) -> Self {
        VoteOutcome::Accepted { winner }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        VoteOutcome::Rejected { reason }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, VoteOutcome::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, VoteOutcome::Rejected { .. })
    }

    pub fn winner(&self) -> Option<SolutionId> {
        match self {
            VoteOutcome::Accepted { winner } => *winner,
            VoteOutcome::Rejected { .. } => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            VoteOutcome::Accepted { .. } => None,
            VoteOutcome::Rejected { reason } => Some(*reason),
        }
    }
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteOutcome::Accepted { winner: Some(id) } => write!(f, "Accepted ({})", id),
            VoteOutcome::Accepted { winner: None } => write!(f, "Accepted"),
            VoteOutcome::Rejected { reason } => write!(f, "Rejected ({})", reason),
        }
    }
}
