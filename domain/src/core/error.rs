//! Domain error types

use crate::core::ids::{SolutionId, UserId};
use crate::proposal::phase::ProposalPhase;
use thiserror::Error;

/// Domain-level errors
///
/// Every variant is raised before any state is mutated, so a caller that
/// receives one can rely on the proposal being unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{user} already ranked this proposal and nothing changed since")]
    StaleRankingNotAllowed { user: UserId },

    #[error("{user} is not allowed to {action}")]
    Unauthorized { user: UserId, action: &'static str },

    #[error("Cannot {operation} while proposal is {phase}")]
    InvalidPhaseTransition {
        operation: &'static str,
        phase: ProposalPhase,
    },

    #[error("Quorum cannot be assigned: eligible count is {0}")]
    QuorumNotAssignable(i64),

    #[error("Invalid percentage for {field}: {value} (expected 0-100)")]
    InvalidPercentage { field: &'static str, value: u32 },

    #[error("Vote window for this proposal does not {boundary} until later")]
    VoteWindowNotReached { boundary: &'static str },

    #[error("Vote window for this proposal has closed")]
    VoteWindowClosed,

    #[error("Ballot kind does not match a proposal with {solutions} solution(s)")]
    BallotMismatch { solutions: usize },

    #[error("Invalid ballot: {0}")]
    InvalidBallot(String),

    #[error("Unknown {0}")]
    UnknownSolution(SolutionId),

    #[error("Solutions can no longer be changed while proposal is {0}")]
    SolutionsLocked(ProposalPhase),

    #[error("A proposal needs at least one solution")]
    NoSolutions,

    #[error("Duplicate {0}")]
    DuplicateSolution(SolutionId),
}

impl DomainError {
    /// Whether this error comes from the permission collaborator
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DomainError::Unauthorized { .. })
    }
}
