//! Domain layer for agora
//!
//! This crate contains the proposal lifecycle and voting engine: entities,
//! value objects and the pure rules that move a proposal from presentation to
//! its final outcome. It has no dependencies on infrastructure concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Members rank a proposal Positive / Neutral / Negative. Once enough of them
//! ranked it ([`Quorum::required_rankings`]) with a good enough approval score
//! ([`Quorum::required_good_score`]), the proposal waits for its vote.
//!
//! ## Vote
//!
//! - **Plurality**: one solution, ballots are Positive / Neutral / Negative
//! - **Schulze**: several solutions, ballots rank them; beatpath winner

pub mod core;
pub mod proposal;
pub mod quorum;
pub mod ranking;
pub mod vote;

// Re-export commonly used types
pub use crate::core::{
    error::DomainError,
    ids::{GroupId, ProposalId, SolutionId, UserId},
    stance::Stance,
};
pub use proposal::{
    PhaseEngine, PhaseTransition, Proposal, ProposalPhase, RankingApplied, Solution, TallyView,
    RankingRemoved, VoteSchedule, VoteWindow,
};
pub use quorum::{Quorum, QuorumPolicy};
pub use ranking::{RankTarget, Ranking, RankingChange, RankingCounters, RankingLedger};
pub use vote::{
    PairwiseCount, PluralityTally, RejectionReason, SchulzeBallot, SchulzeResult, SchulzeTally,
    VoteOutcome, VoteSummary,
};
