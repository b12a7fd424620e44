//! Vote tallying
//!
//! Two tally methods resolve a vote period:
//!
//! - [`plurality`]: single-solution proposals, Positive / Neutral / Negative ballots
//! - [`schulze`]: multi-solution proposals, ranked ballots resolved by the
//!   Schulze (beatpath) method
//!
//! Both produce a [`VoteOutcome`].

pub mod outcome;
pub mod plurality;
pub mod schulze;

pub use outcome::{RejectionReason, VoteOutcome};
pub use plurality::{PluralityTally, VoteSummary};
pub use schulze::{PairwiseCount, SchulzeBallot, SchulzeResult, SchulzeTally};
