//! Use cases
//!
//! Application-level operations that orchestrate domain logic. Every
//! mutation runs under the proposal's lock and notifies only after the
//! proposal has been saved.

pub mod cast_vote;
pub mod check_phase;
pub mod create_proposal;
pub mod rank_proposal;
pub(crate) mod shared;
pub mod sweep;
pub mod vote_period;
