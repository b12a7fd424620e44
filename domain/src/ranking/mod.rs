//! Debate rankings
//!
//! During debate every member may leave one qualitative ranking on a
//! proposal. The ledger keeps those rows and the derived counters
//! (`ranking_count`, `approval_score`) that gate the move to a vote.

pub mod eligibility;
pub mod ledger;

pub use eligibility::{RankTarget, can_rank_again};
pub use ledger::{Ranking, RankingChange, RankingCounters, RankingLedger};
