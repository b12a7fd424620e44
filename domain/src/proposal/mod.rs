//! Proposal lifecycle
//!
//! ```text
//! Presentation ──first ranking / open──▶ InDebate ──debate over, quorum met──▶ Waiting
//!                                           │                                   │ start votation
//!                                           │ debate over, quorum missed        ▼
//!                                           ▼                                 Voting
//!                                        Rejected                               │ close
//!                                                                               ▼
//!                                                          Accepted ◀──────── Voted ──────▶ Rejected
//! ```
//!
//! [`Proposal`] is the aggregate: it owns the quorum, the ranking ledger, the
//! tallies and the phase. [`PhaseEngine`] holds every transition rule.

pub mod engine;
pub mod entities;
pub mod phase;
pub mod schedule;

pub use engine::{PhaseEngine, RankingApplied, RankingRemoved};
pub use entities::{PhaseTransition, Proposal, Solution, TallyView};
pub use phase::ProposalPhase;
pub use schedule::{VoteSchedule, VoteWindow};
