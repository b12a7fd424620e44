//! Quorum domain
//!
//! A quorum is the set of thresholds a proposal must clear to move forward:
//!
//! ```text
//! ┌──────────────┐  assign(eligible participants)   ┌──────────────────────┐
//! │ QuorumPolicy │ ───────────────────────────────▶ │ Quorum               │
//! │  percentages │                                  │  required_rankings   │
//! │  debate time │                                  │  required_good_score │
//! └──────────────┘                                  │  required_votes  ◀── frozen at vote start
//!                                                   └──────────────────────┘
//! ```
//!
//! Percentages are copied from the group's policy when the proposal is
//! created; the derived thresholds never move afterwards, even if the group
//! grows or shrinks.

pub mod policy;

pub use policy::{Quorum, QuorumPolicy, minimum_count};
