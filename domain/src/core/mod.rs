//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: typed identifiers for proposals, users, solutions and groups
//! - [`stance::Stance`]: Positive / Neutral / Negative reaction used by rankings and votes
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
pub mod stance;
