//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The engine only ever talks to identity, permissions, notification and
//! persistence through these traits.

pub mod clock;
pub mod membership;
pub mod notifier;
pub mod permissions;
pub mod proposal_repository;
