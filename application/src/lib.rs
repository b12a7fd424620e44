//! Application layer for agora
//!
//! This crate contains use cases, port definitions, and engine configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::DeliberationEngine;
pub use error::EngineError;
pub use locks::{ProposalGuard, ProposalLocks};
pub use ports::{
    clock::Clock,
    membership::GroupMembership,
    notifier::{NoNotifier, Notification, NotificationEvent, Notifier},
    permissions::{AllowAll, PermissionChecker},
    proposal_repository::{ProposalRepository, RepositoryError},
};
pub use use_cases::cast_vote::CastVoteUseCase;
pub use use_cases::check_phase::CheckPhaseUseCase;
pub use use_cases::create_proposal::{CreateProposalInput, CreateProposalUseCase};
pub use use_cases::rank_proposal::RankProposalUseCase;
pub use use_cases::shared::{EngineContext, Outbox};
pub use use_cases::sweep::{SWEPT_PHASES, SweepReport, SweepUseCase};
pub use use_cases::vote_period::VotePeriodUseCase;
