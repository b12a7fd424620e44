//! Shared plumbing for the proposal use cases

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::locks::ProposalLocks;
use crate::ports::clock::Clock;
use crate::ports::membership::GroupMembership;
use crate::ports::notifier::{Notification, NotificationEvent, Notifier};
use crate::ports::permissions::PermissionChecker;
use crate::ports::proposal_repository::ProposalRepository;
use agora_domain::{DomainError, PhaseTransition, Proposal, ProposalId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Collaborators shared by every use case
///
/// Built once when the engine is wired; no global state.
pub struct EngineContext {
    pub repository: Arc<dyn ProposalRepository>,
    pub membership: Arc<dyn GroupMembership>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub locks: ProposalLocks,
    pub config: EngineConfig,
}

impl EngineContext {
    pub fn new(
        repository: Arc<dyn ProposalRepository>,
        membership: Arc<dyn GroupMembership>,
        permissions: Arc<dyn PermissionChecker>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            membership,
            permissions,
            notifier,
            clock,
            locks: ProposalLocks::new(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Notifications collected during a mutation, dispatched only once the
/// proposal has been saved
#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<Notification>,
}

impl Outbox {
    pub fn push(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    pub fn transitions(&mut self, transitions: &[PhaseTransition]) {
        self.pending
            .extend(transitions.iter().copied().map(Notification::from));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Run `apply` on proposal `id` under its lock.
///
/// The proposal is loaded, mutated in memory and saved as a whole; if
/// `apply` fails nothing is written and nothing is notified. Notifications
/// go out after the save and cannot undo it.
pub(crate) async fn with_proposal<T>(
    ctx: &EngineContext,
    id: ProposalId,
    apply: impl FnOnce(&mut Proposal, DateTime<Utc>, &mut Outbox) -> Result<T, DomainError>,
) -> Result<T, EngineError> {
    let _guard = ctx.locks.acquire(id).await;

    let mut proposal = ctx.repository.load(id).await?;
    let now = ctx.clock.now();
    let mut outbox = Outbox::default();

    let value = apply(&mut proposal, now, &mut outbox)?;

    debug!(proposal = %id, pending = outbox.pending.len(), "Saving proposal");
    ctx.repository.save(&proposal).await?;
    dispatch(ctx, outbox);
    Ok(value)
}

fn dispatch(ctx: &EngineContext, outbox: Outbox) {
    for notification in outbox.pending {
        if let NotificationEvent::PhaseChanged { from, to } = &notification.event {
            info!(proposal = %notification.proposal, %from, %to, "Phase transition");
        }
        ctx.notifier.notify(notification);
    }
}
