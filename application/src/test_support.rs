//! In-memory collaborators for use case tests

use crate::ports::clock::Clock;
use crate::ports::membership::GroupMembership;
use crate::ports::notifier::{Notification, NotificationEvent, Notifier};
use crate::ports::permissions::PermissionChecker;
use crate::ports::proposal_repository::{ProposalRepository, RepositoryError};
use crate::use_cases::shared::EngineContext;
use agora_domain::{GroupId, Proposal, ProposalId, ProposalPhase, SolutionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

#[derive(Default)]
pub struct MockRepository {
    proposals: Mutex<HashMap<ProposalId, Proposal>>,
    next_id: AtomicU64,
    pub fail_saves: AtomicBool,
}

impl MockRepository {
    pub fn get(&self, id: ProposalId) -> Proposal {
        self.proposals.lock().unwrap()[&id].clone()
    }
}

#[async_trait]
impl ProposalRepository for MockRepository {
    async fn next_proposal_id(&self) -> Result<ProposalId, RepositoryError> {
        Ok(ProposalId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn next_solution_id(&self) -> Result<SolutionId, RepositoryError> {
        Ok(SolutionId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn load(&self, id: ProposalId) -> Result<Proposal, RepositoryError> {
        self.proposals
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn save(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("disk full".to_string()));
        }
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.id(), proposal.clone());
        Ok(())
    }

    async fn list_in_phases(
        &self,
        phases: &[ProposalPhase],
    ) -> Result<Vec<ProposalId>, RepositoryError> {
        let mut ids: Vec<_> = self
            .proposals
            .lock()
            .unwrap()
            .values()
            .filter(|p| phases.contains(&p.phase()))
            .map(|p| p.id())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

pub struct MockMembership {
    pub participants: AtomicI64,
    pub voters: AtomicI64,
}

#[async_trait]
impl GroupMembership for MockMembership {
    async fn eligible_participants(&self, _group: GroupId) -> i64 {
        self.participants.load(Ordering::SeqCst)
    }

    async fn eligible_voters(&self, _group: GroupId) -> i64 {
        self.voters.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MockPermissions {
    pub denied: Mutex<HashSet<UserId>>,
}

#[async_trait]
impl PermissionChecker for MockPermissions {
    async fn can_rank(&self, user: UserId, _proposal: ProposalId) -> bool {
        !self.denied.lock().unwrap().contains(&user)
    }

    async fn can_vote(&self, user: UserId, _proposal: ProposalId) -> bool {
        !self.denied.lock().unwrap().contains(&user)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn phases(&self) -> Vec<(ProposalPhase, ProposalPhase)> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|n| match n.event {
                NotificationEvent::PhaseChanged { from, to } => Some((from, to)),
                NotificationEvent::RankingCreated { .. } => None,
            })
            .collect()
    }

    pub fn ranking_events(&self) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| matches!(n.event, NotificationEvent::RankingCreated { .. }))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct Harness {
    pub ctx: Arc<EngineContext>,
    pub repository: Arc<MockRepository>,
    pub membership: Arc<MockMembership>,
    pub permissions: Arc<MockPermissions>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<MockClock>,
}

/// Engine wired to mocks, for a group of `members` participants and voters
pub fn harness(members: i64) -> Harness {
    let repository = Arc::new(MockRepository::default());
    let membership = Arc::new(MockMembership {
        participants: AtomicI64::new(members),
        voters: AtomicI64::new(members),
    });
    let permissions = Arc::new(MockPermissions::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(MockClock {
        now: Mutex::new(t0()),
    });
    let ctx = Arc::new(EngineContext::new(
        repository.clone(),
        membership.clone(),
        permissions.clone(),
        notifier.clone(),
        clock.clone(),
    ));
    Harness {
        ctx,
        repository,
        membership,
        permissions,
        notifier,
        clock,
    }
}

/// Create a proposal through the use case and return its id
pub async fn seed(h: &Harness, solutions: &[&str]) -> ProposalId {
    use crate::use_cases::create_proposal::{CreateProposalInput, CreateProposalUseCase};

    CreateProposalUseCase::new(h.ctx.clone())
        .execute(
            CreateProposalInput::new(GroupId::new(1), "Proposal")
                .with_solutions(solutions.iter().copied()),
        )
        .await
        .unwrap()
        .id()
}
