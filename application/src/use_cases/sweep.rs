//! Sweep use case.
//!
//! Runs [`CheckPhaseUseCase`] over every proposal whose phase can change
//! with the passage of time. Proposals are checked concurrently; each check
//! takes its own proposal lock, so a sweep never races an interactive
//! mutation.

use crate::use_cases::check_phase::CheckPhaseUseCase;
use crate::use_cases::shared::EngineContext;
use crate::error::EngineError;
use agora_domain::{PhaseTransition, ProposalId, ProposalPhase};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Phases a sweep looks at
pub const SWEPT_PHASES: [ProposalPhase; 3] = [
    ProposalPhase::InDebate,
    ProposalPhase::Waiting,
    ProposalPhase::Voting,
];

/// What one sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub transitions: Vec<PhaseTransition>,
    pub failures: Vec<(ProposalId, EngineError)>,
}

#[derive(Clone)]
pub struct SweepUseCase {
    ctx: Arc<EngineContext>,
    check: CheckPhaseUseCase,
}

impl SweepUseCase {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        let check = CheckPhaseUseCase::new(ctx.clone());
        Self { ctx, check }
    }

    /// Check every time-sensitive proposal once.
    ///
    /// A failing proposal is reported and does not stop the others.
    pub async fn execute(&self) -> Result<SweepReport, EngineError> {
        let ids = self.ctx.repository.list_in_phases(&SWEPT_PHASES).await?;

        let results = join_all(ids.iter().map(|&id| self.check.execute(id, false))).await;

        let mut report = SweepReport {
            checked: ids.len(),
            ..SweepReport::default()
        };
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(transitions) => report.transitions.extend(transitions),
                Err(e) => {
                    warn!(proposal = %id, error = %e, "Phase check failed");
                    report.failures.push((id, e));
                }
            }
        }

        if !report.transitions.is_empty() || !report.failures.is_empty() {
            info!(
                checked = report.checked,
                transitions = report.transitions.len(),
                failures = report.failures.len(),
                "Sweep finished"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, seed};
    use crate::use_cases::create_proposal::{CreateProposalInput, CreateProposalUseCase};
    use crate::ports::clock::Clock;
    use crate::use_cases::rank_proposal::RankProposalUseCase;
    use agora_domain::{GroupId, Stance, UserId, VoteSchedule};
    use chrono::Duration;

    #[tokio::test]
    async fn test_sweep_skips_quiet_proposals() {
        let h = harness(20);
        seed(&h, &[]).await;
        let sweep = SweepUseCase::new(h.ctx.clone());

        let report = sweep.execute().await.unwrap();

        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn test_sweep_opens_and_closes_fixed_schedule() {
        let h = harness(20);
        let starts_at = h.clock.now() + Duration::days(3);
        let ends_at = starts_at + Duration::days(2);
        let id = CreateProposalUseCase::new(h.ctx.clone())
            .execute(
                CreateProposalInput::new(GroupId::new(1), "Scheduled")
                    .with_schedule(VoteSchedule::Fixed { starts_at, ends_at }),
            )
            .await
            .unwrap()
            .id();
        let rank = RankProposalUseCase::new(h.ctx.clone());
        for user in 1..=3 {
            rank.rank(id, UserId::new(user), Stance::Positive).await.unwrap();
        }
        let sweep = SweepUseCase::new(h.ctx.clone());

        assert!(sweep.execute().await.unwrap().transitions.is_empty());

        // The debate ends and the due vote opens in the same check
        h.clock.advance(Duration::days(3));
        let report = sweep.execute().await.unwrap();
        assert_eq!(report.checked, 1);
        let phases: Vec<_> = report.transitions.iter().map(|t| t.to).collect();
        assert_eq!(phases, vec![ProposalPhase::Waiting, ProposalPhase::Voting]);
        assert_eq!(h.repository.get(id).phase(), ProposalPhase::Voting);

        h.clock.advance(Duration::days(2));
        let report = sweep.execute().await.unwrap();
        assert_eq!(report.transitions.len(), 2);
        // No votes were cast
        assert_eq!(h.repository.get(id).phase(), ProposalPhase::Rejected);
        assert!(sweep.execute().await.unwrap().transitions.is_empty());
    }
}
