//! Notification port
//!
//! Defines the [`Notifier`] trait the engine calls once per phase transition
//! and once per newly created ranking.
//!
//! Delivery is somebody else's problem: `notify` is synchronous, must not
//! block and cannot fail from the engine's point of view. Adapters hand the
//! notification to a background delivery path.

use agora_domain::{PhaseTransition, ProposalId, ProposalPhase, Stance, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    PhaseChanged {
        from: ProposalPhase,
        to: ProposalPhase,
    },
    RankingCreated {
        user: UserId,
        stance: Stance,
    },
}

impl NotificationEvent {
    /// Event type identifier, used as the record type in event logs
    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationEvent::PhaseChanged { .. } => "phase_changed",
            NotificationEvent::RankingCreated { .. } => "ranking_created",
        }
    }
}

/// A notification about one proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub proposal: ProposalId,
    #[serde(flatten)]
    pub event: NotificationEvent,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn ranking_created(
        proposal: ProposalId,
        user: UserId,
        stance: Stance,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            proposal,
            event: NotificationEvent::RankingCreated { user, stance },
            at,
        }
    }
}

impl From<PhaseTransition> for Notification {
    fn from(transition: PhaseTransition) -> Self {
        Self {
            proposal: transition.proposal,
            event: NotificationEvent::PhaseChanged {
                from: transition.from,
                to: transition.to,
            },
            at: transition.at,
        }
    }
}

/// Port for dispatching notifications
pub trait Notifier: Send + Sync {
    /// Hand off a notification for delivery.
    fn notify(&self, notification: Notification);
}

/// No-op implementation for tests and when notifications are disabled.
pub struct NoNotifier;

impl Notifier for NoNotifier {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_notification_from_transition() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let notification = Notification::from(PhaseTransition {
            proposal: ProposalId::new(3),
            from: ProposalPhase::InDebate,
            to: ProposalPhase::Waiting,
            at,
        });
        assert_eq!(notification.event.event_type(), "phase_changed");

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["event"], "phase_changed");
        assert_eq!(json["to"], "waiting");
        assert_eq!(json["proposal"], 3);
    }
}
