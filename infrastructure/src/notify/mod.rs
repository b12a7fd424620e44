//! Notification delivery
//!
//! [`ChannelNotifier`] implements the engine's [`Notifier`] port by pushing
//! onto an unbounded channel. A background task drains the channel and hands
//! each notification to every configured [`NotificationSink`]. A failing
//! sink is logged and skipped; the proposal that produced the notification
//! has already been saved.

mod recording;

pub use recording::RecordingSink;

use agora_application::{Notification, Notifier};
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors a sink can report for one notification
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Final destination of notifications
pub trait NotificationSink: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Channel-backed [`Notifier`]
pub struct ChannelNotifier {
    sender: Mutex<Option<mpsc::UnboundedSender<Notification>>>,
}

impl ChannelNotifier {
    /// Create the notifier and spawn its delivery task.
    ///
    /// The task ends once [`close`](Self::close) was called and the queued
    /// notifications were delivered; await the handle to wait for that.
    pub fn spawn(sinks: Vec<Box<dyn NotificationSink>>) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Notification>();

        let handle = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                for sink in &sinks {
                    if let Err(e) = sink.deliver(&notification) {
                        warn!(
                            sink = sink.name(),
                            proposal = %notification.proposal,
                            error = %e,
                            "Notification delivery failed"
                        );
                    }
                }
            }
            debug!("Notification channel closed");
        });

        (
            Self {
                sender: Mutex::new(Some(sender)),
            },
            handle,
        )
    }

    /// Stop accepting notifications
    pub fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let Ok(sender) = self.sender.lock() else {
            return;
        };
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(notification).is_err() {
                    warn!("Notification dropped: delivery task has stopped");
                }
            }
            None => warn!(
                proposal = %notification.proposal,
                "Notification dropped: notifier closed"
            ),
        }
    }
}
