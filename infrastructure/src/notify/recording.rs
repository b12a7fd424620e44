//! In-memory sink

use super::{DeliveryError, NotificationSink};
use agora_application::Notification;
use std::sync::{Arc, Mutex};

/// Keeps every delivered notification; clones share the same buffer
#[derive(Clone, Default)]
pub struct RecordingSink {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain what was delivered so far
    pub fn take(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut seen| std::mem::take(&mut *seen))
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
        Ok(())
    }
}
