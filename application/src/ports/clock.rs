//! Time source port

use chrono::{DateTime, Utc};

/// Source of the current instant
///
/// Injected so window-elapsed guards can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
