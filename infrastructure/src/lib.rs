//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading and the
//! periodic phase sweeper.

pub mod clock;
pub mod config;
pub mod directory;
pub mod logging;
pub mod notify;
pub mod store;
pub mod sweep;

// Re-export commonly used types
pub use clock::{ManualClock, SystemClock};
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use directory::{GroupRoster, StaticGroupDirectory};
pub use logging::JsonlEventLog;
pub use notify::{ChannelNotifier, DeliveryError, NotificationSink, RecordingSink};
pub use store::InMemoryProposalRepository;
pub use sweep::PhaseSweeper;
