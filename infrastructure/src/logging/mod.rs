//! Logging infrastructure: the JSONL event log.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer plugged into the
//! notification delivery path as a [`NotificationSink`](crate::notify::NotificationSink).

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLog;
