//! Group directory adapters
//!
//! Membership counts and permissions come from an external directory in a
//! real deployment. [`StaticGroupDirectory`] serves both ports from a fixed
//! table, which is what the CLI and tests need.

mod static_directory;

pub use static_directory::{GroupRoster, StaticGroupDirectory};
