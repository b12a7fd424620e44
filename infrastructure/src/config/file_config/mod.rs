//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into engine types happens in
//! [`FileConfig::engine_config`].

mod logging;
mod quorum;
mod sweep;
mod voting;

pub use logging::FileLoggingConfig;
pub use quorum::FileQuorumConfig;
pub use sweep::FileSweepConfig;
pub use voting::FileVotingConfig;

use agora_application::EngineConfig;
use agora_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How bad a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value is unusual but the engine can run with it
    Warning,
    /// The engine cannot be built from this configuration
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `quorum.vote_pct`
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field,
            message: message.into(),
        }
    }

    pub(crate) fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", level, self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default quorum policy for new proposals
    pub quorum: FileQuorumConfig,
    /// Vote window settings
    pub voting: FileVotingConfig,
    /// Periodic phase sweep
    pub sweep: FileSweepConfig,
    /// Log and event log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.quorum.validate());
        issues.extend(self.voting.validate());
        issues.extend(self.sweep.validate());
        issues
    }

    /// Whether any issue prevents building the engine
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    /// Engine settings described by this file
    pub fn engine_config(&self) -> Result<EngineConfig, DomainError> {
        Ok(EngineConfig::default()
            .with_default_policy(self.quorum.to_policy()?)
            .with_vote_minutes(self.voting.vote_minutes))
    }
}
