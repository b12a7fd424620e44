//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! events_file = "~/.local/share/agora/events.jsonl"
//! directory = "~/.local/state/agora/logs"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving one line per notification
    pub events_file: Option<PathBuf>,
    /// Directory for daily rolling log files; stderr only when unset
    pub directory: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// `events_file` with a leading `~` expanded
    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_file.as_deref().map(expand_home)
    }

    /// `directory` with a leading `~` expanded
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.directory.as_deref().map(expand_home)
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
