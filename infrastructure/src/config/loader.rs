//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["agora.toml", ".agora.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AGORA_` environment variables (`AGORA_QUORUM__VOTE_PCT=20`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agora.toml` or `./.agora.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/agora/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("AGORA_").split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agora").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Config file locations, in priority order, with whether each exists
    pub fn config_sources(config_path: Option<&Path>) -> Vec<(&'static str, PathBuf, bool)> {
        let mut sources = Vec::new();
        if let Some(path) = config_path {
            sources.push(("Explicit", path.to_path_buf(), path.exists()));
        }
        match Self::project_config_path() {
            Some(path) => sources.push(("Project", path, true)),
            None => sources.push(("Project", PathBuf::from(PROJECT_FILES[0]), false)),
        }
        if let Some(path) = Self::global_config_path() {
            let exists = path.exists();
            sources.push(("Global", path, exists));
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.quorum.participation_pct, 10);
        assert_eq!(config.sweep.interval_secs, 60);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.ends_with("agora/config.toml"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[quorum]\nvote_pct = 30\n\n[sweep]\ninterval_secs = 5").unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();

        assert_eq!(config.quorum.vote_pct, 30);
        assert_eq!(config.quorum.good_score_pct, 50);
        assert_eq!(config.sweep.interval_secs, 5);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[quorum]\nvote_pct = \"lots\"").unwrap();

        assert!(ConfigLoader::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_sources_list_explicit_first() {
        let sources = ConfigLoader::config_sources(Some(Path::new("/nonexistent/agora.toml")));
        assert_eq!(sources[0].0, "Explicit");
        assert!(!sources[0].2);
    }
}
