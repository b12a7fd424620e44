//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for scenario reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable summary
    Text,
    /// JSON document
    Json,
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Deliberation engine - proposals, debate quorum and voting")]
#[command(long_about = r#"
Agora carries proposals through presentation, debate, vote and decision.

A proposal is debated until enough members ranked it favourably, then put to
a vote: a plurality vote for a single solution, a Schulze ranked-choice vote
when solutions compete.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./agora.toml           Project-level config
3. ~/.config/agora/config.toml   Global config

Example:
  agora run garden.toml
  agora run garden.toml --output json
  agora serve scheduled.toml
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scenario file against a simulated clock and print the result
    Run {
        /// Scenario TOML file
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay a scenario in real time, then keep sweeping phases until Ctrl-C
    Serve {
        /// Scenario TOML file
        scenario: PathBuf,

        /// Override the configured sweep interval, in seconds
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Validate the configuration and print the effective values
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_json_output() {
        let cli = Cli::parse_from(["agora", "-vv", "run", "garden.toml", "--output", "json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Run { scenario, output }) => {
                assert_eq!(scenario, PathBuf::from("garden.toml"));
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["agora", "serve", "s.toml", "--config", "agora.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("agora.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::Serve { interval: None, .. })
        ));
    }
}
