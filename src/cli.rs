//! Command-line interface definition for Quickchat
//!
//! The binary only starts the web server, so the CLI is a flat set of
//! start-up options that override values from the configuration file.

use clap::Parser;
use std::path::PathBuf;

/// Quickchat - minimal web chat backed by a hosted model
///
/// Serves the chat UI and JSON endpoints, keeping every conversation
/// in a single JSON history file.
#[derive(Parser, Debug, Clone)]
#[command(name = "quickchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path of the chat history JSON file (overrides config)
    #[arg(long)]
    pub history_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            host: None,
            port: None,
            history_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(!cli.json_logs);
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["quickchat"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::try_parse_from([
            "quickchat",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--history-file",
            "/tmp/history.json",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/history.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_invalid_port() {
        let cli = Cli::try_parse_from(["quickchat", "--port", "not-a-port"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_custom_config() {
        let cli = Cli::try_parse_from(["quickchat", "-c", "custom.yaml", "--json-logs"]).unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert!(cli.json_logs);
    }
}
