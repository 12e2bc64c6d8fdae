//! Neko CLI
//!
//! Command-line interface for queueing downloads on a Neko server and
//! following their progress.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "neko")]
#[command(about = "Neko audio download CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "NEKO_SERVER_URL", default_value = "http://localhost:8982")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_with_wait() {
        let cli = Cli::try_parse_from([
            "neko",
            "--server-url",
            "http://example.com:9000",
            "download",
            "https://example.com/watch?v=abc",
            "--wait",
        ])
        .unwrap();

        assert_eq!(cli.server_url, "http://example.com:9000");
        match cli.command {
            Commands::Download { url, wait } => {
                assert_eq!(url, "https://example.com/watch?v=abc");
                assert!(wait);
            }
            _ => panic!("expected download command"),
        }
    }

    #[test]
    fn test_parse_history_limit() {
        let cli = Cli::try_parse_from(["neko", "history", "--limit", "5"]).unwrap();
        match cli.command {
            Commands::History { limit } => assert_eq!(limit, Some(5)),
            _ => panic!("expected history command"),
        }
    }

    #[test]
    fn test_status_requires_id() {
        assert!(Cli::try_parse_from(["neko", "status"]).is_err());
    }
}
