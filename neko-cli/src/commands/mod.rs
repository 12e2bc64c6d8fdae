//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;

use anyhow::Result;
use clap::Subcommand;
use neko_client::NekoClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Queue a download
    Download {
        /// Media URL to extract audio from
        url: String,

        /// Wait for the download to finish
        #[arg(short, long)]
        wait: bool,
    },
    /// List tracked jobs
    Queue,
    /// Show a job
    Status {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Stop tracking a job
    Cancel {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Show recently finished jobs
    History {
        /// Max entries to show (server default: 20)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the matching handler.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = NekoClient::new(config.server_url.as_str());

    match command {
        Commands::Download { url, wait } => job::download(&client, &url, wait).await,
        Commands::Queue => job::list_queue(&client).await,
        Commands::Status { id } => job::show_status(&client, &id).await,
        Commands::Cancel { id } => job::cancel(&client, &id).await,
        Commands::History { limit } => job::show_history(&client, limit).await,
    }
}
