//! Job command handlers
//!
//! Handles queueing downloads, listing and inspecting jobs, cancelling
//! them and showing the history.

use anyhow::Result;
use colored::*;
use neko_client::NekoClient;
use neko_core::domain::job::{Job, JobStatus};
use std::time::Duration;

use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const WAIT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Queue a download, optionally waiting for it to finish
pub async fn download(client: &NekoClient, url: &str, wait: bool) -> Result<()> {
    let accepted = client.submit_download(url).await?;

    println!("{} {}", "✓".green(), accepted.message);
    println!("  Job ID: {}", accepted.job_id.to_string().cyan());

    if !wait {
        return Ok(());
    }

    println!("{}", "Waiting for download to finish...".dimmed());
    let job = client
        .wait_for_job(accepted.job_id, POLL_INTERVAL, WAIT_TIMEOUT)
        .await?;
    println!();
    print_job_details(client, &job);

    if job.status == JobStatus::Failed {
        anyhow::bail!("Download failed");
    }

    Ok(())
}

/// List all tracked jobs
pub async fn list_queue(client: &NekoClient) -> Result<()> {
    let queue = client.list_queue().await?;

    if queue.queue.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", queue.count).bold());
        println!();
        for job in &queue.queue {
            print_job_summary(job);
        }
    }

    Ok(())
}

/// Get and display a single job
pub async fn show_status(client: &NekoClient, id: &str) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let job = client.get_job(uuid).await?;

    print_job_details(client, &job);

    Ok(())
}

/// Stop tracking a job
pub async fn cancel(client: &NekoClient, id: &str) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let response = client.cancel_job(uuid).await?;

    println!(
        "{} Job {} {}",
        "✓".green(),
        response.job_id.to_string().cyan(),
        response.status
    );

    Ok(())
}

/// Show recently finished jobs, newest first
pub async fn show_history(client: &NekoClient, limit: Option<usize>) -> Result<()> {
    let history = client.history(limit).await?;

    if history.history.is_empty() {
        println!("{}", "History is empty.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Showing {} of {} finished job(s):",
            history.history.len(),
            history.count
        )
        .bold()
    );
    println!();
    for entry in &history.history {
        print_job_summary(entry.job());
    }

    Ok(())
}

/// Print a one-block job summary
fn print_job_summary(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    println!("    URL:      {}", job.source_url);
    println!("    Status:   {} ({}%)", colorize_status(job.status), job.progress);
    if let Some(title) = &job.title {
        println!("    Title:    {}", display_title(title, job.artist.as_deref()));
    }
    println!(
        "    Created:  {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed job information
fn print_job_details(client: &NekoClient, job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:        {}", job.id.to_string().cyan());
    println!("  URL:       {}", job.source_url);
    println!("  Status:    {}", colorize_status(job.status));
    println!("  Progress:  {}%", job.progress);
    println!(
        "  Created:   {}",
        job.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(completed) = job.completed_at {
        println!("  Finished:  {}", completed.format("%Y-%m-%d %H:%M:%S"));
        let seconds = completed.signed_duration_since(job.created_at).num_seconds();
        println!("  Duration:  {}s", seconds);
    }

    if let Some(title) = &job.title {
        println!("  Title:     {}", display_title(title, job.artist.as_deref()));
    }

    if let Some(filename) = &job.filename {
        println!("  File:      {}", filename);
    }

    if let Some(file_url) = &job.file_url {
        println!(
            "  Download:  {}",
            format!("{}{}", client.base_url(), file_url).underline()
        );
    }

    if let Some(error) = &job.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

fn display_title(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) => format!("{} - {}", artist, title),
        None => title.to_string(),
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Downloading => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
