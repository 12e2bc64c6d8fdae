//! ID resolver module
//!
//! Handles resolution of UUID prefixes to full UUIDs by querying the API.
//! This allows users to specify short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use neko_client::NekoClient;
use neko_core::domain::job::Job;
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve a job ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately.
/// Otherwise, fetches the tracked jobs and finds the one matching the prefix.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_job_id(client: &NekoClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    // If it's already a full UUID, return it
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let queue = client
        .list_queue()
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    match_prefix(&queue.queue, &id_or_prefix.as_str())
}

/// Picks the single job whose id starts with `prefix`
fn match_prefix(jobs: &[Job], prefix: &str) -> Result<Uuid> {
    let prefix = prefix.to_lowercase();

    let matches: Vec<_> = jobs
        .iter()
        .filter(|j| j.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        [job] => Ok(job.id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|j| j.id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> Job {
        Job::new(Uuid::parse_str(id).unwrap(), "https://example.com/a")
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let jobs = vec![
            job("aaaa1111-0000-4000-8000-000000000000"),
            job("bbbb2222-0000-4000-8000-000000000000"),
        ];
        let id = match_prefix(&jobs, "AAAA").unwrap();
        assert_eq!(id, jobs[0].id);
    }

    #[test]
    fn test_missing_and_ambiguous_prefix() {
        let jobs = vec![
            job("abcd1111-0000-4000-8000-000000000000"),
            job("abcd2222-0000-4000-8000-000000000000"),
        ];

        let err = match_prefix(&jobs, "ffff").unwrap_err();
        assert!(err.to_string().contains("No job found"));

        let err = match_prefix(&jobs, "abcd").unwrap_err();
        assert!(err.to_string().contains("Ambiguous prefix"));
    }
}
