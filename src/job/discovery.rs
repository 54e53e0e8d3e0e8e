//! Job discovery
//!
//! Scans a directory for job files.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::JobSpec;

/// Enumerate job files in `dir`.
///
/// A file qualifies when its final `.`-delimited segment equals `suffix`.
/// Results are sorted by path so scheduling order is deterministic
/// regardless of directory iteration order. An unreadable directory is a
/// fatal error; an unreadable directory entry is skipped with a diagnostic.
pub fn discover_jobs(dir: &Path, suffix: &str) -> Result<Vec<JobSpec>> {
    let mut jobs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(suffix) {
            continue;
        }

        match JobSpec::from_job_path(&path) {
            Some(job) => jobs.push(job),
            None => tracing::warn!("Skipping job file with unusable name: {:?}", path),
        }
    }

    jobs.sort_by(|a, b| a.job_path.cmp(&b.job_path));
    Ok(jobs)
}
