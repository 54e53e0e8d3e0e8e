//! Job Module
//!
//! A job is one command stream plus its paired output file and backup
//! sequence.
//!
//! ## Responsibilities
//! - Derive a job's output and backup paths from its job file path
//! - Discover job files in a directory
//! - Replay a job's command stream against the store

mod discovery;
mod interpreter;

pub use discovery::discover_jobs;
pub use interpreter::Interpreter;

use std::path::{Path, PathBuf};

/// A discovered job: names and paths, no open handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    /// File stem, used in log lines and backup file names
    pub name: String,

    /// The command stream file
    pub job_path: PathBuf,

    /// The paired output file (job path with its suffix replaced)
    pub out_path: PathBuf,
}

impl JobSpec {
    /// Build a spec from a job file path.
    ///
    /// Returns `None` when the path has no usable file stem.
    pub fn from_job_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        let out_path = path.with_extension("out");
        Some(Self {
            name,
            job_path: path.to_path_buf(),
            out_path,
        })
    }

    /// Path of the `seq`-th backup file: `<stem>-<seq>.bck` next to the job
    pub fn backup_path(&self, seq: u32) -> PathBuf {
        let file_name = format!("{}-{}.bck", self.name, seq);
        match self.job_path.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
