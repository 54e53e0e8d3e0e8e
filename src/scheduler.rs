//! Scheduler
//!
//! Fans jobs out to a bounded pool of worker threads.
//!
//! ## Responsibilities
//! - Enforce the `max_threads` concurrency bound via a slot pool
//! - Run one interpreter per job over its file-backed source and sink
//! - Abandon a job whose files cannot be opened, leaving the rest alone
//! - Return only after every worker has finished (join-all barrier)
//!
//! Slot acquisition happens before each spawn, so discovery of further
//! jobs backpressures on the pool rather than queueing unbounded threads.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use crate::backup::BackupSubsystem;
use crate::error::{FluxError, Result};
use crate::job::{Interpreter, JobSpec};
use crate::protocol::LineCommandSource;
use crate::slots::SlotPool;
use crate::store::Store;

/// Run every job to completion, at most `max_threads` at a time.
///
/// Backup workers detached by the jobs are *not* awaited here; callers
/// follow up with [`BackupSubsystem::wait_all`] before tearing down.
pub fn run_jobs(
    store: Arc<dyn Store>,
    backups: &BackupSubsystem,
    jobs: &[JobSpec],
    max_threads: usize,
) -> Result<()> {
    let slots = SlotPool::new(max_threads);

    crossbeam::thread::scope(|scope| {
        for job in jobs {
            // Blocks while max_threads workers are running
            let slot = slots.acquire();
            let store = Arc::clone(&store);

            scope.spawn(move |_| {
                let _slot = slot;
                tracing::debug!("Job {} started", job.name);
                match run_one_job(store, backups, job) {
                    Ok(()) => tracing::debug!("Job {} finished", job.name),
                    Err(e) => tracing::error!("Job {} abandoned: {}", job.name, e),
                }
            });
        }
        // Scope exit joins every worker before run_jobs returns
    })
    .map_err(|_| FluxError::Job("a job worker panicked".to_string()))?;

    Ok(())
}

/// Open one job's source and sink and replay its stream
fn run_one_job(
    store: Arc<dyn Store>,
    backups: &BackupSubsystem,
    job: &JobSpec,
) -> Result<()> {
    let mut source = LineCommandSource::open(&job.job_path)?;
    let sink = BufWriter::new(File::create(&job.out_path)?);

    Interpreter::new(store, backups, job, sink).run(&mut source)
}
