//! FluxKV Binary
//!
//! Runs every job file in a directory against one shared store.

use std::sync::Arc;

use clap::Parser;
use fluxkv::job::discover_jobs;
use fluxkv::{BackupSubsystem, Config, ShardedStore, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// FluxKV job runner
#[derive(Parser, Debug)]
#[command(name = "fluxkv")]
#[command(about = "Concurrent key-value store driven by job files")]
#[command(version)]
struct Args {
    /// Directory containing job files
    jobs_dir: String,

    /// Maximum concurrent backup workers
    max_backups: usize,

    /// Maximum concurrent job workers
    max_threads: usize,

    /// Job file suffix (final `.`-delimited segment)
    #[arg(long, default_value = "job")]
    suffix: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fluxkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("FluxKV v{}", fluxkv::VERSION);
    tracing::info!("Jobs directory: {}", args.jobs_dir);

    // Build config from args
    let config = Config::builder()
        .jobs_dir(&args.jobs_dir)
        .job_suffix(&args.suffix)
        .max_threads(args.max_threads)
        .max_backups(args.max_backups)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let jobs = match discover_jobs(&config.jobs_dir, &config.job_suffix) {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::error!("Failed to scan jobs directory: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Discovered {} job(s)", jobs.len());

    let store: Arc<dyn Store> = Arc::new(ShardedStore::new());
    let backups = BackupSubsystem::new(config.max_backups);

    if let Err(e) = fluxkv::run_jobs(Arc::clone(&store), &backups, &jobs, config.max_threads) {
        tracing::error!("Scheduler error: {}", e);
        backups.wait_all();
        std::process::exit(1);
    }

    // Every job is done; now drain the detached backup workers
    backups.wait_all();

    tracing::info!("All jobs and backups finished");
}
