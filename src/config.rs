//! Configuration for FluxKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{FluxError, Result};

/// Main configuration for a FluxKV run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Job Configuration
    // -------------------------------------------------------------------------
    /// Directory scanned for job files
    pub jobs_dir: PathBuf,

    /// Final `.`-delimited segment a file must carry to count as a job
    pub job_suffix: String,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Max concurrently running job workers
    pub max_threads: usize,

    /// Max concurrently running backup workers
    pub max_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs_dir: PathBuf::from("./jobs"),
            job_suffix: "job".to_string(),
            max_threads: 4,
            max_backups: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration for fatal mistakes
    ///
    /// Both concurrency bounds must be at least 1; a pool of size zero can
    /// never hand out a slot and would deadlock the first acquirer.
    pub fn validate(&self) -> Result<()> {
        if self.max_threads == 0 {
            return Err(FluxError::Config(
                "max_threads must be a positive integer".to_string(),
            ));
        }
        if self.max_backups == 0 {
            return Err(FluxError::Config(
                "max_backups must be a positive integer".to_string(),
            ));
        }
        if self.job_suffix.is_empty() {
            return Err(FluxError::Config(
                "job_suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory scanned for job files
    pub fn jobs_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.jobs_dir = path.into();
        self
    }

    /// Set the job file suffix (without the leading dot)
    pub fn job_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.job_suffix = suffix.into();
        self
    }

    /// Set the maximum number of concurrent job workers
    pub fn max_threads(mut self, count: usize) -> Self {
        self.config.max_threads = count;
        self
    }

    /// Set the maximum number of concurrent backup workers
    pub fn max_backups(mut self, count: usize) -> Self {
        self.config.max_backups = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
