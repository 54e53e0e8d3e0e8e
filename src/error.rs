//! Error types for FluxKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FluxError
pub type Result<T> = std::result::Result<T, FluxError>;

/// Unified error type for FluxKV operations
#[derive(Debug, Error)]
pub enum FluxError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Job Errors
    // -------------------------------------------------------------------------
    #[error("Job error: {0}")]
    Job(String),

    // -------------------------------------------------------------------------
    // Backup Errors
    // -------------------------------------------------------------------------
    #[error("Backup error: {0}")]
    Backup(String),
}
