//! Backup Subsystem
//!
//! Bounded pool of snapshot workers producing point-in-time dump files.
//!
//! ## Responsibilities
//! - Enforce the `max_backups` concurrency bound via a slot pool
//! - Capture a consistent snapshot and write it in the SHOW format
//! - Release the slot on every exit path, write failures included
//! - Join all outstanding workers before process shutdown
//!
//! The slot is acquired in the issuing interpreter's thread, so a full
//! pool backpressures the job that asked. The snapshot itself is taken in
//! the detached worker, and the store's gate is already released by the
//! time any file I/O starts: the worker serializes an owned copy.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::error::Result;
use crate::slots::SlotPool;
use crate::store::{write_dump, Store};

/// Bounded pool of detached snapshot workers
pub struct BackupSubsystem {
    slots: SlotPool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl BackupSubsystem {
    /// Create a subsystem allowing `max_backups` concurrent workers
    pub fn new(max_backups: usize) -> Self {
        Self {
            slots: SlotPool::new(max_backups),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Schedule one backup of the store into `path`.
    ///
    /// Blocks until a backup slot frees up, then detaches a worker and
    /// returns. A failed backup is reported and otherwise forgotten; its
    /// slot is released regardless.
    pub fn schedule(&self, store: Arc<dyn Store>, path: PathBuf) {
        let slot = self.slots.acquire();

        let handle = thread::spawn(move || {
            let _slot = slot;
            match write_backup(store.as_ref(), &path) {
                Ok(count) => {
                    tracing::debug!("Backup written: {:?} ({} entries)", path, count);
                }
                Err(e) => {
                    tracing::error!("Backup failed for {:?}: {}", path, e);
                }
            }
        });

        self.workers.lock().push(handle);
    }

    /// Join every outstanding backup worker.
    ///
    /// Called once after the scheduler's own join-all barrier; until this
    /// returns the store must stay alive.
    pub fn wait_all(&self) {
        let handles = std::mem::take(&mut *self.workers.lock());
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("A backup worker panicked");
            }
        }
    }

    /// Backup workers currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.slots.in_use()
    }
}

/// Snapshot the store and write the dump; returns the entry count
fn write_backup(store: &dyn Store, path: &Path) -> Result<usize> {
    let entries = store.snapshot();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_dump(&mut writer, &entries)?;
    writer.flush()?;

    Ok(entries.len())
}
