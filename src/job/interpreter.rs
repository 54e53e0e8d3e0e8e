//! Interpreter
//!
//! Replays one job's command stream against the store.
//!
//! ## Responsibilities
//! - Pull commands from a `CommandSource` and dispatch them in stream order
//! - Write READ/DELETE/SHOW/WAIT/HELP results to the job's output sink
//! - Hand BACKUP commands to the backup subsystem, numbering them
//! - Skip malformed commands with a diagnostic, never aborting the job
//!
//! Diagnostics go to the tracing channel, never to the output sink.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::backup::BackupSubsystem;
use crate::error::Result;
use crate::protocol::{Command, CommandSource, USAGE};
use crate::store::{write_dump, Store};

use super::JobSpec;

/// Marker rendered for a READ miss
const READ_MISS: &str = "KVSERROR";

/// Marker rendered for a DELETE miss
const DELETE_MISS: &str = "KVSMISSING";

/// Per-job command loop
pub struct Interpreter<'a, W: Write> {
    store: Arc<dyn Store>,
    backups: &'a BackupSubsystem,
    job: &'a JobSpec,
    sink: W,

    /// Next backup number; consumed on every BACKUP, successful or not
    backup_seq: u32,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(
        store: Arc<dyn Store>,
        backups: &'a BackupSubsystem,
        job: &'a JobSpec,
        sink: W,
    ) -> Self {
        Self {
            store,
            backups,
            job,
            sink,
            backup_seq: 1,
        }
    }

    /// Run the loop until `End`, then flush the sink.
    ///
    /// Only sink I/O errors abort the job; everything else is a
    /// per-command diagnostic.
    pub fn run(mut self, source: &mut dyn CommandSource) -> Result<()> {
        loop {
            match source.next_command() {
                Command::Write { pairs } => self.exec_write(&pairs),
                Command::Read { keys } => self.exec_read(keys)?,
                Command::Delete { keys } => self.exec_delete(&keys)?,
                Command::Show => self.exec_show()?,
                Command::Wait { delay_ms } => self.exec_wait(delay_ms)?,
                Command::Backup => self.exec_backup(),
                Command::Help => self.sink.write_all(USAGE.as_bytes())?,
                Command::Empty => {}
                Command::Invalid => {
                    tracing::warn!("Job {}: invalid command, see HELP for usage", self.job.name);
                }
                Command::End => {
                    self.sink.flush()?;
                    return Ok(());
                }
            }
        }
    }

    /// WRITE: apply pairs in input order, no output
    fn exec_write(&self, pairs: &[(String, String)]) {
        if pairs.is_empty() {
            tracing::warn!("Job {}: WRITE with no pairs, skipped", self.job.name);
            return;
        }
        for (key, value) in pairs {
            self.store.write(key, value);
        }
    }

    /// READ: look up keys in ascending key order, one bracketed result line
    fn exec_read(&mut self, mut keys: Vec<String>) -> Result<()> {
        if keys.is_empty() {
            tracing::warn!("Job {}: READ with no keys, skipped", self.job.name);
            return Ok(());
        }
        keys.sort();

        write!(self.sink, "[")?;
        for key in &keys {
            match self.store.read(key) {
                Some(value) => write!(self.sink, "({},{})", key, value)?,
                None => write!(self.sink, "({},{})", key, READ_MISS)?,
            }
        }
        writeln!(self.sink, "]")?;
        Ok(())
    }

    /// DELETE: remove keys in input order; output only the misses
    fn exec_delete(&mut self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            tracing::warn!("Job {}: DELETE with no keys, skipped", self.job.name);
            return Ok(());
        }

        let mut wrote_any = false;
        for key in keys {
            if !self.store.delete(key) {
                if !wrote_any {
                    write!(self.sink, "[")?;
                    wrote_any = true;
                }
                write!(self.sink, "({},{})", key, DELETE_MISS)?;
            }
        }
        if wrote_any {
            writeln!(self.sink, "]")?;
        }
        Ok(())
    }

    /// SHOW: dump a consistent snapshot of the whole table
    fn exec_show(&mut self) -> Result<()> {
        let entries = self.store.snapshot();
        write_dump(&mut self.sink, &entries)?;
        Ok(())
    }

    /// WAIT: announce, then suspend this worker only
    fn exec_wait(&mut self, delay_ms: u64) -> Result<()> {
        if delay_ms == 0 {
            return Ok(());
        }
        writeln!(self.sink, "Waiting...")?;
        // Flush so the announcement is visible while we sleep
        self.sink.flush()?;
        thread::sleep(Duration::from_millis(delay_ms));
        Ok(())
    }

    /// BACKUP: consume a sequence number, delegate to the backup pool.
    ///
    /// Blocks while every backup slot is taken; once a worker is detached
    /// this job proceeds without waiting for the file to be written.
    fn exec_backup(&mut self) {
        let path = self.job.backup_path(self.backup_seq);
        self.backup_seq += 1;
        self.backups.schedule(Arc::clone(&self.store), path);
    }
}
