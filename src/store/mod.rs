//! Store Module
//!
//! The concurrent key-value table shared by all job workers.
//!
//! ## Responsibilities
//! - Map string keys to string values, one entry per key table-wide
//! - Serialize same-bucket mutations, allow cross-bucket concurrency
//! - Produce whole-table snapshots at a single consistent instant
//!
//! ## Locking Model
//! Single-key operations take only their bucket's lock. Whole-table
//! observation (SHOW, BACKUP) goes through a table-wide gate: mutators hold
//! the gate shared, a snapshot holds it exclusive. The gate is released
//! before a snapshot is serialized or written anywhere.

mod coarse;
mod sharded;

pub use coarse::CoarseStore;
pub use sharded::ShardedStore;

use std::io;

/// Number of buckets: 26 letter buckets plus 10 digit buckets
pub const TABLE_SIZE: usize = 36;

/// A key-value pair held by a bucket chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Bucket assignment from the key's first character.
///
/// The initial is ASCII-lowercased, so `Abc` and `abc` share a bucket while
/// remaining distinct keys. Letters map to `0..=25`, digits to `26..=35`.
/// Any other initial (or an empty key) has no bucket; operations on such
/// keys are misses, never errors.
pub fn bucket_index(key: &str) -> Option<usize> {
    let initial = key.bytes().next()?.to_ascii_lowercase();
    match initial {
        b'a'..=b'z' => Some((initial - b'a') as usize),
        b'0'..=b'9' => Some(26 + (initial - b'0') as usize),
        _ => None,
    }
}

/// Shared interface over the table backends
///
/// Object-safe so the scheduler, interpreters and backup workers can share
/// one `Arc<dyn Store>` handle regardless of the locking strategy behind it.
pub trait Store: Send + Sync {
    /// Insert or replace a pair. A key with no bucket is silently ignored.
    fn write(&self, key: &str, value: &str);

    /// Look up a key, returning an owned copy of its value.
    fn read(&self, key: &str) -> Option<String>;

    /// Remove a key. Returns `false` when the key was not present.
    fn delete(&self, key: &str) -> bool;

    /// Copy out the whole table at one consistent instant.
    ///
    /// Order: bucket index ascending, then chain order within each bucket
    /// (most recently written first). No lock is held after this returns.
    fn snapshot(&self) -> Vec<Entry>;
}

/// Render a snapshot in the dump format used by SHOW and backup files:
/// one `(key, value)` line per entry.
pub fn write_dump<W: io::Write>(writer: &mut W, entries: &[Entry]) -> io::Result<()> {
    for entry in entries {
        writeln!(writer, "({}, {})", entry.key, entry.value)?;
    }
    Ok(())
}
