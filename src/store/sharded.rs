//! Sharded store backend
//!
//! Fixed array of bucket chains, one RwLock per bucket, plus a table-wide
//! snapshot gate.
//!
//! ## Concurrency Model
//!
//! - **write/delete**: gate (shared) → target bucket lock (exclusive)
//!   - Mutators never contend on the gate with each other
//!   - Same-bucket mutations serialize on the bucket lock
//! - **read**: target bucket lock (shared) only
//! - **snapshot**: gate (exclusive)
//!   - Excludes every in-flight mutator, so the copy observes one instant
//!   - The gate is dropped when `snapshot` returns; callers do file I/O
//!     on the owned copy only

use parking_lot::RwLock;

use super::{bucket_index, Entry, Store, TABLE_SIZE};

/// Per-bucket locked table with a table-wide snapshot gate
pub struct ShardedStore {
    /// Bucket chains, most recently written entry first
    buckets: [RwLock<Vec<Entry>>; TABLE_SIZE],

    /// Table-wide gate: shared by mutators, exclusive for snapshots
    gate: RwLock<()>,
}

impl ShardedStore {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| RwLock::new(Vec::new())),
            gate: RwLock::new(()),
        }
    }

    /// Number of live entries across all buckets (test/debug accessor)
    pub fn entry_count(&self) -> usize {
        let _gate = self.gate.write();
        self.buckets.iter().map(|b| b.read().len()).sum()
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for ShardedStore {
    fn write(&self, key: &str, value: &str) {
        let Some(index) = bucket_index(key) else {
            tracing::warn!("Ignoring write for unmappable key {:?}", key);
            return;
        };

        let _gate = self.gate.read();
        let mut chain = self.buckets[index].write();

        if let Some(entry) = chain.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_string();
        } else {
            // Prepend: chains stay most-recently-written-first
            chain.insert(
                0,
                Entry {
                    key: key.to_string(),
                    value: value.to_string(),
                },
            );
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        let index = bucket_index(key)?;
        let chain = self.buckets[index].read();
        chain.iter().find(|e| e.key == key).map(|e| e.value.clone())
    }

    fn delete(&self, key: &str) -> bool {
        let Some(index) = bucket_index(key) else {
            return false;
        };

        let _gate = self.gate.read();
        let mut chain = self.buckets[index].write();

        match chain.iter().position(|e| e.key == key) {
            Some(pos) => {
                chain.remove(pos);
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Vec<Entry> {
        // Exclusive gate: no mutator holds its shared side while we copy
        let _gate = self.gate.write();

        let mut entries = Vec::new();
        for bucket in &self.buckets {
            entries.extend(bucket.read().iter().cloned());
        }
        entries
    }
}
