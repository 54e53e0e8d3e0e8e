//! Coarse store backend
//!
//! One RwLock over the whole bucket array. Same observable semantics and
//! enumeration order as the sharded backend, with none of its single-key
//! concurrency. Exists to prove the `Store` seam and as a baseline in
//! tests and benchmarks.

use parking_lot::RwLock;

use super::{bucket_index, Entry, Store, TABLE_SIZE};

/// Single-lock table backend
pub struct CoarseStore {
    table: RwLock<[Vec<Entry>; TABLE_SIZE]>,
}

impl CoarseStore {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            table: RwLock::new(std::array::from_fn(|_| Vec::new())),
        }
    }
}

impl Default for CoarseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for CoarseStore {
    fn write(&self, key: &str, value: &str) {
        let Some(index) = bucket_index(key) else {
            tracing::warn!("Ignoring write for unmappable key {:?}", key);
            return;
        };

        let mut table = self.table.write();
        let chain = &mut table[index];

        if let Some(entry) = chain.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_string();
        } else {
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
        let table = self.table.read();
        table[index]
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.clone())
    }

    fn delete(&self, key: &str) -> bool {
        let Some(index) = bucket_index(key) else {
            return false;
        };

        let mut table = self.table.write();
        let chain = &mut table[index];

        match chain.iter().position(|e| e.key == key) {
            Some(pos) => {
                chain.remove(pos);
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Vec<Entry> {
        let table = self.table.read();
        table.iter().flat_map(|chain| chain.iter().cloned()).collect()
    }
}
