//! Slot Pool
//!
//! Counting concurrency limiter shared by the scheduler and the backup
//! subsystem.
//!
//! Built on a bounded crossbeam channel used as a token bucket: acquiring a
//! slot sends a token (blocking while the channel is full), and the RAII
//! guard receives one token back when dropped. Release happens on every
//! exit path, panics included.

use crossbeam::channel::{bounded, Receiver, Sender};

/// A bounded pool of concurrency slots
pub struct SlotPool {
    tx: Sender<()>,
    rx: Receiver<()>,
    capacity: usize,
}

impl SlotPool {
    /// Create a pool with `capacity` slots. Capacity must be at least 1;
    /// configuration validation rejects zero before a pool is built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "slot pool capacity must be positive");
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Acquire a slot, blocking while all are in use
    pub fn acquire(&self) -> SlotGuard {
        // Cannot disconnect: the pool owns the receiving side
        self.tx
            .send(())
            .expect("slot pool channel disconnected");
        SlotGuard {
            rx: self.rx.clone(),
        }
    }

    /// Slots currently held
    pub fn in_use(&self) -> usize {
        self.rx.len()
    }

    /// Total slots in the pool
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Holds one slot; returns it to the pool on drop
pub struct SlotGuard {
    rx: Receiver<()>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // At least our own token is in the channel, so this never blocks
        let _ = self.rx.recv();
    }
}
