//! # Shared Snapshot Cell
//!
//! The engine is single-owner by design: one thread mutates, everyone else
//! reads detached copies. This cell is the hand-off point - the owner thread
//! publishes a fresh [`MemorySnapshot`] after each operation, reader threads
//! clone the latest one out whenever they like. No reader ever holds a
//! reference into live engine state.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::snapshot::MemorySnapshot;

/// Publisher side of the snapshot cell. Held by the engine-owner thread.
pub struct SharedSnapshot {
    /// The latest published snapshot.
    latest: Arc<RwLock<MemorySnapshot>>,
}

impl SharedSnapshot {
    /// Creates a cell seeded with an initial snapshot.
    #[must_use]
    pub fn new(initial: MemorySnapshot) -> Self {
        Self {
            latest: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replaces the published snapshot.
    ///
    /// The write lock is held only for the swap, never across an engine
    /// operation.
    pub fn publish(&self, snapshot: MemorySnapshot) {
        *self.latest.write() = snapshot;
    }

    /// Creates a reader handle (clone freely across threads).
    #[must_use]
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Reader handle onto the snapshot cell.
#[derive(Clone)]
pub struct SnapshotReader {
    /// Shared cell, read side.
    latest: Arc<RwLock<MemorySnapshot>>,
}

impl SnapshotReader {
    /// Clones out the most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> MemorySnapshot {
        self.latest.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ProcessId;
    use crate::engine::MemoryManager;
    use crate::strategy::FirstFit;

    #[test]
    fn test_publish_and_read() {
        let mut manager = MemoryManager::new(Box::new(FirstFit));
        let shared = SharedSnapshot::new(manager.snapshot());
        let reader = shared.reader();
        assert_eq!(reader.latest().used_kb, 0);

        assert!(manager.allocate(ProcessId::new("P1"), 10));
        shared.publish(manager.snapshot());
        assert_eq!(reader.latest().used_kb, 10);
    }

    #[test]
    fn test_reader_sees_updates_from_owner_thread() {
        let mut manager = MemoryManager::new(Box::new(FirstFit));
        let shared = SharedSnapshot::new(manager.snapshot());
        let reader = shared.reader();

        let owner = std::thread::spawn(move || {
            assert!(manager.allocate(ProcessId::new("P1"), 10));
            assert!(manager.allocate(ProcessId::new("P2"), 6));
            shared.publish(manager.snapshot());
        });
        owner.join().expect("owner thread panicked");

        let snapshot = reader.latest();
        assert_eq!(snapshot.used_kb, 16);
        assert_eq!(snapshot.steps, 2);
    }

    #[test]
    fn test_reader_snapshot_is_independent() {
        let mut manager = MemoryManager::new(Box::new(FirstFit));
        let shared = SharedSnapshot::new(manager.snapshot());
        let reader = shared.reader();

        assert!(manager.allocate(ProcessId::new("P1"), 10));
        shared.publish(manager.snapshot());
        let before = reader.latest();

        assert_eq!(manager.release(&ProcessId::new("P1")), 10);
        shared.publish(manager.snapshot());

        // The clone taken earlier is unaffected by later publishes.
        assert_eq!(before.used_kb, 10);
        assert_eq!(reader.latest().used_kb, 0);
    }
}
