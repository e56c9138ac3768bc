//! # Workload Queue
//!
//! An ordered queue of operations consumed one at a time by a driver loop.
//! The only contract is FIFO: operations come out in the order they went in.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::operation::Operation;

/// Seed of the demonstration workload. Fixed so every run replays the same
/// sequence on every platform.
const DEMO_SEED: u64 = 42;

/// A FIFO queue of operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workload {
    /// Pending operations, front is next.
    ops: VecDeque<Operation>,
}

impl Workload {
    /// Creates an empty workload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation to the back of the queue.
    pub fn push(&mut self, op: Operation) {
        self.ops.push_back(op);
    }

    /// Removes and returns the next operation, or `None` when drained.
    pub fn poll(&mut self) -> Option<Operation> {
        self.ops.pop_front()
    }

    /// Peeks at the next operation without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&Operation> {
        self.ops.front()
    }

    /// Number of pending operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Discards all pending operations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Builds the demonstration workload.
    ///
    /// Ten processes allocate 4-24 KiB (multiples of 4); every third step
    /// releases the process from two steps back; afterwards every process
    /// releases. Seeded, so the sequence is identical on every run.
    #[must_use]
    pub fn demo() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(DEMO_SEED);
        let mut workload = Self::new();
        for i in 1..=10u32 {
            let size_kb = rng.gen_range(1..=6) * 4;
            workload.push(Operation::alloc(format!("P{i}"), size_kb));
            if i % 3 == 0 {
                let victim = i - 2;
                workload.push(Operation::release(format!("P{victim}")));
            }
        }
        for i in 1..=10u32 {
            workload.push(Operation::release(format!("P{i}")));
        }
        workload
    }
}

impl FromIterator<Operation> for Workload {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<Operation> for Workload {
    fn extend<I: IntoIterator<Item = Operation>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl IntoIterator for Workload {
    type Item = Operation;
    type IntoIter = std::collections::vec_deque::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut workload = Workload::new();
        workload.push(Operation::alloc("P1", 10));
        workload.push(Operation::alloc("P2", 20));
        workload.push(Operation::release("P1"));

        assert_eq!(workload.len(), 3);
        assert_eq!(workload.peek(), Some(&Operation::alloc("P1", 10)));
        assert_eq!(workload.poll(), Some(Operation::alloc("P1", 10)));
        assert_eq!(workload.poll(), Some(Operation::alloc("P2", 20)));
        assert_eq!(workload.poll(), Some(Operation::release("P1")));
        assert_eq!(workload.poll(), None);
        assert!(workload.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut workload = Workload::from_iter([Operation::alloc("P1", 10)]);
        workload.clear();
        assert!(workload.is_empty());
    }

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(Workload::demo(), Workload::demo());
    }

    #[test]
    fn test_demo_shape() {
        let ops: Vec<Operation> = Workload::demo().into_iter().collect();
        // Ten allocations, three interleaved releases, ten final releases.
        assert_eq!(ops.len(), 23);

        let allocs = ops
            .iter()
            .filter(|op| matches!(op, Operation::Allocate { .. }))
            .count();
        assert_eq!(allocs, 10);

        // Every allocation size is a multiple of 4 within 4..=24.
        for op in &ops {
            if let Operation::Allocate { size_kb, .. } = op {
                assert!(*size_kb >= 4 && *size_kb <= 24);
                assert_eq!(size_kb % 4, 0);
            }
        }

        // The tail releases P1..P10 in order.
        for (i, op) in ops[13..].iter().enumerate() {
            assert_eq!(*op, Operation::release(format!("P{}", i + 1)));
        }
    }
}
