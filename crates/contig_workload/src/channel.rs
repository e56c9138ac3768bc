//! # Operation Bus
//!
//! Bounded FIFO channel between operation producers and the single thread
//! that owns the engine. The engine itself never crosses a thread boundary;
//! only operations flow in and snapshots flow out (see
//! [`contig_core::sync`]). Delivery order is the queue contract: operations
//! arrive in the order they were sent.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::operation::Operation;

/// Channel endpoints for feeding operations to a driver loop.
pub struct OperationBus {
    /// Sender end - held by operation producers.
    sender: Sender<Operation>,
    /// Receiver end - held by the engine-owner loop.
    receiver: Receiver<Operation>,
}

impl OperationBus {
    /// Creates a bus with a bounded capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum operations in flight before sends report full
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> OperationSender {
        OperationSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle for the engine-owner loop.
    #[must_use]
    pub fn receiver(&self) -> OperationReceiver {
        OperationReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender/receiver pair in one call.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (OperationSender, OperationReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for submitting operations.
#[derive(Clone)]
pub struct OperationSender {
    /// Underlying channel sender.
    sender: Sender<Operation>,
}

impl OperationSender {
    /// Submits an operation without blocking.
    ///
    /// Returns `false` if the bus is full or the receiver is gone; the
    /// operation is dropped in either case and the caller decides whether
    /// to retry later.
    #[inline]
    pub fn send(&self, op: Operation) -> bool {
        match self.sender.try_send(op) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }

    /// Submits an operation, blocking while the bus is full.
    ///
    /// Returns `false` only if the receiver is gone.
    #[inline]
    pub fn send_blocking(&self, op: Operation) -> bool {
        self.sender.send(op).is_ok()
    }
}

/// Handle for draining operations in the engine-owner loop.
#[derive(Clone)]
pub struct OperationReceiver {
    /// Underlying channel receiver.
    receiver: Receiver<Operation>,
}

impl OperationReceiver {
    /// Takes all pending operations, in submission order.
    #[inline]
    #[must_use]
    pub fn drain(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(self.receiver.len());
        while let Ok(op) = self.receiver.try_recv() {
            ops.push(op);
        }
        ops
    }

    /// Takes one pending operation, or `None` if the bus is idle.
    #[inline]
    pub fn try_recv(&self) -> Option<Operation> {
        self.receiver.try_recv().ok()
    }

    /// Number of operations waiting on the bus.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if operations are waiting.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_in_fifo_order() {
        let (sender, receiver) = OperationBus::create_pair(16);
        assert!(sender.send(Operation::alloc("P1", 10)));
        assert!(sender.send(Operation::alloc("P2", 20)));
        assert!(sender.send(Operation::release("P1")));

        let ops = receiver.drain();
        assert_eq!(
            ops,
            vec![
                Operation::alloc("P1", 10),
                Operation::alloc("P2", 20),
                Operation::release("P1"),
            ]
        );
        assert!(!receiver.has_pending());
    }

    #[test]
    fn test_full_bus_rejects_without_blocking() {
        let (sender, receiver) = OperationBus::create_pair(2);
        assert!(sender.send(Operation::alloc("P1", 10)));
        assert!(sender.send(Operation::alloc("P2", 10)));
        assert!(!sender.send(Operation::alloc("P3", 10)));
        assert_eq!(receiver.pending_count(), 2);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let bus = OperationBus::new(4);
        let sender = bus.sender();
        drop(bus);
        // The bus' own receiver end is gone and no other exists.
        assert!(!sender.send(Operation::alloc("P1", 10)));
    }

    #[test]
    fn test_cross_thread_feed() {
        let (sender, receiver) = OperationBus::create_pair(64);
        let producer = std::thread::spawn(move || {
            for i in 0..32 {
                assert!(sender.send_blocking(Operation::alloc(format!("P{i}"), 2)));
            }
        });
        producer.join().expect("producer thread panicked");

        let ops = receiver.drain();
        assert_eq!(ops.len(), 32);
        // Submission order survives the thread hop.
        for (i, op) in ops.iter().enumerate() {
            assert_eq!(*op, Operation::alloc(format!("P{i}"), 2));
        }
    }
}
