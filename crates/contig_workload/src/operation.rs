//! # Operation
//!
//! The unit of work a driver replays against the engine: allocate a region
//! for a process, or release everything a process owns. Pure data,
//! immutable once constructed, consumed at most once.

use std::fmt;

use contig_core::ProcessId;

/// One allocate or release request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Request a contiguous region for a process.
    Allocate {
        /// The requesting process.
        pid: ProcessId,
        /// Requested size in KiB, before alignment.
        size_kb: u32,
    },
    /// Return every region the process owns.
    Release {
        /// The releasing process.
        pid: ProcessId,
    },
}

impl Operation {
    /// Creates an allocation request.
    #[must_use]
    pub fn alloc(pid: impl Into<ProcessId>, size_kb: u32) -> Self {
        Self::Allocate {
            pid: pid.into(),
            size_kb,
        }
    }

    /// Creates a release request.
    #[must_use]
    pub fn release(pid: impl Into<ProcessId>) -> Self {
        Self::Release { pid: pid.into() }
    }

    /// The process this operation concerns.
    #[must_use]
    pub fn pid(&self) -> &ProcessId {
        match self {
            Self::Allocate { pid, .. } | Self::Release { pid } => pid,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocate { pid, size_kb } => write!(f, "ALLOC {pid} {size_kb}KB"),
            Self::Release { pid } => write!(f, "FREE {pid}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let alloc = Operation::alloc("P1", 10);
        assert_eq!(
            alloc,
            Operation::Allocate {
                pid: ProcessId::new("P1"),
                size_kb: 10
            }
        );
        assert_eq!(alloc.pid(), &ProcessId::new("P1"));

        let release = Operation::release("P2");
        assert_eq!(release.pid(), &ProcessId::new("P2"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::alloc("P1", 10).to_string(), "ALLOC P1 10KB");
        assert_eq!(Operation::release("P1").to_string(), "FREE P1");
    }
}
