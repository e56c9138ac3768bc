//! # Block
//!
//! A contiguous extent of the simulated address space, free or owned by
//! exactly one process. Blocks are pure values; the engine owns the only
//! mutable sequence of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a simulated process.
///
/// Opaque to the engine - two ids are either equal or not. Cheap to clone
/// relative to simulation scale (a workload touches tens of processes).
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    /// Creates a process id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProcessId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A contiguous extent of the address space.
///
/// `owner` doubles as the free flag: `None` is free, `Some(pid)` is
/// allocated. The illegal "free but owned" state of a separate boolean
/// cannot be represented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Start address in KiB.
    pub start_kb: u32,
    /// Extent length in KiB.
    pub size_kb: u32,
    /// Owning process, or `None` for free space.
    pub owner: Option<ProcessId>,
}

impl Block {
    /// Creates a free block.
    #[must_use]
    pub const fn free(start_kb: u32, size_kb: u32) -> Self {
        Self {
            start_kb,
            size_kb,
            owner: None,
        }
    }

    /// Creates a block owned by `pid`.
    #[must_use]
    pub const fn owned(start_kb: u32, size_kb: u32, pid: ProcessId) -> Self {
        Self {
            start_kb,
            size_kb,
            owner: Some(pid),
        }
    }

    /// Returns true if the block is free space.
    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns the first address past the block, in KiB.
    #[inline]
    #[must_use]
    pub const fn end_kb(&self) -> u32 {
        self.start_kb + self.size_kb
    }

    /// Returns true if the block is owned by `pid`.
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, pid: &ProcessId) -> bool {
        self.owner.as_ref() == Some(pid)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            None => write!(f, "[FREE start={}KB size={}KB]", self.start_kb, self.size_kb),
            Some(pid) => write!(
                f,
                "[PID {pid} start={}KB size={}KB]",
                self.start_kb, self.size_kb
            ),
        }
    }
}
