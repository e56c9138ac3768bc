//! # CONTIG Core Engine
//!
//! Contiguous memory allocation over a fixed-size simulated address space:
//! - Ordered block list partitioning `[0, total)` with no gaps or overlaps
//! - Pluggable placement strategies (first-fit, next-fit, best-fit)
//! - Process-scoped release with coalescing of adjacent free space
//!
//! ## Architecture Rules
//!
//! 1. **Single mutator** - only [`MemoryManager`] ever touches the block list
//! 2. **Failures are values** - no fit and unknown ids are results, not panics
//! 3. **Deterministic** - same workload + same strategy = same block list
//!
//! ## Example
//!
//! ```rust,ignore
//! use contig_core::{FirstFit, MemoryManager, ProcessId};
//!
//! let mut manager = MemoryManager::new(Box::new(FirstFit));
//! assert!(manager.allocate(ProcessId::new("P1"), 10));
//! assert_eq!(manager.release(&ProcessId::new("P1")), 10);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod config;
pub mod engine;
pub mod snapshot;
pub mod strategy;
pub mod sync;

pub use block::{Block, ProcessId};
pub use config::{ConfigError, MemoryConfig};
pub use engine::MemoryManager;
pub use snapshot::{MemorySnapshot, UnitOwners};
pub use strategy::{BestFit, FirstFit, NextFit, PlacementStrategy, StrategyKind};
pub use sync::{SharedSnapshot, SnapshotReader};
