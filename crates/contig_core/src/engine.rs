//! # Allocation Engine
//!
//! [`MemoryManager`] owns the ordered block list and everything that mutates
//! it: allocation (with splitting on partial fit), process-scoped release
//! (with coalescing of adjacent free space), reset and strategy swaps.
//!
//! ## Invariants
//!
//! After every public operation:
//! - Blocks partition `[0, total)` in address order, no gaps, no overlaps
//! - No two adjacent blocks are both free
//! - Every block size is a non-zero multiple of the unit
//!
//! Callers outside this type only ever see detached snapshot copies.

use crate::block::{Block, ProcessId};
use crate::config::{ConfigError, MemoryConfig};
use crate::snapshot::{MemorySnapshot, UnitOwners};
use crate::strategy::PlacementStrategy;

/// The allocation engine.
///
/// Single-threaded and synchronous: each call runs to completion, and no
/// partial mutation is ever observable. To display state from another
/// thread, publish [`MemoryManager::snapshot`] through
/// [`crate::sync::SharedSnapshot`] instead of sharing the engine itself.
pub struct MemoryManager {
    /// Address space size and granularity, fixed at construction.
    config: MemoryConfig,
    /// The ordered block list. Covers `[0, total)` at all times.
    blocks: Vec<Block>,
    /// Active placement strategy. Swappable between operations.
    strategy: Box<dyn PlacementStrategy>,
    /// Index of the most recently satisfied allocation. Advisory: list
    /// length changes between calls, strategies reduce it modulo length.
    next_fit_cursor: usize,
    /// Logical clock: bumped on every allocate or release, success or not.
    steps: u64,
}

impl MemoryManager {
    /// Creates an engine over the reference address space (128 KiB in
    /// 2 KiB units) with the given initial strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn PlacementStrategy>) -> Self {
        let mut manager = Self {
            config: MemoryConfig::default(),
            blocks: Vec::new(),
            strategy,
            next_fit_cursor: 0,
            steps: 0,
        };
        manager.reset();
        manager
    }

    /// Creates an engine over a custom address space.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration does not describe a
    /// whole number of non-zero units.
    pub fn with_config(
        config: MemoryConfig,
        strategy: Box<dyn PlacementStrategy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut manager = Self {
            config,
            blocks: Vec::new(),
            strategy,
            next_fit_cursor: 0,
            steps: 0,
        };
        manager.reset();
        Ok(manager)
    }

    /// Restores the initial state: one free block spanning the whole
    /// address space, cursor and logical clock at zero.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.blocks.push(Block::free(0, self.config.total_kb));
        self.next_fit_cursor = 0;
        self.steps = 0;
        tracing::debug!(total_kb = self.config.total_kb, "memory reset");
    }

    /// Replaces the active strategy. Takes effect on the next allocation;
    /// existing blocks are untouched.
    pub fn set_strategy(&mut self, strategy: Box<dyn PlacementStrategy>) {
        tracing::debug!(strategy = strategy.name(), "strategy changed");
        self.strategy = strategy;
    }

    /// Allocates a contiguous region for `pid`.
    ///
    /// The request is rounded up to the unit, the active strategy picks a
    /// free block, and a partial fit splits that block into an owned part
    /// and a free remainder. Returns `false` - with zero mutation - when no
    /// block fits (or the request rounds to zero). The logical clock ticks
    /// either way.
    pub fn allocate(&mut self, pid: ProcessId, size_kb: u32) -> bool {
        self.steps += 1;
        let required = self.config.align(size_kb);
        if required == 0 {
            return false;
        }
        let Some(index) = self
            .strategy
            .choose(&self.blocks, required, self.next_fit_cursor)
        else {
            tracing::trace!(pid = %pid, required_kb = required, "allocation failed: no fit");
            return false;
        };
        // The engine is the sole authority on mutation: re-validate the
        // chosen block instead of trusting the strategy, and refuse rather
        // than corrupt the list.
        let Some(chosen) = self.blocks.get(index) else {
            return false;
        };
        if !chosen.is_free() || chosen.size_kb < required {
            return false;
        }

        let (start, size) = (chosen.start_kb, chosen.size_kb);
        tracing::trace!(pid = %pid, index, start_kb = start, required_kb = required, "allocated");
        self.blocks[index] = Block::owned(start, required, pid);
        if size > required {
            self.blocks
                .insert(index + 1, Block::free(start + required, size - required));
        }
        self.next_fit_cursor = index;
        debug_assert!(self.is_coherent());
        true
    }

    /// Frees every block owned by `pid` and coalesces adjacent free space.
    ///
    /// Returns the total released KiB; `0` means the id owned nothing,
    /// which is a benign no-op rather than an error. A process that
    /// allocated several times gets all of its blocks back in one call,
    /// but two of its blocks separated by a foreign block stay separate -
    /// only adjacent free space merges.
    pub fn release(&mut self, pid: &ProcessId) -> u32 {
        self.steps += 1;
        let mut released = 0;
        for block in &mut self.blocks {
            if block.is_owned_by(pid) {
                block.owner = None;
                released += block.size_kb;
            }
        }
        if released > 0 {
            self.coalesce();
            tracing::trace!(pid = %pid, released_kb = released, "released");
        }
        debug_assert!(self.is_coherent());
        released
    }

    /// Merges every run of adjacent free blocks into one block.
    ///
    /// Single rebuild pass in address order, so no index arithmetic
    /// survives removals. Restores the no-adjacent-free invariant after
    /// `release` marks blocks free.
    fn coalesce(&mut self) {
        let mut merged: Vec<Block> = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.is_free() && block.is_free() => {
                    prev.size_kb += block.size_kb;
                }
                _ => merged.push(block),
            }
        }
        self.blocks = merged;
    }

    /// Walks the block list and checks the partition invariants.
    ///
    /// True iff blocks cover `[0, total)` in order without gaps or
    /// overlaps, no block is empty or unit-misaligned, and no two adjacent
    /// blocks are both free. The engine debug-asserts this after every
    /// mutation; tests call it directly.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        let mut expected_start = 0;
        let mut previous_free = false;
        for block in &self.blocks {
            if block.start_kb != expected_start
                || block.size_kb == 0
                || block.size_kb % self.config.unit_kb != 0
                || (previous_free && block.is_free())
            {
                return false;
            }
            previous_free = block.is_free();
            expected_start = block.end_kb();
        }
        expected_start == self.config.total_kb
    }

    /// Returns detached copies of the current blocks, in address order.
    #[must_use]
    pub fn snapshot_blocks(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Expands allocated blocks onto the unit grid for display.
    ///
    /// Each cell holds the owner's index in a first-seen ordering of
    /// process ids; free units are `None`. The ordering is stable within
    /// one call only.
    #[must_use]
    pub fn snapshot_unit_owners(&self) -> UnitOwners {
        let mut cells = vec![None; self.config.units() as usize];
        let mut order: Vec<ProcessId> = Vec::new();
        for block in &self.blocks {
            let Some(owner) = &block.owner else { continue };
            let slot = match order.iter().position(|pid| pid == owner) {
                Some(existing) => existing,
                None => {
                    order.push(owner.clone());
                    order.len() - 1
                }
            };
            let first_unit = (block.start_kb / self.config.unit_kb) as usize;
            let unit_count = (block.size_kb / self.config.unit_kb) as usize;
            for cell in cells.iter_mut().skip(first_unit).take(unit_count) {
                *cell = Some(slot);
            }
        }
        UnitOwners { cells, order }
    }

    /// Captures blocks, totals and the logical clock in one detached value.
    #[must_use]
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            blocks: self.blocks.clone(),
            total_kb: self.config.total_kb,
            unit_kb: self.config.unit_kb,
            used_kb: self.used_kb(),
            free_kb: self.free_kb(),
            steps: self.steps,
            strategy: self.strategy.name(),
        }
    }

    /// Sum of allocated block sizes in KiB.
    #[must_use]
    pub fn used_kb(&self) -> u32 {
        self.blocks
            .iter()
            .filter(|block| !block.is_free())
            .map(|block| block.size_kb)
            .sum()
    }

    /// Sum of free block sizes in KiB.
    #[must_use]
    pub fn free_kb(&self) -> u32 {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .map(|block| block.size_kb)
            .sum()
    }

    /// The logical clock: total allocate/release calls since the last reset.
    #[inline]
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// The address space configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> MemoryConfig {
        self.config
    }

    /// Name of the active strategy.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
