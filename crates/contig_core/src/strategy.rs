//! # Placement Strategies
//!
//! Given the ordered block list, an aligned request size and the advisory
//! next-fit cursor, a strategy picks the index of the block to carve the
//! allocation from - or reports that nothing fits.
//!
//! Strategies never mutate blocks and hold no state of their own; the
//! next-fit cursor lives in the engine and arrives as an argument. Identical
//! inputs produce identical choices, which is what makes replay and testing
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Selects the block an allocation is carved from.
///
/// `required_kb` is already unit-aligned. Only blocks with
/// `is_free() && size_kb >= required_kb` qualify. `cursor` is advisory and
/// may be stale; implementations must re-validate it against the current
/// list length.
pub trait PlacementStrategy: Send + Sync {
    /// Returns the index of the block to use, or `None` if no block fits.
    fn choose(&self, blocks: &[Block], required_kb: u32, cursor: usize) -> Option<usize>;

    /// Human-readable strategy name for status displays.
    fn name(&self) -> &'static str;
}

/// Returns true if `block` can hold an aligned request of `required_kb`.
#[inline]
fn fits(block: &Block, required_kb: u32) -> bool {
    block.is_free() && block.size_kb >= required_kb
}

/// First-fit: the lowest-address qualifying block wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn choose(&self, blocks: &[Block], required_kb: u32, _cursor: usize) -> Option<usize> {
        blocks.iter().position(|b| fits(b, required_kb))
    }

    fn name(&self) -> &'static str {
        "First Fit"
    }
}

/// Next-fit: first-fit resumed from the most recent allocation.
///
/// Scans the list circularly starting at `cursor % len`, wrapping at most
/// once, so every block is probed at most one time per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NextFit;

impl PlacementStrategy for NextFit {
    fn choose(&self, blocks: &[Block], required_kb: u32, cursor: usize) -> Option<usize> {
        if blocks.is_empty() {
            return None;
        }
        let len = blocks.len();
        // The cursor is a raw index from before any number of splits and
        // merges; reduce it modulo the current length before use.
        let mut index = cursor % len;
        for _ in 0..len {
            if fits(&blocks[index], required_kb) {
                return Some(index);
            }
            index = (index + 1) % len;
        }
        None
    }

    fn name(&self) -> &'static str {
        "Next Fit"
    }
}

/// Best-fit: the smallest qualifying block wins.
///
/// Ties break to the earliest index: a single left-to-right pass replaces
/// the candidate only on strictly smaller size.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn choose(&self, blocks: &[Block], required_kb: u32, _cursor: usize) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, block) in blocks.iter().enumerate() {
            if fits(block, required_kb) && best.map_or(true, |(_, size)| block.size_kb < size) {
                best = Some((index, block.size_kb));
            }
        }
        best.map(|(index, _)| index)
    }

    fn name(&self) -> &'static str {
        "Best Fit"
    }
}

/// The closed set of strategies, as named by scripts and config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Lowest-address qualifying block.
    FirstFit,
    /// First qualifying block at or after the cursor, wrapping once.
    NextFit,
    /// Smallest qualifying block, earliest index on ties.
    BestFit,
}

impl StrategyKind {
    /// Constructs the strategy this kind names.
    #[must_use]
    pub fn strategy(self) -> Box<dyn PlacementStrategy> {
        match self {
            Self::FirstFit => Box::new(FirstFit),
            Self::NextFit => Box::new(NextFit),
            Self::BestFit => Box::new(BestFit),
        }
    }

    /// Human-readable name, matching [`PlacementStrategy::name`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstFit => FirstFit.name(),
            Self::NextFit => NextFit.name(),
            Self::BestFit => BestFit.name(),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
