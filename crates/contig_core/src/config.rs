//! # Address Space Configuration
//!
//! Total size and alignment unit of the simulated address space.
//! Fixed for the lifetime of an engine - loaded once at construction.

use serde::Deserialize;
use thiserror::Error;

/// Total address space of the reference configuration, in KiB.
pub const DEFAULT_TOTAL_KB: u32 = 128;

/// Addressable unit of the reference configuration, in KiB.
pub const DEFAULT_UNIT_KB: u32 = 2;

/// Errors produced by [`MemoryConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The alignment unit is zero, so no request can be quantized.
    #[error("alignment unit must be non-zero")]
    ZeroUnit,

    /// The address space is empty.
    #[error("total address space must be non-zero")]
    ZeroTotal,

    /// The address space cannot be divided into whole units.
    #[error("total of {total_kb}KB is not a multiple of the {unit_kb}KB unit")]
    UnalignedTotal {
        /// Configured total size in KiB.
        total_kb: u32,
        /// Configured unit size in KiB.
        unit_kb: u32,
    },
}

/// Size and granularity of the simulated address space.
///
/// The defaults are the reference configuration: 128 KiB total, addressed in
/// 2 KiB units (64 units). The address space never changes size at runtime;
/// an engine reads this once at construction.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MemoryConfig {
    /// Total address space in KiB.
    pub total_kb: u32,
    /// Addressable unit in KiB. Every request is rounded up to a multiple.
    pub unit_kb: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            total_kb: DEFAULT_TOTAL_KB,
            unit_kb: DEFAULT_UNIT_KB,
        }
    }
}

impl MemoryConfig {
    /// Creates a configuration with the given sizes.
    ///
    /// # Arguments
    ///
    /// * `total_kb` - Total address space in KiB
    /// * `unit_kb` - Addressable unit in KiB
    #[must_use]
    pub const fn new(total_kb: u32, unit_kb: u32) -> Self {
        Self { total_kb, unit_kb }
    }

    /// Checks the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either size is zero or the total is not
    /// a whole number of units.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_kb == 0 {
            return Err(ConfigError::ZeroUnit);
        }
        if self.total_kb == 0 {
            return Err(ConfigError::ZeroTotal);
        }
        if self.total_kb % self.unit_kb != 0 {
            return Err(ConfigError::UnalignedTotal {
                total_kb: self.total_kb,
                unit_kb: self.unit_kb,
            });
        }
        Ok(())
    }

    /// Returns the number of addressable units.
    #[inline]
    #[must_use]
    pub const fn units(&self) -> u32 {
        self.total_kb / self.unit_kb
    }

    /// Rounds `size_kb` up to the next multiple of the unit.
    ///
    /// Pure and side-effect free. For a valid configuration:
    /// `align(x) >= x`, `align(x) % unit == 0` and `align(x) - x < unit`.
    #[inline]
    #[must_use]
    pub const fn align(&self, size_kb: u32) -> u32 {
        size_kb.div_ceil(self.unit_kb) * self.unit_kb
    }
}
