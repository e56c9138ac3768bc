//! # Workload Scripts
//!
//! TOML documents describing a workload, loaded once and validated before
//! anything reaches the engine:
//!
//! ```toml
//! strategy = "best-fit"
//!
//! [[ops]]
//! op = "alloc"
//! pid = "P1"
//! size-kb = 10
//!
//! [[ops]]
//! op = "free"
//! pid = "P1"
//! ```
//!
//! A script that loads successfully replays without further checks.

use serde::Deserialize;
use thiserror::Error;

use contig_core::StrategyKind;

use crate::operation::Operation;
use crate::queue::Workload;

/// Errors produced while loading a workload script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The document is not valid TOML for the script schema.
    #[error("failed to parse workload script: {0}")]
    Parse(#[from] toml::de::Error),

    /// An entry names no process.
    #[error("op {index}: process id must not be empty")]
    EmptyProcessId {
        /// Zero-based position of the offending entry.
        index: usize,
    },

    /// An allocation entry carries no size.
    #[error("op {index}: alloc for {pid} is missing size-kb")]
    MissingSize {
        /// Zero-based position of the offending entry.
        index: usize,
        /// Process id of the offending entry.
        pid: String,
    },

    /// An allocation entry requests zero KiB.
    #[error("op {index}: alloc for {pid} requests zero size")]
    ZeroSize {
        /// Zero-based position of the offending entry.
        index: usize,
        /// Process id of the offending entry.
        pid: String,
    },
}

/// Kind tag of a script entry.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OpKind {
    /// Allocation request.
    Alloc,
    /// Release request.
    Free,
}

/// One entry of the `[[ops]]` array.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OpEntry {
    /// Entry kind: `alloc` or `free`.
    pub op: OpKind,
    /// Process id the entry concerns.
    pub pid: String,
    /// Requested size in KiB. Required for `alloc`, ignored for `free`.
    #[serde(default)]
    pub size_kb: Option<u32>,
}

/// A parsed workload script.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WorkloadScript {
    /// Strategy the driver should select before replaying, if any.
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    /// The operations, in replay order.
    #[serde(default)]
    pub ops: Vec<OpEntry>,
}

impl WorkloadScript {
    /// Parses and validates a script from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] for malformed TOML, empty process ids, and
    /// allocations with a missing or zero size.
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    /// Checks every entry without building a workload.
    ///
    /// # Errors
    ///
    /// Returns the first offending entry's [`ScriptError`].
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, entry) in self.ops.iter().enumerate() {
            if entry.pid.is_empty() {
                return Err(ScriptError::EmptyProcessId { index });
            }
            if entry.op == OpKind::Alloc {
                match entry.size_kb {
                    None => {
                        return Err(ScriptError::MissingSize {
                            index,
                            pid: entry.pid.clone(),
                        })
                    }
                    Some(0) => {
                        return Err(ScriptError::ZeroSize {
                            index,
                            pid: entry.pid.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Builds the FIFO workload this script describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the script was constructed by hand and
    /// never validated.
    pub fn to_workload(&self) -> Result<Workload, ScriptError> {
        self.validate()?;
        Ok(self
            .ops
            .iter()
            .map(|entry| match entry.op {
                // validate() guarantees the size is present and non-zero.
                OpKind::Alloc => Operation::alloc(entry.pid.as_str(), entry.size_kb.unwrap_or(0)),
                OpKind::Free => Operation::release(entry.pid.as_str()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_SCRIPT: &str = r#"
        strategy = "best-fit"

        [[ops]]
        op = "alloc"
        pid = "P1"
        size-kb = 10

        [[ops]]
        op = "alloc"
        pid = "P2"
        size-kb = 5

        [[ops]]
        op = "free"
        pid = "P1"
    "#;

    #[test]
    fn test_parses_full_script() {
        let script = WorkloadScript::from_toml_str(DEMO_SCRIPT).unwrap();
        assert_eq!(script.strategy, Some(StrategyKind::BestFit));

        let ops: Vec<Operation> = script.to_workload().unwrap().into_iter().collect();
        assert_eq!(
            ops,
            vec![
                Operation::alloc("P1", 10),
                Operation::alloc("P2", 5),
                Operation::release("P1"),
            ]
        );
    }

    #[test]
    fn test_strategy_is_optional() {
        let script = WorkloadScript::from_toml_str(
            "[[ops]]\nop = \"free\"\npid = \"P1\"\n",
        )
        .unwrap();
        assert_eq!(script.strategy, None);
        assert_eq!(script.to_workload().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = WorkloadScript::from_toml_str("ops = 3").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let err = WorkloadScript::from_toml_str("strategy = \"worst-fit\"").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_pid() {
        let err = WorkloadScript::from_toml_str(
            "[[ops]]\nop = \"alloc\"\npid = \"\"\nsize-kb = 10",
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::EmptyProcessId { index: 0 }));
    }

    #[test]
    fn test_rejects_alloc_without_size() {
        let err = WorkloadScript::from_toml_str("[[ops]]\nop = \"alloc\"\npid = \"P1\"")
            .unwrap_err();
        assert!(matches!(err, ScriptError::MissingSize { index: 0, .. }));
    }

    #[test]
    fn test_rejects_zero_size_alloc() {
        let err = WorkloadScript::from_toml_str(
            "[[ops]]\nop = \"alloc\"\npid = \"P1\"\nsize-kb = 0",
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::ZeroSize { index: 0, .. }));
    }

    #[test]
    fn test_free_ignores_size() {
        let script = WorkloadScript::from_toml_str(
            "[[ops]]\nop = \"free\"\npid = \"P1\"\nsize-kb = 10",
        )
        .unwrap();
        let ops: Vec<Operation> = script.to_workload().unwrap().into_iter().collect();
        assert_eq!(ops, vec![Operation::release("P1")]);
    }
}
