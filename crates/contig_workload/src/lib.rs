//! # CONTIG Workload
//!
//! Scripted operation queues for driving the allocation engine:
//! - [`Operation`] - the immutable alloc/free value a driver consumes
//! - [`Workload`] - a FIFO queue of operations, plus the demo sequence
//! - [`WorkloadScript`] - TOML script files, validated at load time
//! - [`OperationBus`] - bounded channel feeding the engine-owner thread
//!
//! This crate never mutates engine state itself; it only produces the
//! operations a driver loop replays against [`contig_core::MemoryManager`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod channel;
pub mod operation;
pub mod queue;
pub mod script;

pub use channel::{OperationBus, OperationReceiver, OperationSender};
pub use operation::Operation;
pub use queue::Workload;
pub use script::{ScriptError, WorkloadScript};
