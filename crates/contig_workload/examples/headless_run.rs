//! # Headless Demo Driver
//!
//! The excluded display layer, shown once as example code:
//!
//! ```text
//! 1. A producer thread feeds the demo workload through the OperationBus
//! 2. The main thread owns the engine and replays operations in FIFO order
//! 3. After every step a fresh snapshot is published for reader threads
//! 4. At the end the peak unit grid and the final totals are printed
//! ```
//!
//! Run with: `cargo run --package contig_workload --example headless_run`

use std::thread;

use contig_core::{MemoryManager, SharedSnapshot, StrategyKind, UnitOwners};
use contig_workload::{Operation, OperationBus, Workload};

/// Renders the unit grid as one character per unit: `.` for free space,
/// `A`/`B`/`C`/... for the first-seen owner index.
fn grid_line(grid: &UnitOwners) -> String {
    grid.cells
        .iter()
        .map(|cell| match cell {
            None => '.',
            Some(slot) => char::from(b'A' + u8::try_from(slot % 26).unwrap_or(0)),
        })
        .collect()
}

fn main() {
    let kind = StrategyKind::FirstFit;
    let mut manager = MemoryManager::new(kind.strategy());
    let shared = SharedSnapshot::new(manager.snapshot());
    let reader = shared.reader();

    let (sender, receiver) = OperationBus::create_pair(64);

    // Producer thread: submits the scripted demo sequence.
    let producer = thread::spawn(move || {
        for op in Workload::demo() {
            assert!(sender.send_blocking(op));
        }
    });
    producer.join().expect("producer thread panicked");

    println!("═══════════════════════════════════════════════════════════════");
    println!("   CONTIG - headless demo ({kind}, 128KB in 2KB units)");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    // Engine-owner loop: replay in FIFO order, publish after every step.
    let mut peak_used = 0;
    let mut peak_grid = manager.snapshot_unit_owners();
    for op in receiver.drain() {
        let outcome = match &op {
            Operation::Allocate { pid, size_kb } => {
                if manager.allocate(pid.clone(), *size_kb) {
                    "ok".to_owned()
                } else {
                    "NO FIT".to_owned()
                }
            }
            Operation::Release { pid } => format!("{}KB released", manager.release(pid)),
        };
        println!("{:>4}  {:<16} {outcome}", manager.steps(), op.to_string());

        if manager.used_kb() > peak_used {
            peak_used = manager.used_kb();
            peak_grid = manager.snapshot_unit_owners();
        }
        shared.publish(manager.snapshot());
    }

    let last = reader.latest();
    println!();
    println!("peak usage ({peak_used}KB):");
    println!("  {}", grid_line(&peak_grid));
    for (slot, pid) in peak_grid.order.iter().enumerate() {
        println!("  {} = {pid}", char::from(b'A' + u8::try_from(slot % 26).unwrap_or(0)));
    }
    println!();
    println!(
        "final: used={}KB free={}KB blocks={} steps={}",
        last.used_kb,
        last.free_kb,
        last.block_count(),
        last.steps
    );
}
