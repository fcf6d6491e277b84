// 🔍 Monitor - Periodic cross-verification cycles
// Wires the two snapshot stores, the reconciliation engine, the discrepancy
// log, and the dashboard writer into a single-threaded loop. Each cycle
// fully completes (load, compare, log, publish) before the next starts.

use crate::config::MonitorConfig;
use crate::dashboard::DashboardWriter;
use crate::discrepancy_log::DiscrepancyLog;
use crate::reconciliation::{ReconcileOutput, ReconciliationEngine};
use crate::store::{SnapshotLoad, SnapshotStore};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

// ============================================================================
// CYCLE OUTCOME
// ============================================================================

/// What one verification cycle did.
///
/// `Waiting` means no comparison ran (an input snapshot is not produced
/// yet); a `Checked` cycle that found nothing reports clean instead.
#[derive(Debug)]
pub enum CycleOutcome {
    /// At least one feed snapshot does not exist yet; nothing was compared,
    /// logged, or published.
    Waiting,

    /// Both feeds were loaded and compared.
    Checked(ReconcileOutput),
}

// ============================================================================
// MONITOR
// ============================================================================

/// The verification monitor.
///
/// Owns the discrepancy log and dashboard outputs exclusively; the feed
/// snapshots are externally-owned inputs it never mutates.
pub struct Monitor {
    store_a: SnapshotStore,
    store_b: SnapshotStore,
    engine: ReconciliationEngine,
    log: DiscrepancyLog,
    dashboard: DashboardWriter,
    poll_interval: Duration,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Monitor {
            store_a: SnapshotStore::new("A", config.feed_a_path),
            store_b: SnapshotStore::new("B", config.feed_b_path),
            engine: ReconciliationEngine::new(),
            log: DiscrepancyLog::new(config.discrepancy_log_path),
            dashboard: DashboardWriter::new(config.dashboard_path),
            poll_interval: config.poll_interval,
        }
    }

    /// Ensure the durable discrepancy log exists (idempotent, never
    /// truncates an existing log).
    pub fn initialize(&self) -> Result<()> {
        self.log.initialize()
    }

    pub fn log(&self) -> &DiscrepancyLog {
        &self.log
    }

    /// Run one verification cycle.
    ///
    /// Order matters: every discrepancy record is durably appended before
    /// the unified view is published. If an append fails the cycle aborts
    /// with an error and the previous dashboard stays in place; the same
    /// discrepancies will be re-detected next cycle.
    ///
    /// A missing input skips the cycle (`Waiting`). A malformed input is an
    /// error for the caller to surface - never silently conflated with
    /// missing.
    pub fn run_cycle(&self) -> Result<CycleOutcome> {
        let feed_a = match self.store_a.load()? {
            SnapshotLoad::Ready(snapshot) => snapshot,
            SnapshotLoad::Unavailable => return Ok(CycleOutcome::Waiting),
        };
        let feed_b = match self.store_b.load()? {
            SnapshotLoad::Ready(snapshot) => snapshot,
            SnapshotLoad::Unavailable => return Ok(CycleOutcome::Waiting),
        };

        let output = self.engine.reconcile(&feed_a, &feed_b);

        for record in &output.records {
            self.log.append(record)?;
        }

        for name in &output.only_in_a {
            println!("  🚨 MISSING PLAYER: '{}' absent from Feed B", name);
        }
        for name in &output.only_in_b {
            println!("  🚨 UNEXPECTED PLAYER: '{}' only present in Feed B", name);
        }

        self.dashboard.write(&output.unified)?;

        Ok(CycleOutcome::Checked(output))
    }

    /// Run cycles on the configured cadence until `stop` is set.
    ///
    /// The stop signal is only observed between cycles; a cycle that has
    /// started always completes. Cycle errors are reported and the loop
    /// carries on - a corrupt snapshot this cycle does not kill monitoring.
    pub fn run(&self, stop: &AtomicBool) -> Result<()> {
        self.initialize()?;

        while !stop.load(Ordering::Relaxed) {
            println!(
                "\nChecking feeds at {}...",
                chrono::Local::now().format("%H:%M:%S")
            );

            match self.run_cycle() {
                Ok(CycleOutcome::Waiting) => {
                    println!("Waiting for data feeds to be generated...");
                }
                Ok(CycleOutcome::Checked(output)) => {
                    if output.is_clean() {
                        println!("Feeds are consistent. No discrepancies found.");
                    } else {
                        println!("⚠️  {}", output.summary());
                    }
                }
                Err(err) => {
                    eprintln!("❌ Verification cycle failed: {:#}", err);
                }
            }

            thread::sleep(self.poll_interval);
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
