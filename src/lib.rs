// Feed Verification System - Core Library
// Exposes all modules for use in the monitor binary, the simulator binary,
// and tests

pub mod boxscore;
pub mod config;
pub mod dashboard;
pub mod discrepancy_log;
pub mod monitor;
pub mod reconciliation;
pub mod simulator;
pub mod store;

// Re-export commonly used types
pub use boxscore::{BoxScore, PlayerStatLine, StatField};
pub use config::{MonitorConfig, SimulatorConfig};
pub use dashboard::DashboardWriter;
pub use discrepancy_log::DiscrepancyLog;
pub use monitor::{CycleOutcome, Monitor};
pub use reconciliation::{
    DiscrepancyRecord, ReconcileOutput, ReconciliationEngine, UnifiedRow, UnifiedView,
    MISSING_FROM_FEED_B,
};
pub use simulator::{
    default_roster, ErrorInjector, EventJournal, GameEvent, GameEventKind, GameSimulator,
    InjectedError, Team,
};
pub use store::{FeedSnapshot, SnapshotLoad, SnapshotStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
