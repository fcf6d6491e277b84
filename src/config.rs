// ⚙️ Configuration - explicit, constructor-injected settings
// Every path and cadence knob lives here and is passed into the components
// that need it. No module-level globals.

use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// MONITOR CONFIG
// ============================================================================

/// Settings for the verification monitor.
///
/// Defaults carry the canonical file names shared with the simulator:
/// `feed_A.csv`, `feed_B.csv`, `live_dashboard_data.csv`,
/// `discrepancy_log.csv`, checked every 2 seconds.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub feed_a_path: PathBuf,
    pub feed_b_path: PathBuf,
    pub dashboard_path: PathBuf,
    pub discrepancy_log_path: PathBuf,

    /// Cadence of the verification loop. Policy only - the reconciliation
    /// contract does not depend on it.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

impl MonitorConfig {
    /// Default file names rooted in a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        MonitorConfig {
            feed_a_path: dir.join("feed_A.csv"),
            feed_b_path: dir.join("feed_B.csv"),
            dashboard_path: dir.join("live_dashboard_data.csv"),
            discrepancy_log_path: dir.join("discrepancy_log.csv"),
            poll_interval: Duration::from_secs(2),
        }
    }
}

// ============================================================================
// SIMULATOR CONFIG
// ============================================================================

/// Settings for the live feed simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub feed_a_path: PathBuf,
    pub feed_b_path: PathBuf,

    /// Ground-truth JSONL journal of generated events and injected errors.
    /// `None` disables journaling.
    pub event_journal_path: Option<PathBuf>,

    /// Total simulated game time.
    pub game_duration: Duration,

    /// Time between game events.
    pub event_interval: Duration,

    /// Feed B publishes later than feed A by a uniform delay in this range.
    pub feed_b_delay_min: Duration,
    pub feed_b_delay_max: Duration,

    /// Chance per event that feed B's copy is handed to the error injector.
    pub feed_b_error_chance: f64,

    /// Chance the injector actually skews a stat once invoked.
    pub skew_chance: f64,

    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

impl SimulatorConfig {
    /// Default file names rooted in a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        SimulatorConfig {
            feed_a_path: dir.join("feed_A.csv"),
            feed_b_path: dir.join("feed_B.csv"),
            event_journal_path: Some(dir.join("game_events.jsonl")),
            game_duration: Duration::from_secs(300),
            event_interval: Duration::from_secs(3),
            feed_b_delay_min: Duration::from_millis(500),
            feed_b_delay_max: Duration::from_millis(2000),
            feed_b_error_chance: 0.4,
            skew_chance: 0.15,
            seed: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_share_feed_file_names() {
        let monitor = MonitorConfig::default();
        let simulator = SimulatorConfig::default();

        assert_eq!(monitor.feed_a_path, simulator.feed_a_path);
        assert_eq!(monitor.feed_b_path, simulator.feed_b_path);

        println!("✅ Shared file name test passed");
    }

    #[test]
    fn test_in_dir_roots_all_paths() {
        let config = MonitorConfig::in_dir(Path::new("/tmp/game7"));

        assert_eq!(config.feed_a_path, Path::new("/tmp/game7/feed_A.csv"));
        assert_eq!(
            config.discrepancy_log_path,
            Path::new("/tmp/game7/discrepancy_log.csv")
        );

        println!("✅ Directory rooting test passed");
    }
}
