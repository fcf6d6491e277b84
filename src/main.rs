use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use feed_verification::{Monitor, MonitorConfig};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Optional data directory argument; defaults to the working directory
    let config = match args.get(1) {
        Some(dir) => MonitorConfig::in_dir(&PathBuf::from(dir)),
        None => MonitorConfig::default(),
    };

    println!("--- Starting Live Data Monitoring and Verification ---");
    println!("Feed A:          {}", config.feed_a_path.display());
    println!("Feed B:          {}", config.feed_b_path.display());
    println!("Dashboard:       {}", config.dashboard_path.display());
    println!("Discrepancy log: {}", config.discrepancy_log_path.display());

    let monitor = Monitor::new(config);

    // Runs until the process is terminated externally; the flag is the seam
    // for an embedding that wants a clean stop between cycles.
    let stop = AtomicBool::new(false);
    monitor.run(&stop).context("Monitor loop failed")?;

    Ok(())
}
