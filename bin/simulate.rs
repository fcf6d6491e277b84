// Feed Simulator binary - generates the two live feeds
// Plays out a random game against the demo roster, publishing feed A after
// every event and a possibly-perturbed, slightly-delayed copy as feed B.
//
// Usage: feed-simulator [DATA_DIR] [SEED]

use anyhow::{bail, Context, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use feed_verification::{
    default_roster, ErrorInjector, EventJournal, GameSimulator, SimulatorConfig, SnapshotStore,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config = match args.get(1) {
        Some(dir) => SimulatorConfig::in_dir(&PathBuf::from(dir)),
        None => SimulatorConfig::default(),
    };
    if let Some(seed) = args.get(2) {
        config.seed = Some(seed.parse().context("SEED must be an unsigned integer")?);
    }

    run(config)
}

fn run(config: SimulatorConfig) -> Result<()> {
    if !(0.0..=1.0).contains(&config.feed_b_error_chance) {
        bail!(
            "feed_b_error_chance must be within [0, 1], got {}",
            config.feed_b_error_chance
        );
    }
    if config.feed_b_delay_max < config.feed_b_delay_min {
        bail!("feed_b_delay_max must not be smaller than feed_b_delay_min");
    }

    println!("--- Starting Live Data Feed Simulation ---");
    println!(
        "Simulating a {}-second game period.",
        config.game_duration.as_secs()
    );
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }

    let store_a = SnapshotStore::new("A", &config.feed_a_path);
    let store_b = SnapshotStore::new("B", &config.feed_b_path);
    let journal = config.event_journal_path.as_ref().map(EventJournal::new);

    // Three independent streams so the event sequence stays reproducible
    // regardless of how often injection and jitter draw from theirs
    let (mut sim, mut injector, mut publish_rng) = match config.seed {
        Some(seed) => (
            GameSimulator::with_seed(default_roster(), seed)?,
            ErrorInjector::with_seed(config.skew_chance, seed.wrapping_add(1))?,
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(2)),
        ),
        None => (
            GameSimulator::new(default_roster())?,
            ErrorInjector::new(config.skew_chance)?,
            ChaCha8Rng::from_entropy(),
        ),
    };

    let start = Instant::now();
    while start.elapsed() < config.game_duration {
        let event = sim.next_event();
        println!("\nSimulating game event... {}", event.describe());
        if let Some(journal) = &journal {
            journal.append_event(&event)?;
        }

        // Feed A is the reliable feed: published first, never perturbed
        store_a.write(sim.score().lines())?;
        println!("  - Feed A updated.");

        // Feed B is delayed and more prone to errors
        let mut feed_b_score = sim.score().clone();
        if publish_rng.gen_bool(config.feed_b_error_chance) {
            if let Some(injected) = injector.perturb(&mut feed_b_score) {
                println!("    -> {}", injected.describe());
                if let Some(journal) = &journal {
                    journal.append_injection(&injected)?;
                }
            }
        }

        let delay_ms = publish_rng.gen_range(
            config.feed_b_delay_min.as_millis() as u64..=config.feed_b_delay_max.as_millis() as u64,
        );
        thread::sleep(Duration::from_millis(delay_ms));

        store_b.write(feed_b_score.lines())?;
        println!("  - Feed B updated.");

        thread::sleep(config.event_interval);
    }

    println!("\n--- Game Simulation Finished ---");
    Ok(())
}
