// 🎲 Event Simulator - Live game feed generation
// Produces a stream of random game events against a fixed roster, plus a
// seedable error injector that perturbs a copy of the ledger to stand in
// for an unreliable second feed. Everything here is fixture scaffolding
// around the reconciliation core - nothing in this module is consulted
// when feeds are compared.

use crate::boxscore::{BoxScore, StatField};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

// ============================================================================
// ROSTER
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<String>,
}

impl Team {
    pub fn new(name: &str, players: &[&str]) -> Self {
        Team {
            name: name.to_string(),
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The demo roster: two teams of five.
pub fn default_roster() -> Vec<Team> {
    vec![
        Team::new(
            "Team A",
            &["Player A1", "Player A2", "Player A3", "Player A4", "Player A5"],
        ),
        Team::new(
            "Team B",
            &["Player B1", "Player B2", "Player B3", "Player B4", "Player B5"],
        ),
    ]
}

// ============================================================================
// GAME EVENTS
// ============================================================================

/// One discrete state-mutating game event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    /// Made shot worth `points`, optionally assisted by a teammate.
    FieldGoal {
        shooter: String,
        points: u32,
        assisted_by: Option<String>,
    },

    /// Missed shot; the rebounder may be on either team.
    MissedShot {
        shooter: String,
        rebounded_by: String,
    },

    /// Standalone assist event, as sent by feeds that only report assists.
    Assist { player: String, shooter: String },
}

impl GameEventKind {
    /// Apply this event's stat changes to a ledger.
    fn apply_to(&self, score: &mut BoxScore) {
        match self {
            GameEventKind::FieldGoal {
                shooter,
                points,
                assisted_by,
            } => {
                score.add_points(shooter, *points);
                if let Some(assister) = assisted_by {
                    score.add_assist(assister);
                }
            }
            GameEventKind::MissedShot { rebounded_by, .. } => {
                score.add_rebound(rebounded_by);
            }
            GameEventKind::Assist { player, .. } => {
                score.add_assist(player);
            }
        }
    }
}

/// A game event with identity and capture time, journaled as one JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: GameEventKind,
}

impl GameEvent {
    pub fn new(kind: GameEventKind) -> Self {
        GameEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Play-by-play line in the live feed's voice.
    pub fn describe(&self) -> String {
        match &self.kind {
            GameEventKind::FieldGoal {
                shooter,
                points,
                assisted_by,
            } => {
                let mut line = format!("Event: {} made a {}-point shot.", shooter, points);
                if let Some(assister) = assisted_by {
                    line.push_str(&format!(" Assist by {}.", assister));
                }
                line
            }
            GameEventKind::MissedShot {
                shooter,
                rebounded_by,
            } => format!(
                "Event: {} missed a shot. Rebound by {}.",
                shooter, rebounded_by
            ),
            GameEventKind::Assist { player, shooter } => {
                format!("Event: {} assists a shot by {}.", player, shooter)
            }
        }
    }
}

// ============================================================================
// GAME SIMULATOR
// ============================================================================

/// Relative weights of the event mix. Assists can also ride along on made
/// shots, so the weights intentionally sum past 1.0 (they are relative,
/// not probabilities).
const EVENT_WEIGHTS: [(EventChoice, f64); 4] = [
    (EventChoice::TwoPointMake, 0.45),
    (EventChoice::ThreePointMake, 0.20),
    (EventChoice::MissWithRebound, 0.30),
    (EventChoice::BareAssist, 0.25),
];

/// Chance a made shot carries an assist.
const ASSIST_ON_MAKE_CHANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum EventChoice {
    TwoPointMake,
    ThreePointMake,
    MissWithRebound,
    BareAssist,
}

/// Random play-by-play generator over a fixed roster.
///
/// Owns the ground-truth ledger: every generated event is applied to it
/// before being returned. Deterministic under `with_seed`.
pub struct GameSimulator {
    teams: Vec<Team>,
    score: BoxScore,
    rng: ChaCha8Rng,
}

impl GameSimulator {
    pub fn new(teams: Vec<Team>) -> Result<Self> {
        Self::build(teams, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(teams: Vec<Team>, seed: u64) -> Result<Self> {
        Self::build(teams, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(teams: Vec<Team>, rng: ChaCha8Rng) -> Result<Self> {
        if teams.is_empty() || teams.iter().any(|t| t.players.is_empty()) {
            bail!("Simulator roster needs at least one player per team");
        }

        let roster: Vec<String> = teams.iter().flat_map(|t| t.players.clone()).collect();

        Ok(GameSimulator {
            teams,
            score: BoxScore::new(&roster),
            rng,
        })
    }

    /// Ground-truth ledger after every event generated so far.
    pub fn score(&self) -> &BoxScore {
        &self.score
    }

    /// Generate the next random event and apply it to the ledger.
    pub fn next_event(&mut self) -> GameEvent {
        let team_idx = self.rng.gen_range(0..self.teams.len());
        let player = self.pick_player(team_idx);

        let kind = match self.sample_choice() {
            EventChoice::TwoPointMake => GameEventKind::FieldGoal {
                assisted_by: self.maybe_assister(team_idx, &player),
                shooter: player,
                points: 2,
            },
            EventChoice::ThreePointMake => GameEventKind::FieldGoal {
                assisted_by: self.maybe_assister(team_idx, &player),
                shooter: player,
                points: 3,
            },
            EventChoice::MissWithRebound => {
                let rebound_team = self.rng.gen_range(0..self.teams.len());
                GameEventKind::MissedShot {
                    shooter: player,
                    rebounded_by: self.pick_player(rebound_team),
                }
            }
            EventChoice::BareAssist => {
                let shooter = self
                    .pick_teammate(team_idx, &player)
                    .unwrap_or_else(|| player.clone());
                GameEventKind::Assist {
                    player,
                    shooter,
                }
            }
        };

        kind.apply_to(&mut self.score);
        GameEvent::new(kind)
    }

    fn sample_choice(&mut self) -> EventChoice {
        let total: f64 = EVENT_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = self.rng.gen_range(0.0..total);
        for (choice, weight) in EVENT_WEIGHTS {
            if roll < weight {
                return choice;
            }
            roll -= weight;
        }
        // Unreachable for positive weights; keep the last arm as the fallback
        EventChoice::BareAssist
    }

    fn pick_player(&mut self, team_idx: usize) -> String {
        let players = &self.teams[team_idx].players;
        players[self.rng.gen_range(0..players.len())].clone()
    }

    /// Random teammate of `player`, or `None` for a one-player team.
    fn pick_teammate(&mut self, team_idx: usize, player: &str) -> Option<String> {
        let teammates: Vec<&String> = self.teams[team_idx]
            .players
            .iter()
            .filter(|p| p.as_str() != player)
            .collect();
        if teammates.is_empty() {
            return None;
        }
        Some(teammates[self.rng.gen_range(0..teammates.len())].clone())
    }

    fn maybe_assister(&mut self, team_idx: usize, shooter: &str) -> Option<String> {
        if self.rng.gen_bool(ASSIST_ON_MAKE_CHANCE) {
            self.pick_teammate(team_idx, shooter)
        } else {
            None
        }
    }
}

// ============================================================================
// ERROR INJECTOR
// ============================================================================

/// What the injector changed, for journaling and operator notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectedError {
    pub player_name: String,
    pub stat: StatField,
    pub delta: i64,
}

impl InjectedError {
    pub fn describe(&self) -> String {
        format!(
            "DISCREPANCY INTRODUCED for {} in {}",
            self.player_name,
            self.stat.wire_name()
        )
    }
}

/// Seedable perturbation source for the unreliable feed.
///
/// With probability `skew_chance`, skews one random player's random stat
/// by ±1 (clamped at zero, matching the ledger's non-negative counters).
/// Lives entirely outside the reconciliation contract - it only exists to
/// manufacture realistic disagreement between the feeds.
pub struct ErrorInjector {
    skew_chance: f64,
    rng: ChaCha8Rng,
}

impl ErrorInjector {
    pub fn new(skew_chance: f64) -> Result<Self> {
        Self::build(skew_chance, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(skew_chance: f64, seed: u64) -> Result<Self> {
        Self::build(skew_chance, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(skew_chance: f64, rng: ChaCha8Rng) -> Result<Self> {
        if !(0.0..=1.0).contains(&skew_chance) {
            bail!("skew_chance must be within [0, 1], got {}", skew_chance);
        }
        Ok(ErrorInjector { skew_chance, rng })
    }

    /// Maybe skew one stat of one player; reports what changed.
    pub fn perturb(&mut self, score: &mut BoxScore) -> Option<InjectedError> {
        if score.is_empty() || !self.rng.gen_bool(self.skew_chance) {
            return None;
        }

        let idx = self.rng.gen_range(0..score.len());
        let player_name = score.lines()[idx].player_name.clone();
        let stat = StatField::ALL[self.rng.gen_range(0..StatField::ALL.len())];
        let delta: i64 = if self.rng.gen_bool(0.5) { 1 } else { -1 };

        score.bump(&player_name, stat, delta);

        Some(InjectedError {
            player_name,
            stat,
            delta,
        })
    }
}

// ============================================================================
// EVENT JOURNAL
// ============================================================================

/// Append-only JSONL ground-truth journal.
///
/// Lets an operator correlate discrepancy alerts with what the simulator
/// actually did - in particular, which errors were deliberately injected.
pub struct EventJournal {
    path: PathBuf,
}

impl EventJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventJournal { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_event(&self, event: &GameEvent) -> Result<()> {
        let line = serde_json::to_string(event).context("Failed to serialize game event")?;
        self.append_line(&line)
    }

    pub fn append_injection(&self, injected: &InjectedError) -> Result<()> {
        let entry = serde_json::json!({
            "event_id": uuid::Uuid::new_v4().to_string(),
            "timestamp": Utc::now(),
            "injected_error": injected,
        });
        self.append_line(&entry.to_string())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| {
                format!("Failed to open event journal at {}", self.path.display())
            })?;
        writeln!(file, "{}", line).context("Failed to append to event journal")?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn stat_tuples(score: &BoxScore) -> Vec<(String, u32, u32, u32)> {
        score
            .lines()
            .iter()
            .map(|l| (l.player_name.clone(), l.points, l.rebounds, l.assists))
            .collect()
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(GameSimulator::new(vec![]).is_err());
        assert!(GameSimulator::new(vec![Team::new("Team A", &[])]).is_err());

        println!("✅ Empty roster test passed");
    }

    #[test]
    fn test_seeded_simulation_is_deterministic() {
        let mut sim1 = GameSimulator::with_seed(default_roster(), 42).unwrap();
        let mut sim2 = GameSimulator::with_seed(default_roster(), 42).unwrap();

        for _ in 0..50 {
            let e1 = sim1.next_event();
            let e2 = sim2.next_event();
            assert_eq!(e1.kind, e2.kind);
        }

        assert_eq!(stat_tuples(sim1.score()), stat_tuples(sim2.score()));

        println!("✅ Seeded determinism test passed");
    }

    #[test]
    fn test_events_match_ledger_totals() {
        let mut sim = GameSimulator::with_seed(default_roster(), 7).unwrap();

        let mut expected_points = 0u32;
        let mut expected_rebounds = 0u32;
        let mut expected_assists = 0u32;

        for _ in 0..100 {
            match sim.next_event().kind {
                GameEventKind::FieldGoal {
                    points,
                    assisted_by,
                    ..
                } => {
                    expected_points += points;
                    if assisted_by.is_some() {
                        expected_assists += 1;
                    }
                }
                GameEventKind::MissedShot { .. } => expected_rebounds += 1,
                GameEventKind::Assist { .. } => expected_assists += 1,
            }
        }

        let score = sim.score();
        let total = |stat: StatField| -> u32 {
            score.lines().iter().map(|l| stat.value_of(l)).sum()
        };

        assert_eq!(total(StatField::Points), expected_points);
        assert_eq!(total(StatField::Rebounds), expected_rebounds);
        assert_eq!(total(StatField::Assists), expected_assists);

        println!("✅ Ledger totals test passed");
    }

    #[test]
    fn test_assister_is_a_teammate_not_the_shooter() {
        let mut sim = GameSimulator::with_seed(default_roster(), 11).unwrap();

        for _ in 0..200 {
            if let GameEventKind::FieldGoal {
                shooter,
                assisted_by: Some(assister),
                ..
            } = sim.next_event().kind
            {
                assert_ne!(shooter, assister);
                // Same team prefix in the demo roster ("Player A…"/"Player B…")
                assert_eq!(shooter.chars().nth(7), assister.chars().nth(7));
            }
        }

        println!("✅ Assister selection test passed");
    }

    #[test]
    fn test_injector_chance_zero_is_inert() {
        let mut injector = ErrorInjector::with_seed(0.0, 1).unwrap();
        let mut score = BoxScore::new(&["Player A1"]);

        for _ in 0..100 {
            assert!(injector.perturb(&mut score).is_none());
        }

        println!("✅ Inert injector test passed");
    }

    #[test]
    fn test_injector_chance_one_always_perturbs() {
        let mut injector = ErrorInjector::with_seed(1.0, 2).unwrap();
        let mut score = BoxScore::new(&["Player A1", "Player A2"]);

        let injected = injector.perturb(&mut score).unwrap();
        assert!(injected.delta == 1 || injected.delta == -1);
        assert!(score.get(&injected.player_name).is_some());

        println!("✅ Always-perturb test passed");
    }

    #[test]
    fn test_injector_clamps_at_zero() {
        let mut injector = ErrorInjector::with_seed(1.0, 3).unwrap();
        let mut score = BoxScore::new(&["Player A1"]);

        // Shadow model with the same clamping semantics; counters start at
        // zero, so negative skews must clamp instead of going negative
        let mut expected = [0i64; 3];
        for _ in 0..200 {
            if let Some(injected) = injector.perturb(&mut score) {
                let slot = StatField::ALL
                    .iter()
                    .position(|s| *s == injected.stat)
                    .unwrap();
                expected[slot] = (expected[slot] + injected.delta).max(0);
            }
        }

        let line = score.get("Player A1").unwrap();
        assert_eq!(line.points as i64, expected[0]);
        assert_eq!(line.rebounds as i64, expected[1]);
        assert_eq!(line.assists as i64, expected[2]);

        println!("✅ Clamp test passed");
    }

    #[test]
    fn test_injector_rejects_bad_chance() {
        assert!(ErrorInjector::new(1.5).is_err());
        assert!(ErrorInjector::new(-0.1).is_err());

        println!("✅ Chance validation test passed");
    }

    #[test]
    fn test_journal_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let journal = EventJournal::new(dir.path().join("game_events.jsonl"));

        let event = GameEvent::new(GameEventKind::MissedShot {
            shooter: "Player A1".to_string(),
            rebounded_by: "Player B2".to_string(),
        });
        journal.append_event(&event).unwrap();
        journal
            .append_injection(&InjectedError {
                player_name: "Player B2".to_string(),
                stat: StatField::Rebounds,
                delta: 1,
            })
            .unwrap();

        let contents = fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "missed_shot");
        assert_eq!(first["rebounded_by"], "Player B2");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["injected_error"]["stat"], "rebounds");
        assert_eq!(second["injected_error"]["delta"], 1);

        println!("✅ Journal test passed");
    }

    #[test]
    fn test_describe_lines() {
        let make = GameEvent::new(GameEventKind::FieldGoal {
            shooter: "Player A1".to_string(),
            points: 3,
            assisted_by: Some("Player A4".to_string()),
        });
        assert_eq!(
            make.describe(),
            "Event: Player A1 made a 3-point shot. Assist by Player A4."
        );

        let miss = GameEvent::new(GameEventKind::MissedShot {
            shooter: "Player B1".to_string(),
            rebounded_by: "Player A2".to_string(),
        });
        assert_eq!(
            miss.describe(),
            "Event: Player B1 missed a shot. Rebound by Player A2."
        );

        println!("✅ Describe test passed");
    }
}
