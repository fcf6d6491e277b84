// 🏀 Box Score - Entity Ledger
// In-memory stat state for a fixed set of players, mutated by game events
// and periodically persisted as a feed snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PLAYER STAT LINE
// ============================================================================

/// One player's tracked counters at a point in time.
///
/// Field names match the snapshot CSV columns exactly:
/// `player_name, points, rebounds, assists, timestamp`.
/// Counters are `u32` so non-negativity holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_name: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,

    /// Capture time of the snapshot this line belongs to.
    /// Informational only - never used in comparison logic.
    pub timestamp: DateTime<Utc>,
}

impl PlayerStatLine {
    /// Fresh all-zero line for a player.
    pub fn zeroed(player_name: &str) -> Self {
        PlayerStatLine {
            player_name: player_name.to_string(),
            points: 0,
            rebounds: 0,
            assists: 0,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// STAT FIELD
// ============================================================================

/// The three tracked counters, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Points,
    Rebounds,
    Assists,
}

impl StatField {
    /// All fields in the order they are compared per entity.
    pub const ALL: [StatField; 3] = [StatField::Points, StatField::Rebounds, StatField::Assists];

    /// Lowercase wire name, as written to the discrepancy log `stat` column.
    pub fn wire_name(&self) -> &'static str {
        match self {
            StatField::Points => "points",
            StatField::Rebounds => "rebounds",
            StatField::Assists => "assists",
        }
    }

    /// Capitalized name used in human-readable discrepancy details.
    pub fn display_name(&self) -> &'static str {
        match self {
            StatField::Points => "Points",
            StatField::Rebounds => "Rebounds",
            StatField::Assists => "Assists",
        }
    }

    /// Read this field's value out of a stat line.
    pub fn value_of(&self, line: &PlayerStatLine) -> u32 {
        match self {
            StatField::Points => line.points,
            StatField::Rebounds => line.rebounds,
            StatField::Assists => line.assists,
        }
    }
}

// ============================================================================
// BOX SCORE
// ============================================================================

/// Ordered ledger of stat lines with unique player names.
///
/// The order of lines is the roster order, which carries through to every
/// snapshot written from this ledger.
#[derive(Debug, Clone)]
pub struct BoxScore {
    lines: Vec<PlayerStatLine>,
}

impl BoxScore {
    /// Initialize an all-zero box score from a roster.
    /// Duplicate names in the roster are collapsed to one line.
    pub fn new<S: AsRef<str>>(roster: &[S]) -> Self {
        let mut lines: Vec<PlayerStatLine> = Vec::with_capacity(roster.len());
        for name in roster {
            let name = name.as_ref();
            if lines.iter().any(|l| l.player_name == name) {
                continue;
            }
            lines.push(PlayerStatLine::zeroed(name));
        }
        BoxScore { lines }
    }

    pub fn lines(&self) -> &[PlayerStatLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, player_name: &str) -> Option<&PlayerStatLine> {
        self.lines.iter().find(|l| l.player_name == player_name)
    }

    fn get_mut(&mut self, player_name: &str) -> Option<&mut PlayerStatLine> {
        self.lines.iter_mut().find(|l| l.player_name == player_name)
    }

    /// Adjust one stat by a signed delta, saturating at zero.
    ///
    /// Returns the new value, or `None` if the player is not on this ledger.
    pub fn bump(&mut self, player_name: &str, stat: StatField, delta: i64) -> Option<u32> {
        let line = self.get_mut(player_name)?;
        let current = stat.value_of(line) as i64;
        let next = (current + delta).max(0) as u32;
        match stat {
            StatField::Points => line.points = next,
            StatField::Rebounds => line.rebounds = next,
            StatField::Assists => line.assists = next,
        }
        Some(next)
    }

    pub fn add_points(&mut self, player_name: &str, points: u32) -> Option<u32> {
        self.bump(player_name, StatField::Points, points as i64)
    }

    pub fn add_rebound(&mut self, player_name: &str) -> Option<u32> {
        self.bump(player_name, StatField::Rebounds, 1)
    }

    pub fn add_assist(&mut self, player_name: &str) -> Option<u32> {
        self.bump(player_name, StatField::Assists, 1)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_box_score_is_zeroed() {
        let score = BoxScore::new(&["Player A1", "Player A2"]);

        assert_eq!(score.len(), 2);
        for line in score.lines() {
            assert_eq!(line.points, 0);
            assert_eq!(line.rebounds, 0);
            assert_eq!(line.assists, 0);
        }

        println!("✅ Zeroed box score test passed");
    }

    #[test]
    fn test_duplicate_roster_names_collapsed() {
        let score = BoxScore::new(&["Player A1", "Player A1", "Player A2"]);
        assert_eq!(score.len(), 2);

        println!("✅ Duplicate roster names test passed");
    }

    #[test]
    fn test_stat_updates() {
        let mut score = BoxScore::new(&["Player A1", "Player A2"]);

        score.add_points("Player A1", 2);
        score.add_points("Player A1", 3);
        score.add_rebound("Player A2");
        score.add_assist("Player A2");

        assert_eq!(score.get("Player A1").unwrap().points, 5);
        assert_eq!(score.get("Player A2").unwrap().rebounds, 1);
        assert_eq!(score.get("Player A2").unwrap().assists, 1);

        println!("✅ Stat update test passed");
    }

    #[test]
    fn test_bump_saturates_at_zero() {
        let mut score = BoxScore::new(&["Player A1"]);

        score.add_rebound("Player A1");
        let after = score.bump("Player A1", StatField::Rebounds, -5);

        assert_eq!(after, Some(0));
        assert_eq!(score.get("Player A1").unwrap().rebounds, 0);

        println!("✅ Saturating bump test passed");
    }

    #[test]
    fn test_bump_unknown_player() {
        let mut score = BoxScore::new(&["Player A1"]);
        assert_eq!(score.bump("Player X", StatField::Points, 2), None);

        println!("✅ Unknown player test passed");
    }

    #[test]
    fn test_stat_field_order_and_names() {
        assert_eq!(
            StatField::ALL.map(|f| f.wire_name()),
            ["points", "rebounds", "assists"]
        );
        assert_eq!(StatField::Rebounds.display_name(), "Rebounds");

        println!("✅ Stat field naming test passed");
    }
}
