// 📂 Snapshot Store - Durable feed snapshots
// Reads and writes one feed's keyed stat table as a CSV file.
//
// The read path distinguishes two very different conditions:
//   - the snapshot file does not exist yet  -> SnapshotLoad::Unavailable
//     (normal while the producer is still starting up)
//   - the snapshot file exists but cannot be parsed -> Err(..)
//     (must reach the operator, never silently skipped)

use crate::boxscore::PlayerStatLine;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// FEED SNAPSHOT
// ============================================================================

/// Complete point-in-time capture of all tracked entities for one feed.
///
/// Invariant: player names are unique (enforced at load time).
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Stat lines in file order.
    pub lines: Vec<PlayerStatLine>,

    /// Capture timestamp taken from the first row; `None` for an empty
    /// (header-only) snapshot.
    pub captured_at: Option<DateTime<Utc>>,
}

impl FeedSnapshot {
    pub fn from_lines(lines: Vec<PlayerStatLine>) -> Self {
        let captured_at = lines.first().map(|l| l.timestamp);
        FeedSnapshot { lines, captured_at }
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
}

/// Result of a snapshot read: either a parsed snapshot or "not produced yet".
#[derive(Debug, Clone)]
pub enum SnapshotLoad {
    Ready(FeedSnapshot),
    Unavailable,
}

impl SnapshotLoad {
    pub fn is_ready(&self) -> bool {
        matches!(self, SnapshotLoad::Ready(_))
    }
}

// ============================================================================
// SNAPSHOT STORE
// ============================================================================

/// Read/write access to one feed's snapshot file.
///
/// All paths are explicit constructor arguments - no module-level globals.
pub struct SnapshotStore {
    feed_id: String,
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(feed_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        SnapshotStore {
            feed_id: feed_id.into(),
            path: path.into(),
        }
    }

    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current snapshot.
    ///
    /// Pure read - no side effects. A missing file is `Ok(Unavailable)`;
    /// a file that exists but fails to parse (bad shape, bad numbers,
    /// duplicate player names) is an error naming the feed and path.
    pub fn load(&self) -> Result<SnapshotLoad> {
        if !self.path.exists() {
            return Ok(SnapshotLoad::Unavailable);
        }

        let mut rdr = csv::Reader::from_path(&self.path).with_context(|| {
            format!(
                "Failed to open feed {} snapshot at {}",
                self.feed_id,
                self.path.display()
            )
        })?;

        let mut lines: Vec<PlayerStatLine> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for result in rdr.deserialize() {
            let line: PlayerStatLine = result.with_context(|| {
                format!(
                    "Malformed snapshot for feed {} at {}",
                    self.feed_id,
                    self.path.display()
                )
            })?;

            if !seen.insert(line.player_name.clone()) {
                bail!(
                    "Malformed snapshot for feed {} at {}: duplicate player '{}'",
                    self.feed_id,
                    self.path.display(),
                    line.player_name
                );
            }

            lines.push(line);
        }

        Ok(SnapshotLoad::Ready(FeedSnapshot::from_lines(lines)))
    }

    /// Publish a snapshot of the given stat lines.
    ///
    /// Every row is stamped with one capture timestamp. The file is written
    /// to a sibling temp path and renamed into place, so a concurrent reader
    /// sees either the previous snapshot or the new one - never a torn write.
    pub fn write(&self, lines: &[PlayerStatLine]) -> Result<()> {
        let captured_at = Utc::now();
        let tmp = self.tmp_path();

        {
            let mut wtr = csv::Writer::from_path(&tmp).with_context(|| {
                format!(
                    "Failed to create temp snapshot for feed {} at {}",
                    self.feed_id,
                    tmp.display()
                )
            })?;

            for line in lines {
                let mut stamped = line.clone();
                stamped.timestamp = captured_at;
                wtr.serialize(&stamped).with_context(|| {
                    format!("Failed to serialize snapshot row for feed {}", self.feed_id)
                })?;
            }

            wtr.flush()
                .with_context(|| format!("Failed to flush snapshot for feed {}", self.feed_id))?;
        }

        fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "Failed to publish snapshot for feed {} at {}",
                self.feed_id,
                self.path.display()
            )
        })?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// ============================================================================
// TESTS
// ============================================================================
