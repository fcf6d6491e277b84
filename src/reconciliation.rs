// ⚖️ Reconciliation Engine - Cross-verify two feed snapshots
// Joins feed A and feed B by player, compares the tracked counters with
// exact integer equality, and produces:
//   - one DiscrepancyRecord per mismatched field (delta = B - A, sign kept)
//   - one UnifiedView seeded entirely from feed A, annotated per entity
//
// Feed A is the source of truth for point-in-time values; feed B is only
// diagnosed against it, never substituted into the unified output.

use crate::boxscore::{PlayerStatLine, StatField};
use crate::store::FeedSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// DISCREPANCY RECORD
// ============================================================================

/// Immutable fact: one field of one entity disagreed between the feeds.
///
/// Field names match the discrepancy log CSV columns exactly:
/// `log_timestamp, player_name, stat, feed_a_value, feed_b_value,
/// discrepancy_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancyRecord {
    pub log_timestamp: DateTime<Utc>,
    pub player_name: String,
    pub stat: StatField,
    pub feed_a_value: u32,
    pub feed_b_value: u32,

    /// Signed `feed_b_value - feed_a_value`. Positive means feed B
    /// over-counts relative to feed A, negative means it under-counts.
    pub discrepancy_amount: i64,
}

impl DiscrepancyRecord {
    pub fn new(
        player_name: &str,
        stat: StatField,
        feed_a_value: u32,
        feed_b_value: u32,
        log_timestamp: DateTime<Utc>,
    ) -> Self {
        DiscrepancyRecord {
            log_timestamp,
            player_name: player_name.to_string(),
            stat,
            feed_a_value,
            feed_b_value,
            discrepancy_amount: feed_b_value as i64 - feed_a_value as i64,
        }
    }

    /// Human-readable field summary used in `discrepancy_details`,
    /// e.g. "Rebounds (2 vs 3)".
    pub fn detail(&self) -> String {
        format!(
            "{} ({} vs {})",
            self.stat.display_name(),
            self.feed_a_value,
            self.feed_b_value
        )
    }

    /// Operator-facing alert line printed when the record is logged.
    pub fn alert_line(&self) -> String {
        format!(
            "🚨 DISCREPANCY LOGGED: {} | {} | Feed A: {}, Feed B: {}",
            self.player_name,
            self.stat.wire_name(),
            self.feed_a_value,
            self.feed_b_value
        )
    }
}

// ============================================================================
// UNIFIED VIEW
// ============================================================================

/// Detail text for an entity feed B dropped entirely (join policy below).
pub const MISSING_FROM_FEED_B: &str = "Missing from Feed B";

/// One row of the dashboard projection: all feed A columns plus the two
/// discrepancy annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRow {
    pub player_name: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub timestamp: DateTime<Utc>,
    pub discrepancy_flag: bool,
    pub discrepancy_details: String,
}

impl UnifiedRow {
    fn from_line(line: &PlayerStatLine, discrepancy_details: Vec<String>) -> Self {
        UnifiedRow {
            player_name: line.player_name.clone(),
            points: line.points,
            rebounds: line.rebounds,
            assists: line.assists,
            timestamp: line.timestamp,
            discrepancy_flag: !discrepancy_details.is_empty(),
            discrepancy_details: discrepancy_details.join("; "),
        }
    }
}

/// Materialized, disposable read-model for the dashboard.
///
/// Rebuilt from scratch every successful cycle and fully replaced on disk -
/// it is a projection, not a ledger.
#[derive(Debug, Clone)]
pub struct UnifiedView {
    /// Rows in feed A order.
    pub rows: Vec<UnifiedRow>,
    pub generated_at: DateTime<Utc>,
}

impl UnifiedView {
    pub fn flagged_count(&self) -> usize {
        self.rows.iter().filter(|r| r.discrepancy_flag).count()
    }

    pub fn is_all_clear(&self) -> bool {
        self.flagged_count() == 0
    }
}

// ============================================================================
// RECONCILE OUTPUT
// ============================================================================

/// Everything one reconciliation pass produced.
///
/// Constructing this value means a comparison actually ran ("checked") -
/// a skipped cycle never builds one, so "checked, clean" and "did not
/// check" can never be confused.
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    /// Newly detected discrepancies, in detection order.
    pub records: Vec<DiscrepancyRecord>,

    /// Fresh feed-A-seeded projection (produced even when clean).
    pub unified: UnifiedView,

    /// Number of entities present in both feeds.
    pub matched: usize,

    /// Entities only feed A knows about (flagged in the unified view).
    pub only_in_a: Vec<String>,

    /// Entities only feed B knows about (cannot appear in the A-seeded
    /// view; surfaced to the operator by the monitor).
    pub only_in_b: Vec<String>,
}

impl ReconcileOutput {
    /// Checked and found nothing - no field mismatches and no join gaps.
    pub fn is_clean(&self) -> bool {
        self.records.is_empty() && self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} discrepancies across {} matched players ({} only in A, {} only in B)",
            self.records.len(),
            self.matched,
            self.only_in_a.len(),
            self.only_in_b.len()
        )
    }
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

/// Pure comparison core: (snapshot A, snapshot B) -> ReconcileOutput.
///
/// Both inputs are read-only borrows; the engine owns no state and touches
/// no files. Counters are compared with exact integer equality - there is
/// no tolerance to configure.
///
/// Join policy: entities are joined by `player_name`. A player missing from
/// feed B is itself treated as a discrepancy - the unified view keeps the
/// feed A row, flagged with "Missing from Feed B". A player missing from
/// feed A is reported in `only_in_b` for the operator. Neither case can
/// produce a `DiscrepancyRecord`, because the log schema is stat-level.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine
    }

    pub fn reconcile(&self, feed_a: &FeedSnapshot, feed_b: &FeedSnapshot) -> ReconcileOutput {
        let now = Utc::now();

        let mut records = Vec::new();
        let mut rows = Vec::with_capacity(feed_a.len());
        let mut matched = 0;
        let mut only_in_a = Vec::new();

        for a_line in &feed_a.lines {
            match feed_b.get(&a_line.player_name) {
                Some(b_line) => {
                    matched += 1;
                    let mut details = Vec::new();

                    for stat in StatField::ALL {
                        let value_a = stat.value_of(a_line);
                        let value_b = stat.value_of(b_line);
                        if value_a != value_b {
                            let record = DiscrepancyRecord::new(
                                &a_line.player_name,
                                stat,
                                value_a,
                                value_b,
                                now,
                            );
                            details.push(record.detail());
                            records.push(record);
                        }
                    }

                    rows.push(UnifiedRow::from_line(a_line, details));
                }
                None => {
                    only_in_a.push(a_line.player_name.clone());
                    rows.push(UnifiedRow::from_line(
                        a_line,
                        vec![MISSING_FROM_FEED_B.to_string()],
                    ));
                }
            }
        }

        let a_names: HashSet<&str> = feed_a.lines.iter().map(|l| l.player_name.as_str()).collect();
        let only_in_b: Vec<String> = feed_b
            .lines
            .iter()
            .filter(|l| !a_names.contains(l.player_name.as_str()))
            .map(|l| l.player_name.clone())
            .collect();

        ReconcileOutput {
            records,
            unified: UnifiedView {
                rows,
                generated_at: now,
            },
            matched,
            only_in_a,
            only_in_b,
        }
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
