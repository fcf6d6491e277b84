// 📊 Dashboard Writer - Publish the unified view
// Full replacement each cycle via write-to-temp + atomic rename: a reader
// mid-cycle sees the old view or the new one, never a partial mix.

use crate::reconciliation::UnifiedView;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct DashboardWriter {
    path: PathBuf,
}

impl DashboardWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DashboardWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the dashboard file with this view's rows.
    pub fn write(&self, view: &UnifiedView) -> Result<()> {
        let tmp = self.tmp_path();

        {
            let mut wtr = csv::Writer::from_path(&tmp).with_context(|| {
                format!("Failed to create temp dashboard file at {}", tmp.display())
            })?;

            for row in &view.rows {
                wtr.serialize(row)
                    .context("Failed to serialize dashboard row")?;
            }

            wtr.flush().context("Failed to flush dashboard file")?;
        }

        fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to publish dashboard file at {}", self.path.display())
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
