// Session report - end-of-run summary written as JSON

use crate::core::performance_monitor::{MetricStats, PerformanceSummary};
use crate::models::gesture::{GestureResult, GestureType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub performance: PerformanceSummary,
    /// Per-stage timing spread (avg/min/max/latest)
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricStats>,
    pub gesture_counts: BTreeMap<GestureType, u64>,
    pub volume_changes: u64,
    pub actuator_failures: u64,
}

impl SessionReport {
    /// Write `session_YYYYMMDD_HHMMSS.json` into `dir`, returning its path
    pub fn save_to(&self, dir: &Path) -> GestureResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let mut path = dir.to_path_buf();
        path.push(format!(
            "session_{}.json",
            self.finished_at.format("%Y%m%d_%H%M%S")
        ));

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!("Session report saved to {}", path.display());
        Ok(path)
    }
}

/// Delete `session_*.json` reports older than `days_to_keep`, returning how many went
pub fn prune_reports(dir: &Path, days_to_keep: u32) -> GestureResult<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(u64::from(days_to_keep) * 86_400);
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("session_") || !name.ends_with(".json") {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age <= max_age {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                info!("Deleted old report: {}", name);
                removed += 1;
            }
            Err(e) => warn!("Failed to delete report {}: {}", name, e),
        }
    }

    Ok(removed)
}
