use super::data_storage::DataStorage;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use tracing::warn;

pub const SNAPSHOT_FILE_NAME: &str = "today_tasks_snapshot.json";

/// Point-in-time capture of which task ids were in the Today view.
///
/// A single file holds the latest snapshot; saving overwrites it and no
/// history is kept. Nothing ties the stored ids to current task state,
/// so a loaded snapshot can be stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodaySnapshot {
    pub date: String,
    pub task_ids: Vec<String>,
}

impl TodaySnapshot {
    pub fn capture(task_ids: Vec<String>, today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            task_ids,
        }
    }

    /// Persists this snapshot, replacing any prior one.
    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(SNAPSHOT_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer(&file, self)?;
        Ok(())
    }

    /// Loads the most recent snapshot.
    ///
    /// An absent or unparsable file yields `None`; this is a soft-fail
    /// path, never an error.
    pub fn load() -> Option<TodaySnapshot> {
        let path = DataStorage::new().get_path(SNAPSHOT_FILE_NAME).ok()?;
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!("Ignoring unreadable snapshot file: {}", err);
                None
            }
        }
    }
}
