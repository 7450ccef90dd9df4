use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "completed" => TaskStatus::Completed,
            "canceled" => TaskStatus::Canceled,
            _ => TaskStatus::Open,
        }
    }
}

/// A task row read from the local task store.
///
/// Whether the task belongs to the Today view is never stored; it is
/// derived from `start`, `start_date` and `today_index` on every read.
#[derive(Debug, Clone, Serialize)]
pub struct TodoTask {
    pub uuid: String,
    pub title: String,
    pub status: TaskStatus,
    pub notes: String,
    pub project_title: Option<String>,
    pub area_title: Option<String>,
    /// Scheduling bucket label: "Today", "Anytime", "Someday", a date, or empty.
    pub start: String,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    /// Manual rank within the Today view, 0 when never ranked.
    pub today_index: i64,
    /// Completion datetime text, set when the task was completed.
    pub stop_date: Option<String>,
    pub tags: Vec<String>,
}

impl TodoTask {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
