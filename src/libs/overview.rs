//! Consolidated dashboard overview.
//!
//! Composes the weather, local-task, remote-task and calendar adapters
//! into one response. Every adapter call is isolated: a failing source
//! is logged and its section rendered as an empty/default value, so the
//! overview degrades gracefully instead of going dark because one
//! integration is down.

use crate::api::calendar::{Calendar, CalendarEvent};
use crate::api::clickup::{ClickUp, ClickUpConfig, DueWindow, RemoteTask};
use crate::api::weather::{Weather, WeatherSnapshot};
use crate::db::things::ThingsStore;
use crate::libs::config::Config;
use crate::libs::error::{SourceError, SourceResult};
use crate::libs::today::{self, AreaGroup, CompletedDay};
use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use tracing::warn;

/// The consolidated dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub date: String,
    /// `null` when the weather source is down.
    pub weather: Option<WeatherSnapshot>,
    /// Today view from the local task store, empty on failure.
    pub today_tasks: Vec<AreaGroup>,
    /// Yesterday's completed log, `null` when the store is unreachable.
    pub completed_yesterday: Option<CompletedDay>,
    /// Remote tasks due within the aggregation window.
    pub remote_tasks: Vec<RemoteTask>,
    pub high_priority: Vec<RemoteTask>,
    pub attention_needed: Vec<AttentionItem>,
    pub upcoming_meetings: Vec<MeetingSummary>,
    pub productivity: ProductivitySummary,
}

/// A remote task flagged for attention, with the reason it was flagged.
#[derive(Debug, Clone, Serialize)]
pub struct AttentionItem {
    #[serde(flatten)]
    pub task: RemoteTask,
    pub reason: String,
}

/// Calendar events reduced to what the dashboard header shows.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingSummary {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductivitySummary {
    pub completed_yesterday: usize,
    pub planned_today: usize,
}

/// Remote tasks with high or urgent priority.
pub fn high_priority(tasks: &[RemoteTask]) -> Vec<RemoteTask> {
    tasks
        .iter()
        .filter(|task| task.priority == "high" || task.priority == "urgent")
        .cloned()
        .collect()
}

/// Remote tasks that are overdue or blocked.
///
/// The overdue check runs first: a task that is both overdue and
/// blocked reports reason `"overdue"`.
pub fn attention_needed(tasks: &[RemoteTask], now_ms: i64) -> Vec<AttentionItem> {
    tasks
        .iter()
        .filter_map(|task| {
            let reason = if matches!(task.due_date, Some(due) if due < now_ms) {
                "overdue"
            } else if task.status == "blocked" {
                "blocked"
            } else {
                return None;
            };
            Some(AttentionItem {
                task: task.clone(),
                reason: reason.to_string(),
            })
        })
        .collect()
}

/// Simple productivity counts for the dashboard header.
pub fn productivity(completed_yesterday: Option<&CompletedDay>, today_tasks: &[AreaGroup]) -> ProductivitySummary {
    ProductivitySummary {
        // Counts distinct project groups, not tasks
        completed_yesterday: completed_yesterday.map(|day| day.projects.len()).unwrap_or(0),
        planned_today: today::planned_today(today_tasks),
    }
}

pub fn meeting_summaries(events: &[CalendarEvent]) -> Vec<MeetingSummary> {
    events
        .iter()
        .map(|event| MeetingSummary {
            title: event.title.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            attendees: event.attendees.clone(),
        })
        .collect()
}

/// Builds the consolidated overview for `now`.
///
/// Always returns an `Overview`; individual sections degrade to their
/// empty values when the corresponding source fails.
pub async fn build_overview(config: &Config, now: DateTime<Local>) -> Overview {
    let window_start = now - Duration::days(1);
    let window_end = now + Duration::days(1);

    let weather = section("weather", fetch_weather(config, now).await);
    let local = section("tasks", fetch_local(config, now));
    let remote_tasks = section("clickup", fetch_remote(config, window_start, window_end).await).unwrap_or_default();
    let events = section("calendar", fetch_events(config, window_start, window_end).await).unwrap_or_default();

    let (today_tasks, completed_yesterday) = match local {
        Some((today_tasks, completed)) => (today_tasks, Some(completed)),
        None => (Vec::new(), None),
    };

    Overview {
        date: now.format("%Y-%m-%d").to_string(),
        productivity: productivity(completed_yesterday.as_ref(), &today_tasks),
        high_priority: high_priority(&remote_tasks),
        attention_needed: attention_needed(&remote_tasks, now.timestamp_millis()),
        upcoming_meetings: meeting_summaries(&events),
        weather,
        today_tasks,
        completed_yesterday,
        remote_tasks,
    }
}

fn section<T>(name: &str, result: SourceResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Overview section '{}' degraded to default: {}", name, e);
            None
        }
    }
}

async fn fetch_weather(config: &Config, now: DateTime<Local>) -> SourceResult<WeatherSnapshot> {
    let weather_config = config.weather.clone().unwrap_or_default();
    Weather::new(&weather_config).forecast(now.naive_local()).await
}

fn fetch_local(config: &Config, now: DateTime<Local>) -> SourceResult<(Vec<AreaGroup>, CompletedDay)> {
    let things_config = config
        .things
        .as_ref()
        .ok_or_else(|| SourceError::SourceUnavailable("local task store is not configured".to_string()))?;
    let store = ThingsStore::open(things_config)?;
    let today = now.date_naive();

    let todos = store.fetch_todos()?;
    let logbook = store.fetch_logbook()?;

    Ok((today::today_view(&todos, today), today::yesterday_completed(&logbook, today)))
}

async fn fetch_remote(config: &Config, start: DateTime<Local>, end: DateTime<Local>) -> SourceResult<Vec<RemoteTask>> {
    let clickup_config =
        ClickUpConfig::resolve(&config.clickup).ok_or_else(|| SourceError::auth("ClickUp", "API key is missing"))?;
    let client = ClickUp::new(&clickup_config)?;
    client.tasks_in_window(&DueWindow::new(start, end)).await
}

async fn fetch_events(config: &Config, start: DateTime<Local>, end: DateTime<Local>) -> SourceResult<Vec<CalendarEvent>> {
    let calendar_config = config
        .calendar
        .as_ref()
        .ok_or_else(|| SourceError::auth("calendar", "calendar integration is not configured"))?;
    Calendar::new(calendar_config).list_events(start, end).await
}
