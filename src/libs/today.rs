//! Today-view classification and completed-log grouping.
//!
//! This is the decision-heavy part of the local task integration: the
//! task app's scheduling fields are ambiguous (a task can sit in
//! "Anytime" yet be manually pulled into Today), so membership in the
//! Today view has to be derived from several fields on every read.
//!
//! ## Today-membership rule
//!
//! A task belongs to the Today view if and only if:
//!
//! ```text
//! start == "Today"
//!   OR start_date == current local date
//!   OR (start == "Anytime" AND today_index > 0)
//! ```
//!
//! Completed tasks are excluded regardless. Members are sorted ascending
//! by `today_index` (stable under ties) to reproduce the task app's
//! manual ranking, then grouped by area.

use super::task::TodoTask;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Reduced task representation used by the grouped views.
#[derive(Debug, Clone, Serialize)]
pub struct TodayTaskInfo {
    pub title: String,
    pub status: String,
    pub notes: String,
    pub project_title: Option<String>,
    pub today_index: i64,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}

impl TodayTaskInfo {
    fn from_task(task: &TodoTask) -> Self {
        Self {
            title: task.title.clone(),
            status: task.status.as_str().to_string(),
            notes: task.notes.clone(),
            project_title: task.project_title.clone(),
            today_index: task.today_index,
            start_date: task.start_date,
            deadline: task.deadline,
        }
    }
}

/// Tasks grouped under one area (or project, when no area is set).
#[derive(Debug, Clone, Serialize)]
pub struct AreaGroup {
    pub name: String,
    pub tasks: Vec<TodayTaskInfo>,
}

/// Completed-task representation used by the log views.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedTaskInfo {
    pub title: String,
    pub notes: String,
    pub completed_time: String,
    pub tags: Vec<String>,
}

/// Completed tasks grouped under one project (or area).
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGroup {
    pub name: String,
    pub tasks: Vec<CompletedTaskInfo>,
}

/// One calendar day of the completed log.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedDay {
    pub date: String,
    pub total_completed: usize,
    pub projects: Vec<ProjectGroup>,
}

/// Completed tasks from yesterday through today, newest day first.
#[derive(Debug, Clone, Serialize)]
pub struct RecentCompleted {
    pub total_completed: usize,
    pub days: Vec<CompletedDay>,
}

/// One day bucket of the upcoming view.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingDay {
    pub date: NaiveDate,
    pub tasks: Vec<TodayTaskInfo>,
}

/// Applies the Today-membership rule to a single task.
pub fn in_today_view(task: &TodoTask, today: NaiveDate) -> bool {
    if task.is_completed() {
        return false;
    }
    task.start == "Today" || task.start_date == Some(today) || (task.start == "Anytime" && task.today_index > 0)
}

/// Builds the Today view: selects members, restores the manual ranking,
/// and groups by `area_title`, falling back to `project_title`, falling
/// back to the literal label `"No Area"`. Groups appear in order of
/// first appearance.
pub fn today_view(tasks: &[TodoTask], today: NaiveDate) -> Vec<AreaGroup> {
    let mut members: Vec<&TodoTask> = tasks.iter().filter(|task| in_today_view(task, today)).collect();

    // Stable sort keeps the original store order for equal ranks
    members.sort_by_key(|task| task.today_index);

    let mut groups: Vec<AreaGroup> = Vec::new();
    for task in members {
        let name = group_name(task.area_title.as_deref(), task.project_title.as_deref(), "No Area");
        let info = TodayTaskInfo::from_task(task);
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.tasks.push(info),
            None => groups.push(AreaGroup { name, tasks: vec![info] }),
        }
    }

    groups
}

/// Total number of tasks across all Today-view groups.
pub fn planned_today(groups: &[AreaGroup]) -> usize {
    groups.iter().map(|group| group.tasks.len()).sum()
}

/// Selects tasks completed on the calendar day before `today` and groups
/// them by project.
///
/// Matching is by date-prefix on the completion datetime: a task
/// completed at any time during that calendar day qualifies. Groups are
/// sorted alphabetically; within a group, tasks keep log order.
pub fn yesterday_completed(log: &[TodoTask], today: NaiveDate) -> CompletedDay {
    let yesterday = (today - Duration::days(1)).format("%Y-%m-%d").to_string();

    let tasks: Vec<&TodoTask> = log.iter().filter(|task| stop_date_has_prefix(task, &yesterday)).collect();
    let total_completed = tasks.len();

    CompletedDay {
        date: yesterday,
        total_completed,
        projects: project_groups(&tasks),
    }
}

/// Selects tasks completed yesterday through today inclusive, bucketed
/// by completion date with the newest date first.
pub fn recent_completed(log: &[TodoTask], today: NaiveDate) -> RecentCompleted {
    let yesterday = (today - Duration::days(1)).format("%Y-%m-%d").to_string();
    let today_str = today.format("%Y-%m-%d").to_string();

    let recent: Vec<&TodoTask> = log
        .iter()
        .filter(|task| stop_date_has_prefix(task, &yesterday) || stop_date_has_prefix(task, &today_str))
        .collect();
    let total_completed = recent.len();

    // Bucket by the date part of the completion datetime
    let mut buckets: Vec<(String, Vec<&TodoTask>)> = Vec::new();
    for task in recent {
        let date = completion_date(task);
        match buckets.iter_mut().find(|(bucket_date, _)| *bucket_date == date) {
            Some((_, tasks)) => tasks.push(task),
            None => buckets.push((date, vec![task])),
        }
    }
    buckets.sort_by(|(a, _), (b, _)| b.cmp(a)); // newest first

    let days = buckets
        .into_iter()
        .map(|(date, tasks)| CompletedDay {
            date,
            total_completed: tasks.len(),
            projects: project_groups(&tasks),
        })
        .collect();

    RecentCompleted { total_completed, days }
}

/// Builds the upcoming view: open tasks whose start date or deadline
/// falls within the next `days` days (exclusive of today), bucketed by
/// that date ascending.
pub fn upcoming(tasks: &[TodoTask], today: NaiveDate, days: u32) -> Vec<UpcomingDay> {
    let horizon = today + Duration::days(days as i64);
    let in_window = |date: &Option<NaiveDate>| matches!(date, Some(d) if *d > today && *d <= horizon);

    let mut buckets: Vec<UpcomingDay> = Vec::new();
    for task in tasks.iter().filter(|task| !task.is_completed()) {
        let date = if in_window(&task.start_date) {
            task.start_date
        } else if in_window(&task.deadline) {
            task.deadline
        } else {
            None
        };
        let Some(date) = date else { continue };

        let info = TodayTaskInfo::from_task(task);
        match buckets.iter_mut().find(|bucket| bucket.date == date) {
            Some(bucket) => bucket.tasks.push(info),
            None => buckets.push(UpcomingDay { date, tasks: vec![info] }),
        }
    }
    buckets.sort_by_key(|bucket| bucket.date);

    buckets
}

fn group_name(area: Option<&str>, project: Option<&str>, fallback: &str) -> String {
    area.filter(|name| !name.is_empty())
        .or(project.filter(|name| !name.is_empty()))
        .unwrap_or(fallback)
        .to_string()
}

fn stop_date_has_prefix(task: &TodoTask, prefix: &str) -> bool {
    task.stop_date.as_deref().map(|stop| stop.starts_with(prefix)).unwrap_or(false)
}

fn completion_date(task: &TodoTask) -> String {
    task.stop_date
        .as_deref()
        .and_then(|stop| stop.split_whitespace().next())
        .unwrap_or("")
        .to_string()
}

/// Groups completed tasks by `area_title` → `project_title` →
/// `"No Project"`, groups sorted alphabetically by name.
fn project_groups(tasks: &[&TodoTask]) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    for task in tasks {
        let name = group_name(task.area_title.as_deref(), task.project_title.as_deref(), "No Project");
        let info = CompletedTaskInfo {
            title: task.title.clone(),
            notes: task.notes.clone(),
            completed_time: task.stop_date.clone().unwrap_or_default(),
            tags: task.tags.clone(),
        };
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.tasks.push(info),
            None => groups.push(ProjectGroup { name, tasks: vec![info] }),
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));

    groups
}
