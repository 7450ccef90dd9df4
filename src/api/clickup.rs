//! ClickUp API client for collecting tasks across the workspace hierarchy.
//!
//! Walks workspace → space → folder → list, fetching tasks per list with
//! pagination and a due-date window. A failure in any one branch of the
//! hierarchy degrades to "skip that branch, continue others" rather than
//! aborting the whole call; partial results are always preferred over
//! total failure.
//!
//! Requests are throttled by a rolling one-minute window kept a safety
//! margin below the upstream's documented 100-requests-per-minute limit.

use crate::libs::config::ConfigModule;
use crate::libs::error::{SourceError, SourceResult};
use dialoguer::{theme::ColorfulTheme, Input};
use parking_lot::Mutex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://api.clickup.com/api/v2";

/// Upstream allows 100 requests per minute; stay under it.
const REQUESTS_PER_WINDOW: usize = 95;
const WINDOW: Duration = Duration::from_secs(60);

/// Rolling-window request throttle.
///
/// `acquire` records a timestamp per request and, once `max_requests`
/// have been issued within `window`, sleeps until the oldest request
/// falls out of the window.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    stamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            stamps: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut stamps = self.stamps.lock();
                let now = Instant::now();
                while stamps.front().map(|first| now.duration_since(*first) >= self.window).unwrap_or(false) {
                    stamps.pop_front();
                }
                match stamps.front().copied() {
                    Some(oldest) if stamps.len() >= self.max_requests => {
                        Some(self.window.saturating_sub(now.duration_since(oldest)))
                    }
                    _ => {
                        stamps.push_back(now);
                        None
                    }
                }
            };
            match wait {
                None => return,
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }
}

/// Inclusive due-date window in epoch milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct DueWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DueWindow {
    pub fn new(start: chrono::DateTime<chrono::Local>, end: chrono::DateTime<chrono::Local>) -> Self {
        Self {
            start_ms: start.timestamp_millis(),
            end_ms: end.timestamp_millis(),
        }
    }
}

/// Client-side due-date filter, run as a second pass after the upstream
/// filter: a task is excluded when its due date falls strictly before
/// the window start or strictly after the window end. Tasks without a
/// due date are kept.
pub fn within_window(due_date: Option<i64>, window: &DueWindow) -> bool {
    match due_date {
        Some(due) => due >= window.start_ms && due <= window.end_ms,
        None => true,
    }
}

/// Normalized task pulled out of the workspace hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteTask {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<i64>,
    pub url: String,
    pub workspace_name: String,
    pub space_name: String,
    pub list_name: String,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
}

/// Workspace hierarchy listing for the folders endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceTree {
    pub id: String,
    pub name: String,
    pub spaces: Vec<SpaceTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceTree {
    pub id: String,
    pub name: String,
    pub folders: Vec<FolderTree>,
    /// Lists attached directly to the space, outside any folder.
    pub folderless_lists: Vec<ListInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderTree {
    pub id: String,
    pub name: String,
    pub lists: Vec<ListInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInfo {
    pub id: String,
    pub name: String,
}

/// One due date's worth of tasks in the recent-tasks view.
#[derive(Debug, Clone, Serialize)]
pub struct DueDay {
    pub date: String,
    pub tasks: Vec<RemoteTask>,
}

// Wire types

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    teams: Vec<Workspace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct SpacesResponse {
    spaces: Vec<Space>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct FoldersResponse {
    folders: Vec<Folder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lists: Vec<ListInfo>,
}

#[derive(Debug, Deserialize)]
struct ListsResponse {
    lists: Vec<ListInfo>,
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    tasks: Vec<WireTask>,
    #[serde(default)]
    last_page: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireTask {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    status: WireStatus,
    #[serde(default)]
    priority: Option<WirePriority>,
    #[serde(default, deserialize_with = "de_epoch_ms")]
    due_date: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    assignees: Vec<WireAssignee>,
    #[serde(default)]
    tags: Vec<WireTag>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct WirePriority {
    priority: String,
}

#[derive(Debug, Deserialize)]
struct WireAssignee {
    username: String,
}

#[derive(Debug, Deserialize)]
struct WireTag {
    name: String,
}

/// The upstream serializes due dates as either a number or a string of
/// epoch milliseconds.
fn de_epoch_ms<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Num(ms)) => Some(ms),
        Some(Raw::Text(text)) => text.parse().ok(),
    })
}

pub struct ClickUp {
    client: Client,
    config: ClickUpConfig,
    limiter: RateLimiter,
}

impl ClickUp {
    /// Creates a ClickUp client.
    ///
    /// A missing or empty API key is fatal here; the client refuses to
    /// be built rather than failing on the first request.
    pub fn new(config: &ClickUpConfig) -> SourceResult<Self> {
        Self::with_limiter(config, RateLimiter::new(REQUESTS_PER_WINDOW, WINDOW))
    }

    pub fn with_limiter(config: &ClickUpConfig, limiter: RateLimiter) -> SourceResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SourceError::auth("ClickUp", "API key is missing"));
        }
        Ok(Self {
            client: Client::new(),
            config: config.clone(),
            limiter,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> SourceResult<T> {
        self.limiter.acquire().await;
        let url = format!("{}/{}", self.config.api_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.config.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::upstream("ClickUp", e))?
            .error_for_status()
            .map_err(|e| SourceError::upstream("ClickUp", e))?;

        response.json::<T>().await.map_err(|e| SourceError::upstream("ClickUp", e))
    }

    /// All workspaces visible to the API key. Unlike the per-branch
    /// calls below this one is fatal on error: with no workspaces there
    /// is nothing to traverse.
    pub async fn workspaces(&self) -> SourceResult<Vec<Workspace>> {
        let response: TeamsResponse = self.get_json("team", &[]).await?;
        Ok(response.teams)
    }

    async fn spaces(&self, workspace_id: &str) -> Vec<Space> {
        match self.get_json::<SpacesResponse>(&format!("team/{}/space", workspace_id), &[]).await {
            Ok(response) => response.spaces,
            Err(e) => {
                warn!("Skipping spaces of workspace {}: {}", workspace_id, e);
                Vec::new()
            }
        }
    }

    async fn folders(&self, space_id: &str) -> Vec<Folder> {
        match self.get_json::<FoldersResponse>(&format!("space/{}/folder", space_id), &[]).await {
            Ok(response) => response.folders,
            Err(e) => {
                warn!("Skipping folders of space {}: {}", space_id, e);
                Vec::new()
            }
        }
    }

    async fn folderless_lists(&self, space_id: &str) -> Vec<ListInfo> {
        match self.get_json::<ListsResponse>(&format!("space/{}/list", space_id), &[]).await {
            Ok(response) => response.lists,
            Err(e) => {
                warn!("Skipping lists of space {}: {}", space_id, e);
                Vec::new()
            }
        }
    }

    /// Tasks of one list within the due-date window, following the
    /// upstream's pagination until it signals the last page.
    async fn list_tasks(&self, list_id: &str, window: &DueWindow) -> Vec<WireTask> {
        let mut tasks = Vec::new();
        let mut page: u32 = 0;
        loop {
            let query = [
                ("include_closed", "true".to_string()),
                ("subtasks", "true".to_string()),
                ("order_by", "due_date".to_string()),
                ("due_date_gt", window.start_ms.to_string()),
                ("due_date_lt", window.end_ms.to_string()),
                ("page", page.to_string()),
            ];
            let response: TasksResponse = match self.get_json(&format!("list/{}/task", list_id), &query).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Skipping tasks of list {}: {}", list_id, e);
                    break;
                }
            };
            let last_page = response.last_page.unwrap_or(true) || response.tasks.is_empty();
            tasks.extend(response.tasks);
            if last_page {
                break;
            }
            page += 1;
        }
        tasks
    }

    /// Walks the whole hierarchy and collects tasks whose due date falls
    /// within `window`.
    pub async fn tasks_in_window(&self, window: &DueWindow) -> SourceResult<Vec<RemoteTask>> {
        let workspaces = self.workspaces().await?;
        Ok(self.collect_tasks(&workspaces, window).await)
    }

    /// Collects window-filtered tasks from the given workspaces. The
    /// client-side filter re-checks the window as a defense against
    /// upstream filter inconsistency.
    pub async fn collect_tasks(&self, workspaces: &[Workspace], window: &DueWindow) -> Vec<RemoteTask> {
        let mut all_tasks = Vec::new();
        for workspace in workspaces {
            for space in self.spaces(&workspace.id).await {
                let mut lists = Vec::new();
                for folder in self.folders(&space.id).await {
                    lists.extend(folder.lists);
                }
                lists.extend(self.folderless_lists(&space.id).await);

                for list in lists {
                    for task in self.list_tasks(&list.id, window).await {
                        if !within_window(task.due_date, window) {
                            continue;
                        }
                        all_tasks.push(normalize_task(task, &workspace.name, &space.name, &list.name));
                    }
                }
            }
        }
        all_tasks
    }

    /// Name/id listing of the reachable hierarchy.
    pub async fn hierarchy(&self) -> SourceResult<Vec<WorkspaceTree>> {
        let mut workspaces = Vec::new();
        for workspace in self.workspaces().await? {
            let mut spaces = Vec::new();
            for space in self.spaces(&workspace.id).await {
                let folders = self
                    .folders(&space.id)
                    .await
                    .into_iter()
                    .map(|folder| FolderTree {
                        id: folder.id,
                        name: folder.name,
                        lists: folder.lists,
                    })
                    .collect();
                let folderless_lists = self.folderless_lists(&space.id).await;
                spaces.push(SpaceTree {
                    id: space.id,
                    name: space.name,
                    folders,
                    folderless_lists,
                });
            }
            workspaces.push(WorkspaceTree {
                id: workspace.id,
                name: workspace.name,
                spaces,
            });
        }
        Ok(workspaces)
    }
}

fn normalize_task(task: WireTask, workspace_name: &str, space_name: &str, list_name: &str) -> RemoteTask {
    RemoteTask {
        id: task.id,
        name: task.name,
        description: task.description.unwrap_or_default(),
        status: task.status.status,
        priority: task.priority.map(|p| p.priority).unwrap_or_else(|| "none".to_string()),
        due_date: task.due_date,
        url: task.url.unwrap_or_default(),
        workspace_name: workspace_name.to_string(),
        space_name: space_name.to_string(),
        list_name: list_name.to_string(),
        assignees: task.assignees.into_iter().map(|a| a.username).collect(),
        tags: task.tags.into_iter().map(|t| t.name).collect(),
    }
}

/// Groups tasks by their due date ascending; tasks without a due date
/// are left out of the day grouping.
pub fn group_by_due_date(tasks: &[RemoteTask]) -> Vec<DueDay> {
    let mut days: Vec<DueDay> = Vec::new();
    for task in tasks {
        let Some(due) = task.due_date else { continue };
        let Some(datetime) = chrono::DateTime::from_timestamp_millis(due) else { continue };
        let date = datetime.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.tasks.push(task.clone()),
            None => days.push(DueDay {
                date,
                tasks: vec![task.clone()],
            }),
        }
    }
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

/// Configuration for the ClickUp integration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClickUpConfig {
    /// Personal API token, as generated in ClickUp's app settings.
    pub api_key: String,

    /// Base URL of the ClickUp API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl ClickUpConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "clickup".to_string(),
            name: "ClickUp".to_string(),
        }
    }

    /// Resolves the effective configuration: the config file wins, with
    /// the `CLICKUP_API_KEY` environment variable as a fallback.
    pub fn resolve(config: &Option<Self>) -> Option<Self> {
        config.clone().or_else(|| {
            std::env::var("CLICKUP_API_KEY").ok().map(|api_key| Self {
                api_key,
                api_url: default_api_url(),
            })
        })
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or(Self {
            api_key: "".to_string(),
            api_url: default_api_url(),
        });
        println!("ClickUp settings");
        Ok(Self {
            api_key: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your ClickUp API key")
                .default(config.api_key)
                .interact_text()?,
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the ClickUp API URL")
                .default(config.api_url)
                .interact_text()?,
        })
    }
}
