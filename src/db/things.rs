//! Read-only adapter over the local task app's database.
//!
//! The task app owns this SQLite file; dayboard only mirrors it. Opening
//! distinguishes "store not installed/found" (the file is missing) from
//! "store found but query failed", because the HTTP layer answers 404
//! for the former and 500 for the latter.

use crate::libs::config::ConfigModule;
use crate::libs::error::{SourceError, SourceResult};
use crate::libs::task::{TaskStatus, TodoTask};
use dialoguer::{theme::ColorfulTheme, Input};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const SELECT_TASKS: &str = "SELECT uuid, title, status, notes, project, area, start, start_date, deadline, today_index, stop_date FROM tasks";
const SELECT_TAGS: &str = "SELECT tag FROM task_tags WHERE task_uuid = ?1 ORDER BY tag";

/// Default location of the task app's database on macOS.
const DEFAULT_DB_PATH: &str = "Library/Group Containers/JLMPQHK86H.com.culturedcode.ThingsMac/Things Database.thingsdatabase/main.sqlite";

pub struct ThingsStore {
    conn: Connection,
}

impl ThingsStore {
    /// Opens the task database read-only.
    pub fn open(config: &ThingsConfig) -> SourceResult<Self> {
        let path = Path::new(&config.db_path);
        if !path.exists() {
            return Err(SourceError::SourceUnavailable(format!(
                "Local task store not found at {}",
                config.db_path
            )));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(|e| SourceError::QueryFailed(format!("Failed to open local task store: {}", e)))?;

        Ok(ThingsStore { conn })
    }

    /// Connectivity probe: counts the task rows.
    pub fn probe(&self) -> SourceResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .map_err(|e| SourceError::QueryFailed(format!("Local task store probe failed: {}", e)))?;
        Ok(count as usize)
    }

    /// All to-dos that have not been completed, in store order.
    pub fn fetch_todos(&self) -> SourceResult<Vec<TodoTask>> {
        self.fetch(&format!("{} WHERE status != 'completed' ORDER BY rowid", SELECT_TASKS))
    }

    /// The completed-task log, newest completion first.
    pub fn fetch_logbook(&self) -> SourceResult<Vec<TodoTask>> {
        self.fetch(&format!(
            "{} WHERE status = 'completed' AND stop_date IS NOT NULL ORDER BY stop_date DESC",
            SELECT_TASKS
        ))
    }

    fn fetch(&self, sql: &str) -> SourceResult<Vec<TodoTask>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            let status: String = row.get(2)?;
            Ok(TodoTask {
                uuid: row.get(0)?,
                title: row.get(1)?,
                status: TaskStatus::parse(&status),
                notes: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                project_title: row.get(4)?,
                area_title: row.get(5)?,
                start: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                start_date: row.get(7)?,
                deadline: row.get(8)?,
                today_index: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
                stop_date: row.get(10)?,
                tags: Vec::new(),
            })
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        self.attach_tags(&mut tasks)?;

        Ok(tasks)
    }

    fn attach_tags(&self, tasks: &mut [TodoTask]) -> SourceResult<()> {
        let mut stmt = self.conn.prepare(SELECT_TAGS)?;
        let mut cache: HashMap<String, Vec<String>> = HashMap::new();
        for task in tasks.iter_mut() {
            let tags = match cache.get(&task.uuid) {
                Some(tags) => tags.clone(),
                None => {
                    let rows = stmt.query_map(params![task.uuid], |row| row.get::<_, String>(0))?;
                    let mut tags = Vec::new();
                    for row in rows {
                        tags.push(row?);
                    }
                    cache.insert(task.uuid.clone(), tags.clone());
                    tags
                }
            };
            task.tags = tags;
        }
        Ok(())
    }
}

/// Configuration for the local task store.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ThingsConfig {
    /// Path to the task app's SQLite database file.
    pub db_path: String,
}

impl ThingsConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "things".to_string(),
            name: "Local task store".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let default_path = std::env::var("HOME")
            .map(|home| format!("{}/{}", home, DEFAULT_DB_PATH))
            .unwrap_or_default();
        let config = config.clone().unwrap_or(Self { db_path: default_path });
        println!("Local task store settings");
        Ok(Self {
            db_path: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the path to the task database")
                .default(config.db_path)
                .interact_text()?,
        })
    }
}
