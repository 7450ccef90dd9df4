#![allow(dead_code)]

use dayboard::api::clickup::RemoteTask;
use dayboard::libs::task::{TaskStatus, TodoTask};
use parking_lot::{const_mutex, Mutex, MutexGuard};
use rusqlite::{params, Connection};
use std::path::Path;

static ENV_LOCK: Mutex<()> = const_mutex(());

/// Serializes tests that repoint HOME at a temporary directory.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock()
}

/// Schema of the local task store as the adapter expects it.
pub const THINGS_SCHEMA: &str = "
CREATE TABLE tasks (
    uuid TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'open',
    notes TEXT,
    project TEXT,
    area TEXT,
    start TEXT,
    start_date TEXT,
    deadline TEXT,
    today_index INTEGER DEFAULT 0,
    stop_date TEXT
);
CREATE TABLE task_tags (
    task_uuid TEXT NOT NULL,
    tag TEXT NOT NULL
);
";

/// Creates a task store database at `path` seeded with `tasks`.
pub fn seed_things_db(path: &Path, tasks: &[TodoTask]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(THINGS_SCHEMA).unwrap();
    for task in tasks {
        conn.execute(
            "INSERT INTO tasks (uuid, title, status, notes, project, area, start, start_date, deadline, today_index, stop_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                task.uuid,
                task.title,
                task.status.as_str(),
                task.notes,
                task.project_title,
                task.area_title,
                task.start,
                task.start_date,
                task.deadline,
                task.today_index,
                task.stop_date,
            ],
        )
        .unwrap();
        for tag in &task.tags {
            conn.execute("INSERT INTO task_tags (task_uuid, tag) VALUES (?1, ?2)", params![task.uuid, tag]).unwrap();
        }
    }
}

pub fn todo(uuid: &str, title: &str) -> TodoTask {
    TodoTask {
        uuid: uuid.to_string(),
        title: title.to_string(),
        status: TaskStatus::Open,
        notes: String::new(),
        project_title: None,
        area_title: None,
        start: String::new(),
        start_date: None,
        deadline: None,
        today_index: 0,
        stop_date: None,
        tags: Vec::new(),
    }
}

pub fn remote_task(id: &str, name: &str) -> RemoteTask {
    RemoteTask {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        status: "open".to_string(),
        priority: "none".to_string(),
        due_date: None,
        url: String::new(),
        workspace_name: "Workspace".to_string(),
        space_name: "Space".to_string(),
        list_name: "List".to_string(),
        assignees: Vec::new(),
        tags: Vec::new(),
    }
}
