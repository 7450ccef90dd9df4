mod common;

use chrono::NaiveDate;
use common::{seed_things_db, todo};
use dayboard::db::things::{ThingsConfig, ThingsStore};
use dayboard::libs::error::SourceError;
use dayboard::libs::task::TaskStatus;
use tempfile::TempDir;

fn store_with(tasks: &[dayboard::libs::task::TodoTask]) -> (TempDir, ThingsStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("main.sqlite");
    seed_things_db(&db_path, tasks);
    let store = ThingsStore::open(&ThingsConfig {
        db_path: db_path.to_string_lossy().to_string(),
    })
    .unwrap();
    (temp_dir, store)
}

#[test]
fn missing_database_file_is_source_unavailable() {
    let result = ThingsStore::open(&ThingsConfig {
        db_path: "/nonexistent/path/main.sqlite".to_string(),
    });
    assert!(matches!(result, Err(SourceError::SourceUnavailable(_))));
}

#[test]
fn probe_counts_rows() {
    let (_dir, store) = store_with(&[todo("a", "one"), todo("b", "two")]);
    assert_eq!(store.probe().unwrap(), 2);
}

#[test]
fn todos_exclude_completed_and_keep_store_order() {
    let mut done = todo("b", "done");
    done.status = TaskStatus::Completed;
    done.stop_date = Some("2025-03-09 10:00:00".to_string());
    let mut canceled = todo("c", "dropped");
    canceled.status = TaskStatus::Canceled;

    let (_dir, store) = store_with(&[todo("a", "first"), done, canceled, todo("d", "second")]);
    let todos = store.fetch_todos().unwrap();
    let titles: Vec<&str> = todos.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "dropped", "second"]);
}

#[test]
fn logbook_returns_completed_newest_first() {
    let mut older = todo("a", "older");
    older.status = TaskStatus::Completed;
    older.stop_date = Some("2025-03-08 09:00:00".to_string());
    let mut newer = todo("b", "newer");
    newer.status = TaskStatus::Completed;
    newer.stop_date = Some("2025-03-09 18:30:00".to_string());

    let (_dir, store) = store_with(&[older, newer, todo("c", "open")]);
    let log = store.fetch_logbook().unwrap();
    let titles: Vec<&str> = log.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
}

#[test]
fn scheduling_fields_and_tags_survive_the_read() {
    let mut task = todo("a", "detailed");
    task.area_title = Some("Work".to_string());
    task.project_title = Some("Backend".to_string());
    task.start = "Anytime".to_string();
    task.start_date = Some(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    task.deadline = Some(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
    task.today_index = 3;
    task.tags = vec!["focus".to_string(), "urgent".to_string()];

    let (_dir, store) = store_with(&[task]);
    let todos = store.fetch_todos().unwrap();
    let read = &todos[0];
    assert_eq!(read.area_title.as_deref(), Some("Work"));
    assert_eq!(read.start, "Anytime");
    assert_eq!(read.start_date, Some(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));
    assert_eq!(read.deadline, Some(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()));
    assert_eq!(read.today_index, 3);
    assert_eq!(read.tags, vec!["focus", "urgent"]);
}
