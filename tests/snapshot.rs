mod common;

use chrono::NaiveDate;
use dayboard::libs::data_storage::DataStorage;
use dayboard::libs::snapshot::{TodaySnapshot, SNAPSHOT_FILE_NAME};
use parking_lot::MutexGuard;
use std::fs;
use tempfile::TempDir;
use test_context::{test_context, TestContext};

/// Points the data directory at a fresh temp dir for the whole test.
struct SnapshotTestContext {
    _guard: MutexGuard<'static, ()>,
    _temp_dir: TempDir,
}

impl TestContext for SnapshotTestContext {
    fn setup() -> Self {
        let guard = common::env_lock();
        let temp_dir = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", temp_dir.path());
        std::env::set_var("LOCALAPPDATA", temp_dir.path());
        SnapshotTestContext {
            _guard: guard,
            _temp_dir: temp_dir,
        }
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test_context(SnapshotTestContext)]
#[test]
fn load_without_a_snapshot_is_none(_ctx: &mut SnapshotTestContext) {
    assert!(TodaySnapshot::load().is_none());
}

#[test_context(SnapshotTestContext)]
#[test]
fn save_then_load_round_trips(_ctx: &mut SnapshotTestContext) {
    let snapshot = TodaySnapshot::capture(vec!["a".to_string(), "b".to_string()], day());
    snapshot.save().unwrap();

    let loaded = TodaySnapshot::load().unwrap();
    assert_eq!(loaded.date, "2025-03-10");
    assert_eq!(loaded.task_ids, vec!["a", "b"]);
}

#[test_context(SnapshotTestContext)]
#[test]
fn saving_overwrites_the_previous_snapshot(_ctx: &mut SnapshotTestContext) {
    TodaySnapshot::capture(vec!["old".to_string()], day()).save().unwrap();
    TodaySnapshot::capture(vec!["new".to_string()], day().succ_opt().unwrap()).save().unwrap();

    let loaded = TodaySnapshot::load().unwrap();
    assert_eq!(loaded.date, "2025-03-11");
    assert_eq!(loaded.task_ids, vec!["new"]);
}

#[test_context(SnapshotTestContext)]
#[test]
fn corrupt_snapshot_file_is_treated_as_absent(_ctx: &mut SnapshotTestContext) {
    let path = DataStorage::new().get_path(SNAPSHOT_FILE_NAME).unwrap();
    fs::write(&path, "{not json").unwrap();

    assert!(TodaySnapshot::load().is_none());
}
