mod common;

use common::remote_task;
use dayboard::api::clickup::{group_by_due_date, within_window, DueWindow};

fn window() -> DueWindow {
    DueWindow {
        start_ms: 1_000,
        end_ms: 2_000,
    }
}

#[test]
fn due_dates_strictly_outside_the_window_are_excluded() {
    assert!(!within_window(Some(999), &window()));
    assert!(!within_window(Some(2_001), &window()));
}

#[test]
fn boundary_due_dates_are_inclusive() {
    assert!(within_window(Some(1_000), &window()));
    assert!(within_window(Some(2_000), &window()));
    assert!(within_window(Some(1_500), &window()));
}

#[test]
fn tasks_without_a_due_date_are_kept() {
    assert!(within_window(None, &window()));
}

#[test]
fn day_grouping_is_ascending_and_skips_undated_tasks() {
    // 2025-03-11 and 2025-03-10 noon UTC, deliberately out of order
    let mut later = remote_task("1", "later");
    later.due_date = Some(1_741_694_400_000);
    let mut earlier = remote_task("2", "earlier");
    earlier.due_date = Some(1_741_608_000_000);
    let undated = remote_task("3", "undated");

    let days = group_by_due_date(&[later, earlier, undated]);
    assert_eq!(days.len(), 2);
    assert!(days[0].date < days[1].date);
    assert_eq!(days[0].tasks[0].name, "earlier");
    assert_eq!(days.iter().map(|day| day.tasks.len()).sum::<usize>(), 2);
}
