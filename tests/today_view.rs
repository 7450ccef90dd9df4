mod common;

use chrono::NaiveDate;
use common::todo;
use dayboard::libs::task::TaskStatus;
use dayboard::libs::today::{in_today_view, planned_today, today_view};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[test]
fn start_today_is_included_regardless_of_rank() {
    for today_index in [-5, 0, 3] {
        let mut task = todo("a", "write report");
        task.start = "Today".to_string();
        task.today_index = today_index;
        assert!(in_today_view(&task, day()), "today_index = {}", today_index);
    }
}

#[test]
fn start_date_match_is_included() {
    let mut task = todo("a", "pay rent");
    task.start_date = Some(day());
    assert!(in_today_view(&task, day()));

    task.start_date = Some(day().succ_opt().unwrap());
    assert!(!in_today_view(&task, day()));
}

#[test]
fn anytime_requires_positive_rank() {
    let mut task = todo("a", "refactor backlog");
    task.start = "Anytime".to_string();

    task.today_index = 0;
    assert!(!in_today_view(&task, day()));
    task.today_index = -1;
    assert!(!in_today_view(&task, day()));
    task.today_index = 1;
    assert!(in_today_view(&task, day()));
}

#[test]
fn completed_tasks_are_always_excluded() {
    let mut task = todo("a", "ship release");
    task.start = "Today".to_string();
    task.status = TaskStatus::Completed;
    assert!(!in_today_view(&task, day()));
}

#[test]
fn someday_tasks_are_excluded() {
    let mut task = todo("a", "learn piano");
    task.start = "Someday".to_string();
    task.today_index = 4;
    assert!(!in_today_view(&task, day()));
}

#[test]
fn members_are_sorted_by_rank_and_stable_under_ties() {
    let mut first = todo("a", "third");
    first.start = "Today".to_string();
    first.today_index = 7;
    let mut second = todo("b", "first");
    second.start = "Today".to_string();
    second.today_index = 2;
    let mut third = todo("c", "second");
    third.start = "Today".to_string();
    third.today_index = 2;

    let groups = today_view(&[first, second, third], day());
    let titles: Vec<&str> = groups[0].tasks.iter().map(|task| task.title.as_str()).collect();
    // Equal ranks keep store order: "first" (b) before "second" (c)
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[test]
fn grouping_falls_back_from_area_to_project_to_label() {
    let mut with_area = todo("a", "area task");
    with_area.start = "Today".to_string();
    with_area.area_title = Some("Health".to_string());
    with_area.project_title = Some("Ignored".to_string());

    let mut with_project = todo("b", "project task");
    with_project.start = "Today".to_string();
    with_project.project_title = Some("Side Project".to_string());

    let mut with_empty_area = todo("c", "empty area task");
    with_empty_area.start = "Today".to_string();
    with_empty_area.area_title = Some("".to_string());
    with_empty_area.project_title = Some("Side Project".to_string());

    let mut bare = todo("d", "bare task");
    bare.start = "Today".to_string();

    let groups = today_view(&[with_area, with_project, with_empty_area, bare], day());
    let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
    // Groups appear in order of first appearance
    assert_eq!(names, vec!["Health", "Side Project", "No Area"]);
    assert_eq!(groups[1].tasks.len(), 2);
    assert_eq!(planned_today(&groups), 4);
}
