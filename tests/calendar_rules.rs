use dayboard::api::calendar::{group_by_day, is_readable, normalize_event, CalendarEntry, EventTime, WireAttendee, WireEvent};

fn entry(summary: &str, access_role: &str) -> CalendarEntry {
    CalendarEntry {
        id: format!("{}@example.com", summary.to_lowercase()),
        summary: summary.to_string(),
        access_role: access_role.to_string(),
        deleted: false,
        hidden: false,
    }
}

fn timed_event(title: &str, start: &str, end: &str) -> WireEvent {
    WireEvent {
        id: "evt".to_string(),
        summary: Some(title.to_string()),
        start: EventTime {
            date_time: Some(start.to_string()),
            date: None,
        },
        end: EventTime {
            date_time: Some(end.to_string()),
            date: None,
        },
        description: None,
        location: None,
        attendees: Vec::new(),
        html_link: None,
    }
}

#[test]
fn hidden_deleted_and_tasks_calendars_are_skipped() {
    let mut hidden = entry("Personal", "owner");
    hidden.hidden = true;
    assert!(!is_readable(&hidden));

    let mut deleted = entry("Old", "owner");
    deleted.deleted = true;
    assert!(!is_readable(&deleted));

    assert!(!is_readable(&entry("Tasks", "owner")));
    assert!(is_readable(&entry("Work", "owner")));
}

#[test]
fn only_read_capable_roles_pass() {
    assert!(is_readable(&entry("Team", "reader")));
    assert!(is_readable(&entry("Team", "writer")));
    assert!(is_readable(&entry("Team", "owner")));
    assert!(!is_readable(&entry("Team", "freeBusyReader")));
    assert!(!is_readable(&entry("Team", "")));
}

#[test]
fn all_day_events_fall_back_to_the_date_field() {
    let mut event = timed_event("Conference", "", "");
    event.start = EventTime {
        date_time: None,
        date: Some("2025-03-11".to_string()),
    };
    event.end = EventTime {
        date_time: None,
        date: Some("2025-03-12".to_string()),
    };

    let normalized = normalize_event(event, "cal", "Work");
    assert_eq!(normalized.start_time, "2025-03-11");
    assert_eq!(normalized.end_time, "2025-03-12");
}

#[test]
fn the_authenticated_self_is_excluded_from_attendees() {
    let mut event = timed_event("Standup", "2025-03-10T09:00:00Z", "2025-03-10T09:15:00Z");
    event.attendees = vec![
        WireAttendee {
            email: "me@example.com".to_string(),
            is_self: true,
        },
        WireAttendee {
            email: "colleague@example.com".to_string(),
            is_self: false,
        },
    ];

    let normalized = normalize_event(event, "cal", "Work");
    assert_eq!(normalized.attendees, vec!["colleague@example.com"]);
}

#[test]
fn untitled_events_get_a_placeholder_title() {
    let mut event = timed_event("ignored", "2025-03-10T09:00:00Z", "2025-03-10T10:00:00Z");
    event.summary = None;

    let normalized = normalize_event(event, "cal", "Work");
    assert_eq!(normalized.title, "No Title");
}

#[test]
fn day_grouping_sorts_days_and_events_by_start() {
    let events = vec![
        normalize_event(timed_event("late", "2025-03-11T16:00:00Z", "2025-03-11T17:00:00Z"), "cal", "Work"),
        normalize_event(timed_event("early", "2025-03-11T08:00:00Z", "2025-03-11T09:00:00Z"), "cal", "Work"),
        normalize_event(timed_event("previous", "2025-03-10T10:00:00Z", "2025-03-10T11:00:00Z"), "cal", "Work"),
    ];

    let days = group_by_day(&events);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, "2025-03-10");
    assert_eq!(days[1].events[0].title, "early");
}
