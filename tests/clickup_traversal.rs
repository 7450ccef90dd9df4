//! Drives the ClickUp adapter against a local fixture server: hierarchy
//! traversal, pagination, branch degradation and window filtering.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use dayboard::api::clickup::{ClickUp, ClickUpConfig, DueWindow};
use serde_json::json;
use std::collections::HashMap;

async fn teams() -> Json<serde_json::Value> {
    Json(json!({ "teams": [ { "id": "acme", "name": "Acme" } ] }))
}

async fn spaces() -> Json<serde_json::Value> {
    Json(json!({ "spaces": [
        { "id": "good", "name": "Good Space" },
        { "id": "bad", "name": "Bad Space" },
    ] }))
}

async fn folders(Path(space_id): Path<String>) -> impl IntoResponse {
    if space_id == "bad" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "folders": [
        { "id": "f1", "name": "Folder", "lists": [ { "id": "l1", "name": "Folder List" } ] }
    ] }))
    .into_response()
}

async fn folderless(Path(space_id): Path<String>) -> impl IntoResponse {
    if space_id == "bad" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "lists": [ { "id": "l2", "name": "Loose List" } ] })).into_response()
}

async fn tasks(Path(list_id): Path<String>, Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    match (list_id.as_str(), page) {
        ("l1", 0) => Json(json!({
            "tasks": [ {
                "id": "t1",
                "name": "first page task",
                "status": { "status": "open" },
                "due_date": "1500",
            } ],
            "last_page": false,
        })),
        ("l1", _) => Json(json!({
            "tasks": [ {
                "id": "t2",
                "name": "second page task",
                "status": { "status": "blocked" },
                "priority": { "priority": "high" },
                "due_date": 1800,
                "assignees": [ { "username": "kirill" } ],
                "tags": [ { "name": "api" } ],
            } ],
            "last_page": true,
        })),
        ("l2", _) => Json(json!({
            // Outside the window despite the upstream filter params
            "tasks": [ {
                "id": "t3",
                "name": "stray task",
                "status": { "status": "open" },
                "due_date": 9999,
            } ],
            "last_page": true,
        })),
        _ => Json(json!({ "tasks": [], "last_page": true })),
    }
}

async fn start_fixture() -> ClickUpConfig {
    let app = Router::new()
        .route("/team", get(teams))
        .route("/team/{id}/space", get(spaces))
        .route("/space/{id}/folder", get(folders))
        .route("/space/{id}/list", get(folderless))
        .route("/list/{id}/task", get(tasks));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    ClickUpConfig {
        api_key: "pk_test".to_string(),
        api_url: format!("http://{}", addr),
    }
}

#[test]
fn construction_without_a_key_is_refused() {
    let result = ClickUp::new(&ClickUpConfig {
        api_key: "  ".to_string(),
        api_url: "http://localhost".to_string(),
    });
    assert!(result.is_err());
}

#[tokio::test]
async fn traversal_paginates_filters_and_degrades_broken_branches() {
    let config = start_fixture().await;
    let client = ClickUp::new(&config).unwrap();

    let window = DueWindow {
        start_ms: 1_000,
        end_ms: 2_000,
    };
    let tasks = client.tasks_in_window(&window).await.unwrap();

    // Both pages of l1 arrive; l2's stray task is outside the window;
    // the broken space contributes nothing but does not abort the call.
    let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);

    let second = &tasks[1];
    assert_eq!(second.priority, "high");
    assert_eq!(second.status, "blocked");
    assert_eq!(second.due_date, Some(1800));
    assert_eq!(second.assignees, vec!["kirill"]);
    assert_eq!(second.tags, vec!["api"]);
    assert_eq!(second.workspace_name, "Acme");
    assert_eq!(second.space_name, "Good Space");
    assert_eq!(second.list_name, "Folder List");
}

#[tokio::test]
async fn hierarchy_lists_folders_and_loose_lists() {
    let config = start_fixture().await;
    let client = ClickUp::new(&config).unwrap();

    let workspaces = client.hierarchy().await.unwrap();
    assert_eq!(workspaces.len(), 1);
    let space = &workspaces[0].spaces[0];
    assert_eq!(space.folders[0].lists[0].name, "Folder List");
    assert_eq!(space.folderless_lists[0].name, "Loose List");

    // The broken space is present but empty
    let bad = &workspaces[0].spaces[1];
    assert!(bad.folders.is_empty());
    assert!(bad.folderless_lists.is_empty());
}
