//! Endpoints over the ClickUp workspace hierarchy.

use super::AppState;
use crate::api::clickup::{self, ClickUp, ClickUpConfig, DueWindow};
use crate::libs::error::{SourceError, SourceResult};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Local};
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/clickup/tasks/recent", get(recent_tasks))
        .route("/api/clickup/spaces/folders", get(hierarchy))
}

fn client(state: &AppState) -> SourceResult<ClickUp> {
    let config = ClickUpConfig::resolve(&state.config.clickup).ok_or_else(|| SourceError::auth("ClickUp", "API key is missing"))?;
    ClickUp::new(&config)
}

/// Tasks due between yesterday and tomorrow, grouped by due date.
async fn recent_tasks(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let client = client(&state)?;

    let now = Local::now();
    let window = DueWindow::new(now - Duration::days(1), now + Duration::days(1));

    let workspaces = client.workspaces().await?;
    if workspaces.is_empty() {
        return Err(SourceError::SourceUnavailable("No workspaces found".to_string()));
    }

    let tasks = client.collect_tasks(&workspaces, &window).await;
    Ok(Json(json!({
        "status": "success",
        "total_tasks": tasks.len(),
        "days": clickup::group_by_due_date(&tasks),
    })))
}

async fn hierarchy(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let client = client(&state)?;
    let workspaces = client.hierarchy().await?;

    Ok(Json(json!({
        "status": "success",
        "workspaces": workspaces,
    })))
}
