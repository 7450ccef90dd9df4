//! Endpoints over the local task store: Today view, completed log,
//! upcoming tasks, connectivity probe and the Today snapshot.

use super::AppState;
use crate::db::things::ThingsStore;
use crate::libs::error::{SourceError, SourceResult};
use crate::libs::snapshot::TodaySnapshot;
use crate::libs::today;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks/today", get(today_tasks))
        .route("/api/tasks/yesterday", get(yesterday_completed))
        .route("/api/tasks/completed/recent", get(recent_completed))
        .route("/api/tasks/upcoming", get(upcoming))
        .route("/api/tasks/test", get(probe))
        .route("/api/tasks/today/save_snapshot", post(save_snapshot))
}

fn open_store(state: &AppState) -> SourceResult<ThingsStore> {
    let config = state
        .config
        .things
        .as_ref()
        .ok_or_else(|| SourceError::SourceUnavailable("local task store is not configured".to_string()))?;
    ThingsStore::open(config)
}

async fn today_tasks(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    let todos = store.fetch_todos()?;
    let areas = today::today_view(&todos, Local::now().date_naive());
    let total = today::planned_today(&areas);

    Ok(Json(json!({
        "status": "success",
        "message": format!("Found {} tasks in Today view", total),
        "areas": areas,
    })))
}

async fn yesterday_completed(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    let logbook = store.fetch_logbook()?;
    let day = today::yesterday_completed(&logbook, Local::now().date_naive());

    Ok(Json(json!({
        "status": "success",
        "date": day.date,
        "total_completed": day.total_completed,
        "projects": day.projects,
    })))
}

async fn recent_completed(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    let logbook = store.fetch_logbook()?;
    let recent = today::recent_completed(&logbook, Local::now().date_naive());

    Ok(Json(json!({
        "status": "success",
        "total_completed": recent.total_completed,
        "days": recent.days,
    })))
}

#[derive(Debug, Deserialize)]
struct UpcomingParams {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    7
}

async fn upcoming(State(state): State<AppState>, Query(params): Query<UpcomingParams>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    let todos = store.fetch_todos()?;
    let days = today::upcoming(&todos, Local::now().date_naive(), params.days);

    Ok(Json(json!({
        "status": "success",
        "days": days,
    })))
}

async fn probe(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    store.probe()?;

    Ok(Json(json!({
        "status": "success",
        "message": "Successfully connected to the local task store",
    })))
}

async fn save_snapshot(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let store = open_store(&state)?;
    let task_ids: Vec<String> = store.fetch_todos()?.into_iter().map(|task| task.uuid).collect();
    let count = task_ids.len();

    TodaySnapshot::capture(task_ids, Local::now().date_naive())
        .save()
        .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("Saved snapshot with {} tasks", count),
    })))
}
