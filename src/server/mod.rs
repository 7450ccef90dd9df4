//! HTTP surface of the dashboard.
//!
//! One router module per resource, composed here. Handlers construct
//! their adapters per request from the shared configuration; the only
//! cross-request state is on disk. Responses are JSON throughout, and
//! failures use the shape `{"status": "error", "message": ...}` with a
//! status code chosen by the error kind (see `libs::error`).

use crate::libs::config::Config;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod calendar;
pub mod clickup;
pub mod overview;
pub mod reflection;
pub mod tasks;
pub mod weather;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/test", get(test))
        .merge(reflection::routes())
        .merge(tasks::routes())
        .merge(clickup::routes())
        .merge(calendar::routes())
        .merge(weather::routes())
        .merge(overview::routes())
        // The frontend is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "API is running",
        "available_endpoints": [
            "/api/test - Test if the API is working",
            "/api/reflection - Create a journal reflection",
            "/api/reflection/weekly - Reflections from the last 7 days",
            "/api/tasks/today - Today's tasks from the local store",
            "/api/tasks/yesterday - Yesterday's completed tasks",
            "/api/tasks/completed/recent - Tasks completed since yesterday",
            "/api/tasks/upcoming - Tasks starting or due soon",
            "/api/clickup/tasks/recent - ClickUp tasks around today",
            "/api/clickup/spaces/folders - ClickUp workspace hierarchy",
            "/api/calendar/events/recent - Calendar events around today",
            "/api/weather/manchester - Current weather and forecast",
            "/api/overview/ceo - Consolidated dashboard overview",
        ],
    }))
}

async fn test() -> Json<Value> {
    Json(json!({ "status": "API is working" }))
}
