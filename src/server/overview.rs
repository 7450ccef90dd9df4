//! Consolidated dashboard endpoint.

use super::AppState;
use crate::libs::overview;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/overview/ceo", get(ceo))
}

/// Always answers 200 while the process is healthy; failed sections
/// come back as their empty/default values.
async fn ceo(State(state): State<AppState>) -> Json<Value> {
    let overview = overview::build_overview(&state.config, Local::now()).await;

    Json(json!({
        "status": "success",
        "overview": overview,
    }))
}
