//! Fixed-location weather endpoint.

use super::AppState;
use crate::api::weather::Weather;
use crate::libs::error::SourceResult;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/weather/manchester", get(manchester))
}

async fn manchester(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let config = state.config.weather.clone().unwrap_or_default();
    let snapshot = Weather::new(&config).forecast(Local::now().naive_local()).await?;

    Ok(Json(json!({
        "status": "success",
        "data": snapshot,
    })))
}
