//! Endpoints over the calendar provider.

use super::AppState;
use crate::api::calendar::{self, Calendar};
use crate::libs::error::{SourceError, SourceResult};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Local};
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/calendar/events/recent", get(recent_events))
}

/// Events from yesterday through tomorrow, grouped by date.
async fn recent_events(State(state): State<AppState>) -> SourceResult<Json<Value>> {
    let config = state
        .config
        .calendar
        .as_ref()
        .ok_or_else(|| SourceError::auth("calendar", "calendar integration is not configured"))?;

    let now = Local::now();
    let events = Calendar::new(config).list_events(now - Duration::days(1), now + Duration::days(1)).await?;

    Ok(Json(json!({
        "status": "success",
        "total_events": events.len(),
        "days": calendar::group_by_day(&events),
    })))
}
