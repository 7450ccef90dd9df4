//! CRUD endpoints for journal reflections.

use super::AppState;
use crate::db::reflections::{NewReflection, Reflections, REFLECTION_KINDS};
use crate::libs::error::{SourceError, SourceResult};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reflection", post(create))
        .route("/api/reflection/weekly", get(weekly))
        .route("/api/reflection/{id}", delete(remove))
        .route("/api/reflection/{date}/{type}", get(get_by_date))
}

async fn create(Json(body): Json<NewReflection>) -> SourceResult<(StatusCode, Json<Value>)> {
    validate_kind(&body.kind)?;
    let store = Reflections::new()?;
    let id = store.insert(&body, Local::now().naive_local())?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn get_by_date(Path((date, kind)): Path<(String, String)>) -> SourceResult<Json<Value>> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| SourceError::ValidationError("Invalid date format".to_string()))?;
    validate_kind(&kind)?;

    let store = Reflections::new()?;
    let (reflection, images) = store
        .get(date, &kind)?
        .ok_or_else(|| SourceError::SourceUnavailable("Reflection not found".to_string()))?;

    Ok(Json(json!({
        "id": reflection.id,
        "type": reflection.kind,
        "priorities": reflection.priorities,
        "intention": reflection.intention,
        "reflection": reflection.reflection,
        "challenges": reflection.challenges,
        "tomorrow": reflection.tomorrow,
        "images": images,
    })))
}

async fn weekly() -> SourceResult<Json<Value>> {
    let store = Reflections::new()?;
    let reflections = store.weekly(Local::now().naive_local())?;

    let summaries: Vec<Value> = reflections
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "date": r.date.format("%Y-%m-%d").to_string(),
                "type": r.kind,
                "priorities": r.priorities,
                "reflection": r.reflection,
            })
        })
        .collect();

    Ok(Json(json!(summaries)))
}

async fn remove(Path(id): Path<i64>) -> SourceResult<Json<Value>> {
    let store = Reflections::new()?;
    if !store.delete(id)? {
        return Err(SourceError::SourceUnavailable("Reflection not found".to_string()));
    }
    Ok(Json(json!({ "status": "success" })))
}

fn validate_kind(kind: &str) -> SourceResult<()> {
    if REFLECTION_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(SourceError::ValidationError(format!(
            "Reflection type must be one of: {}",
            REFLECTION_KINDS.join(", ")
        )))
    }
}
