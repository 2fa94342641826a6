use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::entry::{CreateEntryRequest, Entry, EntryId, UpdateEntryRequest};
use crate::store::EntryStore;
use crate::AppState;

const EXPORT_FILENAME: &str = "mindlog_export.json";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn entry_not_found() -> AppError {
    AppError::NotFound("Entry not found".into())
}

pub async fn list_entries(State(state): State<AppState>) -> AppResult<Json<Vec<Entry>>> {
    let entries = state.store.get_entries().await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> AppResult<Json<Entry>> {
    let entry = state
        .store
        .find(EntryId::from(entry_id))
        .await?
        .ok_or_else(entry_not_found)?;

    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<Entry>)> {
    body.validate()?;

    let entry = state.store.insert(Entry::create(body, Utc::now())).await?;
    tracing::info!(entry_id = %entry.id, mood = ?entry.mood, "Entry created");

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<Entry>> {
    body.validate()?;

    let mut entry = state
        .store
        .find(EntryId::from(entry_id))
        .await?
        .ok_or_else(entry_not_found)?;
    entry.apply(body);

    let entry = state
        .store
        .replace(entry)
        .await?
        .ok_or_else(entry_not_found)?;

    Ok(Json(entry))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> AppResult<Json<Entry>> {
    let mut entry = state
        .store
        .find(EntryId::from(entry_id))
        .await?
        .ok_or_else(entry_not_found)?;
    entry.favorite = !entry.favorite;

    let entry = state
        .store
        .replace(entry)
        .await?
        .ok_or_else(entry_not_found)?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let entry_id = EntryId::from(entry_id);
    if !state.store.remove(entry_id.clone()).await? {
        return Err(entry_not_found());
    }
    tracing::info!(entry_id = %entry_id, "Entry deleted");

    Ok(Json(MessageResponse {
        message: "Entry deleted".into(),
    }))
}

/// Full journal snapshot as a downloadable JSON file.
pub async fn export_entries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.store.get_entries().await?;
    let body = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}
