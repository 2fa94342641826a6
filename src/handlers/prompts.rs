use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::entries::MessageResponse;
use crate::insights::{daily_prompt, pick_for_day};
use crate::models::prompt::{CreatePromptRequest, DailyPromptResponse, Prompt, UpdatePromptRequest};
use crate::AppState;

fn prompt_not_found() -> AppError {
    AppError::NotFound("Prompt not found".into())
}

pub async fn list_prompts(State(state): State<AppState>) -> Json<Vec<Prompt>> {
    Json(state.prompts.list().await)
}

/// GET /api/prompts/daily
///
/// Rotates over the active custom prompts when there are any, otherwise over
/// the built-in list.
pub async fn get_daily_prompt(State(state): State<AppState>) -> Json<DailyPromptResponse> {
    let today = Utc::now().date_naive();
    let active = state.prompts.active().await;

    let response = match pick_for_day(&active, today) {
        Some(prompt) => DailyPromptResponse {
            text: prompt.text.clone(),
            id: Some(prompt.id),
            category: Some(prompt.category.clone()),
        },
        None => DailyPromptResponse {
            text: daily_prompt(today).to_string(),
            id: None,
            category: None,
        },
    };

    Json(response)
}

pub async fn create_prompt(
    State(state): State<AppState>,
    Json(body): Json<CreatePromptRequest>,
) -> AppResult<(StatusCode, Json<Prompt>)> {
    body.validate()?;
    let prompt = state.prompts.create(body).await;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn update_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
    Json(body): Json<UpdatePromptRequest>,
) -> AppResult<Json<Prompt>> {
    body.validate()?;
    let prompt = state
        .prompts
        .update(prompt_id, body)
        .await
        .ok_or_else(prompt_not_found)?;
    Ok(Json(prompt))
}

pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.prompts.delete(prompt_id).await {
        return Err(prompt_not_found());
    }
    Ok(Json(MessageResponse {
        message: "Prompt deleted".into(),
    }))
}
