use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppResult;
use crate::insights::{period_days, weekly_summary, InsightEngine, InsightReport, WeeklySummary};
use crate::store::EntryStore;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MoodInsightQuery {
    /// `week` (default) or `month`
    pub period: Option<String>,
}

/// GET /api/insights/mood
pub async fn get_mood_insights(
    State(state): State<AppState>,
    Query(query): Query<MoodInsightQuery>,
) -> AppResult<Json<InsightReport>> {
    let days = period_days(query.period.as_deref());
    let engine = InsightEngine::new(state.store.clone());

    let report = engine.get_insights(Some(days)).await?;
    Ok(Json(report))
}

/// GET /api/insights/weekly
pub async fn get_weekly_summary(State(state): State<AppState>) -> AppResult<Json<WeeklySummary>> {
    let entries = state.store.get_entries().await?;
    Ok(Json(weekly_summary(&entries, Utc::now())))
}
