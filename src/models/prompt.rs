use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Uuid,
    pub text: String,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    pub fn create(req: CreatePromptRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: req.text,
            category: req.category.unwrap_or_else(|| DEFAULT_CATEGORY.into()),
            is_active: req.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdatePromptRequest, now: DateTime<Utc>) {
        if let Some(text) = req.text {
            self.text = text;
        }
        if let Some(category) = req.category {
            self.category = category;
        }
        if let Some(is_active) = req.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    #[validate(length(min = 1, max = 500, message = "Prompt text must be 1-500 characters"))]
    pub text: String,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptRequest {
    #[validate(length(min = 1, max = 500, message = "Prompt text must be 1-500 characters"))]
    pub text: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DailyPromptResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
