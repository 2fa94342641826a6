use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::prompt::{CreatePromptRequest, Prompt, UpdatePromptRequest};

/// Custom reflection prompts, newest first.
#[derive(Clone, Default)]
pub struct PromptBook {
    prompts: Arc<RwLock<Vec<Prompt>>>,
}

impl PromptBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<Prompt> {
        self.prompts.read().await.clone()
    }

    pub async fn active(&self) -> Vec<Prompt> {
        self.prompts
            .read()
            .await
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect()
    }

    pub async fn create(&self, req: CreatePromptRequest) -> Prompt {
        let prompt = Prompt::create(req, Utc::now());
        self.prompts.write().await.insert(0, prompt.clone());
        prompt
    }

    pub async fn update(&self, id: Uuid, req: UpdatePromptRequest) -> Option<Prompt> {
        let mut prompts = self.prompts.write().await;
        let prompt = prompts.iter_mut().find(|p| p.id == id)?;
        prompt.apply(req, Utc::now());
        Some(prompt.clone())
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        let mut prompts = self.prompts.write().await;
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        prompts.len() != before
    }
}
