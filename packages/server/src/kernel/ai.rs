// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::BaseAI;

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIAdapter {
    client: OpenAIClient,
    model: String,
}

impl OpenAIAdapter {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, system_prompt: &str, user_prompt: &str) -> ChatRequest {
        ChatRequest::new(self.model.clone())
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(0.0)
            .max_tokens(512)
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        tracing::debug!(
            prompt_length = user_prompt.len(),
            model = %self.model,
            "Calling OpenAI"
        );

        let response = self
            .client
            .chat_completion(self.request(system_prompt, user_prompt))
            .await
            .context("Failed to call OpenAI API")?;

        Ok(response.content)
    }

    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .chat_completion(self.request(system_prompt, user_prompt).json_mode())
            .await
            .context("Failed to call OpenAI API in JSON mode")?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                total_tokens = usage.total_tokens,
                "OpenAI JSON completion"
            );
        }

        Ok(response.content)
    }
}
