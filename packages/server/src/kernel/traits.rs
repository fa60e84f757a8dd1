// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for, which report to sync, what an e-mail says: all of that
// lives in the domains and only talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseEmailService)

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Complete a prompt expecting a single JSON object (returns raw JSON string)
    /// Parse with serde_json::from_str in calling code
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.complete(system_prompt, user_prompt).await
    }
}

// =============================================================================
// Edge Functions (Infrastructure - hosted scraping pipeline)
// =============================================================================

/// Remote functions that own the scraping and sync pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeFunction {
    ProcessVocReport,
    SyncVocReport,
}

impl EdgeFunction {
    pub fn name(&self) -> &'static str {
        match self {
            EdgeFunction::ProcessVocReport => "process-voc-report",
            EdgeFunction::SyncVocReport => "sync-voc-report",
        }
    }
}

impl std::fmt::Display for EdgeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[async_trait]
pub trait BaseEdgeFunctions: Send + Sync {
    /// Invoke a function with a JSON payload and return its JSON answer
    async fn invoke(
        &self,
        function: EdgeFunction,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value>;
}

// =============================================================================
// Email Service Trait (Infrastructure - transactional e-mail)
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    /// Send an e-mail, returning the provider's message id
    async fn send_email(&self, email: OutgoingEmail) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_function_names_match_their_routes() {
        assert_eq!(EdgeFunction::ProcessVocReport.name(), "process-voc-report");
        assert_eq!(EdgeFunction::SyncVocReport.to_string(), "sync-voc-report");
        assert_eq!(
            serde_json::to_value(EdgeFunction::SyncVocReport).unwrap(),
            "sync-voc-report"
        );
    }
}
