// Supabase Edge Function client
//
// The scraping pipeline runs as hosted functions. This client only knows how
// to reach them: POST {SUPABASE_URL}/functions/v1/<name> with the service role
// key as bearer token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{BaseEdgeFunctions, EdgeFunction};

/// Edge Functions may run for a while before answering.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound on how much of an error body ends up in the error message.
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum EdgeFunctionError {
    #[error("edge function {function} returned {status}: {body}")]
    Status {
        function: EdgeFunction,
        status: u16,
        body: String,
    },
}

#[derive(Clone)]
pub struct SupabaseEdgeFunctions {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseEdgeFunctions {
    pub fn new(supabase_url: &str, service_role_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: supabase_url.trim_end_matches('/').to_string(),
            service_role_key,
        })
    }

    pub fn function_url(&self, function: EdgeFunction) -> String {
        format!("{}/functions/v1/{}", self.base_url, function.name())
    }
}

#[async_trait]
impl BaseEdgeFunctions for SupabaseEdgeFunctions {
    async fn invoke(
        &self,
        function: EdgeFunction,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = self.function_url(function);
        tracing::info!(function = %function, "Invoking edge function");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_role_key)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach edge function {}", function))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response of {}", function))?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(EdgeFunctionError::Status {
                function,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        // Some functions answer with plain text
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_url_joins_base_and_name() {
        let client =
            SupabaseEdgeFunctions::new("https://abc.supabase.co/", "key".to_string()).unwrap();
        assert_eq!(
            client.function_url(EdgeFunction::ProcessVocReport),
            "https://abc.supabase.co/functions/v1/process-voc-report"
        );
    }

    #[test]
    fn status_error_names_function_and_status() {
        let err = EdgeFunctionError::Status {
            function: EdgeFunction::SyncVocReport,
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "edge function sync-voc-report returned 503: busy"
        );
    }
}
