//! LLM topic classification with keyword fallback.
//!
//! The model picks one topic from the candidate list and answers with JSON.
//! Anything unusable (transport error, malformed JSON, a topic outside the
//! list) falls back to the keyword classifier, so callers always get a topic.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::topics::{classify_against, topic_names, GENERAL_TOPIC};
use super::types::ClassificationMethod;
use crate::kernel::BaseAI;

/// Reviews longer than this are cut before prompting.
const MAX_PROMPT_TEXT_CHARS: usize = 4000;

const CLASSIFY_PROMPT: &str = r#"You classify customer reviews by topic.

Pick exactly ONE topic from the list you are given. If none of them fits, answer "General".

Respond with a single JSON object and nothing else:
{"topic": "<one topic from the list or General>", "confidence": <number between 0 and 1>, "reasoning": "<one short sentence>"}"#;

/// LLM response for a topic classification.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmTopicResponse {
    pub topic: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopicClassification {
    pub topic: String,
    pub confidence: f64,
    pub method: ClassificationMethod,
    pub matched_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Clone)]
pub struct TopicClassifier {
    ai: Option<Arc<dyn BaseAI>>,
}

impl TopicClassifier {
    pub fn new(ai: Option<Arc<dyn BaseAI>>) -> Self {
        Self { ai }
    }

    pub fn keyword_only() -> Self {
        Self { ai: None }
    }

    /// Classify `text` against `candidates`; an empty list means every
    /// dictionary topic.
    pub async fn classify(&self, text: &str, candidates: &[String]) -> TopicClassification {
        let Some(ai) = &self.ai else {
            return keyword_classification(text, candidates);
        };

        let topics: Vec<String> = if candidates.is_empty() {
            topic_names()
        } else {
            candidates
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        };

        match classify_with_llm(ai.as_ref(), text, &topics).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "LLM topic classification failed, using keywords");
                keyword_classification(text, candidates)
            }
        }
    }
}

fn keyword_classification(text: &str, candidates: &[String]) -> TopicClassification {
    let found = classify_against(text, candidates);
    TopicClassification {
        confidence: found.confidence(),
        topic: found.topic,
        method: ClassificationMethod::Keyword,
        matched_keywords: found.matched_keywords,
        reasoning: None,
    }
}

async fn classify_with_llm(
    ai: &dyn BaseAI,
    text: &str,
    topics: &[String],
) -> anyhow::Result<TopicClassification> {
    let text: String = text.chars().take(MAX_PROMPT_TEXT_CHARS).collect();
    let user_prompt = format!(
        "Topics:\n{}\n\nReview:\n{}",
        topics
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n"),
        text
    );

    let raw = ai.complete_json(CLASSIFY_PROMPT, &user_prompt).await?;
    let response = parse_response(&raw)?;

    let topic = resolve_topic(&response.topic, topics)
        .ok_or_else(|| anyhow::anyhow!("LLM picked unknown topic {:?}", response.topic))?;

    debug!(topic = %topic, "LLM classified review");

    Ok(TopicClassification {
        topic,
        confidence: response.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        method: ClassificationMethod::Llm,
        matched_keywords: Vec::new(),
        reasoning: response.reasoning,
    })
}

/// Parse the model output, tolerating a Markdown code fence around the JSON.
fn parse_response(raw: &str) -> anyhow::Result<LlmTopicResponse> {
    let trimmed = raw.trim();
    let json = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };
    serde_json::from_str(json).map_err(|e| anyhow::anyhow!("unparseable LLM output: {}", e))
}

/// Map the model's answer onto the canonical spelling in `topics`.
fn resolve_topic(answer: &str, topics: &[String]) -> Option<String> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case(GENERAL_TOPIC) {
        return Some(GENERAL_TOPIC.to_string());
    }
    topics
        .iter()
        .find(|t| t.eq_ignore_ascii_case(answer))
        .cloned()
}
