//! Review analysis: keyword topics, sentiment, LLM classification and the
//! aggregated report.

pub mod llm;
pub mod report;
pub mod sentiment;
pub mod topics;
pub mod types;

pub use llm::{TopicClassification, TopicClassifier};
pub use report::{generate_analysis, VocAnalysis};
pub use sentiment::{score_sentiment, sentiment_for_review, SentimentScore};
pub use topics::{classify_against, classify_topic_with_keywords, TopicMatch, GENERAL_TOPIC};
pub use types::{ClassificationMethod, ReviewInput, Sentiment};
