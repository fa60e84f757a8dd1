use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment label for a single review or an aggregate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A review as handed to the analyzer, either posted by a client or loaded
/// from the `reviews` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewInput {
    pub text: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl ReviewInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Calendar month (`YYYY-MM`) of the review date, if it parses.
    pub fn month(&self) -> Option<String> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc).format("%Y-%m").to_string());
        }
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%Y-%m").to_string())
    }

    /// Ratings outside 0..=5 are treated as missing.
    pub fn valid_rating(&self) -> Option<f64> {
        self.rating.filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
    }
}

/// How a topic was assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Llm,
    Keyword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_from_rfc3339_and_plain_dates() {
        assert_eq!(
            ReviewInput::new("x").with_date("2024-03-15T10:00:00Z").month().as_deref(),
            Some("2024-03")
        );
        assert_eq!(
            ReviewInput::new("x").with_date("2024-11-02").month().as_deref(),
            Some("2024-11")
        );
        assert_eq!(
            ReviewInput::new("x").with_date("2024-11-02 08:00:00").month().as_deref(),
            Some("2024-11")
        );
        assert_eq!(ReviewInput::new("x").with_date("last week").month(), None);
        assert_eq!(ReviewInput::new("x").month(), None);
    }

    #[test]
    fn out_of_range_ratings_are_ignored() {
        assert_eq!(ReviewInput::new("x").with_rating(4.0).valid_rating(), Some(4.0));
        assert_eq!(ReviewInput::new("x").with_rating(7.0).valid_rating(), None);
        assert_eq!(ReviewInput::new("x").with_rating(f64::NAN).valid_rating(), None);
    }

    #[test]
    fn review_input_accepts_minimal_json() {
        let review: ReviewInput = serde_json::from_str(r#"{"text": "ok"}"#).unwrap();
        assert_eq!(review.text, "ok");
        assert!(review.rating.is_none());
    }
}
