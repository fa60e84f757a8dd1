//! Word-list sentiment heuristic.
//!
//! Counts positive and negative words; a negator in the two preceding tokens
//! flips the hit ("not good" counts as negative, "not bad" as positive). The
//! larger count wins and equal counts are neutral.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;

use super::types::Sentiment;
use crate::common::utils::normalize_text;

lazy_static! {
    static ref POSITIVE_WORDS: HashSet<&'static str> = [
        "good", "great", "excellent", "amazing", "awesome", "love", "loved", "lovely",
        "fantastic", "helpful", "friendly", "fast", "quick", "quickly", "easy", "recommend",
        "recommended", "best", "happy", "satisfied", "smooth", "reliable", "perfect",
        "wonderful", "professional", "efficient", "pleased", "trustworthy", "legit", "nice",
        "brilliant", "outstanding", "responsive", "superb", "polite", "seamless", "instant",
    ]
    .into_iter()
    .collect();

    static ref NEGATIVE_WORDS: HashSet<&'static str> = [
        "bad", "terrible", "awful", "horrible", "worst", "poor", "slow", "rude", "scam",
        "fraud", "disappointed", "disappointing", "useless", "waste", "unhelpful", "hate",
        "problem", "problems", "issue", "issues", "broken", "delayed", "late", "refused",
        "stolen", "avoid", "annoying", "frustrating", "ignored", "complaint", "unacceptable",
        "nightmare", "difficult", "fake", "rigged", "locked", "pathetic", "joke",
    ]
    .into_iter()
    .collect();

    static ref NEGATORS: HashSet<&'static str> = [
        "not", "no", "never", "don't", "dont", "didn't", "didnt", "isn't", "isnt", "wasn't",
        "wasnt", "won't", "wont", "can't", "cant", "cannot", "hardly", "nothing",
    ]
    .into_iter()
    .collect();
}

/// How many preceding tokens a negator may sit in.
const NEGATION_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub positive_hits: u32,
    pub negative_hits: u32,
}

/// Score free text with the word lists.
pub fn score_sentiment(text: &str) -> SentimentScore {
    let normalized = normalize_text(text);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let mut positive_hits = 0;
    let mut negative_hits = 0;

    for (i, token) in tokens.iter().enumerate() {
        let polarity = if POSITIVE_WORDS.contains(*token) {
            1
        } else if NEGATIVE_WORDS.contains(*token) {
            -1
        } else {
            continue;
        };

        let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
            .iter()
            .any(|t| NEGATORS.contains(*t));

        if (polarity > 0) != negated {
            positive_hits += 1;
        } else {
            negative_hits += 1;
        }
    }

    let label = if positive_hits > negative_hits {
        Sentiment::Positive
    } else if negative_hits > positive_hits {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    SentimentScore {
        label,
        positive_hits,
        negative_hits,
    }
}

/// Sentiment of one review: the star rating decides when present, the text
/// heuristic otherwise.
pub fn sentiment_for_review(text: &str, rating: Option<f64>) -> Sentiment {
    match rating {
        Some(r) if r >= 4.0 => Sentiment::Positive,
        Some(r) if r <= 2.0 => Sentiment::Negative,
        Some(_) => Sentiment::Neutral,
        None => score_sentiment(text).label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_positive() {
        let score = score_sentiment("Great service, fast payouts, but the app is slow");
        assert_eq!(score.positive_hits, 2);
        assert_eq!(score.negative_hits, 1);
        assert_eq!(score.label, Sentiment::Positive);
    }

    #[test]
    fn majority_negative() {
        let score = score_sentiment("Terrible support and a rude agent. Avoid!");
        assert_eq!(score.label, Sentiment::Negative);
        assert_eq!(score.negative_hits, 3);
    }

    #[test]
    fn tie_is_neutral() {
        assert_eq!(score_sentiment("Good odds, bad app").label, Sentiment::Neutral);
    }

    #[test]
    fn no_sentiment_words_is_neutral() {
        let score = score_sentiment("I opened an account on Tuesday");
        assert_eq!(score.label, Sentiment::Neutral);
        assert_eq!(score.positive_hits + score.negative_hits, 0);
    }

    #[test]
    fn negation_flips_polarity() {
        assert_eq!(score_sentiment("not good at all").label, Sentiment::Negative);
        assert_eq!(score_sentiment("honestly not that bad").label, Sentiment::Positive);
        assert_eq!(score_sentiment("Don't recommend").label, Sentiment::Negative);
    }

    #[test]
    fn curly_apostrophe_negates() {
        let score = score_sentiment("I don\u{2019}t recommend them");
        assert_eq!(score.label, Sentiment::Negative);
        assert_eq!(score.positive_hits, 0);
        assert_eq!(score.negative_hits, 1);
    }

    #[test]
    fn negation_window_is_limited() {
        // "not" is three tokens before "helpful"
        let score = score_sentiment("not sure why, helpful");
        assert_eq!(score.label, Sentiment::Positive);
    }

    #[test]
    fn rating_overrides_text() {
        assert_eq!(sentiment_for_review("terrible", Some(5.0)), Sentiment::Positive);
        assert_eq!(sentiment_for_review("great", Some(1.0)), Sentiment::Negative);
        assert_eq!(sentiment_for_review("great", Some(3.0)), Sentiment::Neutral);
        assert_eq!(sentiment_for_review("great", None), Sentiment::Positive);
    }

    #[test]
    fn fractional_ratings_use_thresholds() {
        assert_eq!(sentiment_for_review("", Some(4.5)), Sentiment::Positive);
        assert_eq!(sentiment_for_review("", Some(2.5)), Sentiment::Neutral);
        assert_eq!(sentiment_for_review("", Some(2.0)), Sentiment::Negative);
    }
}
