//! Keyword topic classifier.
//!
//! Every topic carries three keyword lists. A primary hit is worth
//! [`PRIMARY_WEIGHT`], a secondary hit [`SECONDARY_WEIGHT`]; each keyword counts
//! once no matter how often it appears. Any exclude hit disqualifies the topic.
//! The highest score wins, earlier topics win ties, and a best score below
//! [`MATCH_THRESHOLD`] falls back to [`GENERAL_TOPIC`].

use lazy_static::lazy_static;
use serde::Serialize;

use crate::common::utils::normalize_text;

pub const PRIMARY_WEIGHT: u32 = 10;
pub const SECONDARY_WEIGHT: u32 = 5;
pub const MATCH_THRESHOLD: u32 = 5;
pub const GENERAL_TOPIC: &str = "General";

#[derive(Debug, Clone)]
pub struct TopicDefinition {
    pub name: String,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub exclude: Vec<String>,
}

impl TopicDefinition {
    fn new(name: &str, primary: &[&str], secondary: &[&str], exclude: &[&str]) -> Self {
        let norm = |list: &[&str]| -> Vec<String> { list.iter().map(|k| normalize_text(k)).collect() };
        Self {
            name: name.to_string(),
            primary: norm(primary),
            secondary: norm(secondary),
            exclude: norm(exclude),
        }
    }

    /// Ad-hoc topic for a caller supplied name that is not in the dictionary.
    fn literal(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            primary: vec![normalize_text(name)],
            secondary: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Score padded, normalized text. Returns `None` when an exclude keyword hits.
    fn score(&self, padded: &str) -> Option<(u32, Vec<String>)> {
        if self.exclude.iter().any(|k| contains_phrase(padded, k)) {
            return None;
        }

        let mut score = 0;
        let mut matched = Vec::new();
        for keyword in &self.primary {
            if contains_phrase(padded, keyword) {
                score += PRIMARY_WEIGHT;
                matched.push(keyword.clone());
            }
        }
        for keyword in &self.secondary {
            if contains_phrase(padded, keyword) {
                score += SECONDARY_WEIGHT;
                matched.push(keyword.clone());
            }
        }
        Some((score, matched))
    }
}

lazy_static! {
    /// Topic dictionary. Order matters: earlier topics win ties.
    pub static ref TOPICS: Vec<TopicDefinition> = vec![
        TopicDefinition::new(
            "Deposits",
            &["deposit", "deposits", "deposited", "depositing", "top up", "topped up", "add funds", "fund my account"],
            &["payment method", "card declined", "credit card", "debit card", "bank transfer", "minimum deposit"],
            &["security deposit", "deposit back"],
        ),
        TopicDefinition::new(
            "Withdrawals",
            &["withdraw", "withdrawal", "withdrawals", "withdrew", "withdrawing", "cash out", "cashout", "payout", "payouts"],
            &["pending", "processing time", "still waiting", "bank account", "my winnings", "my funds"],
            &[],
        ),
        TopicDefinition::new(
            "Customer Service",
            &["customer service", "customer support", "support team", "live chat", "support agent", "representative", "support"],
            &["helpful", "unhelpful", "rude", "responded", "response time", "no reply", "reply", "agent", "staff"],
            &[],
        ),
        TopicDefinition::new(
            "Account & Verification",
            &["verification", "verify", "verified", "kyc", "account locked", "account closed", "account suspended", "identity"],
            &["documents", "login", "log in", "password", "my account", "id"],
            &[],
        ),
        TopicDefinition::new(
            "Bonuses & Promotions",
            &["bonus", "bonuses", "promotion", "promotions", "promo", "free spins", "cashback", "loyalty", "rewards"],
            &["offer", "offers", "wagering", "points", "vip", "voucher", "discount code"],
            &[],
        ),
        TopicDefinition::new(
            "Refunds",
            &["refund", "refunds", "refunded", "money back", "chargeback"],
            &["cancel", "cancelled", "canceled", "dispute", "return"],
            &[],
        ),
        TopicDefinition::new(
            "Pricing & Fees",
            &["price", "prices", "pricing", "fee", "fees", "overcharged", "expensive", "subscription"],
            &["cheap", "affordable", "value for money", "hidden", "charged", "cost", "worth"],
            &[],
        ),
        TopicDefinition::new(
            "Delivery & Shipping",
            &["delivery", "delivered", "shipping", "shipped", "courier", "parcel", "package", "tracking number"],
            &["arrived", "late", "delayed", "damaged", "lost", "days to arrive"],
            &["payment delivered"],
        ),
        TopicDefinition::new(
            "Product Quality",
            &["quality", "defective", "broke", "broken", "durable", "well made", "cheaply made"],
            &["product", "item", "material", "design", "fits", "size"],
            &[],
        ),
        TopicDefinition::new(
            "Website & App",
            &["website", "app", "site", "interface", "crash", "crashes", "crashed", "bug", "bugs", "glitch"],
            &["slow", "loading", "easy to use", "user friendly", "navigate", "mobile", "update"],
            &["web of lies"],
        ),
        TopicDefinition::new(
            "Trust & Security",
            &["scam", "scammers", "fraud", "fraudulent", "stole", "stolen", "hacked", "legit", "trustworthy"],
            &["trust", "safe", "secure", "security", "rigged", "fake"],
            &[],
        ),
    ];
}

/// Result of keyword classification.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopicMatch {
    pub topic: String,
    pub score: u32,
    pub matched_keywords: Vec<String>,
}

impl TopicMatch {
    fn general() -> Self {
        Self {
            topic: GENERAL_TOPIC.to_string(),
            score: 0,
            matched_keywords: Vec::new(),
        }
    }

    pub fn is_general(&self) -> bool {
        self.topic == GENERAL_TOPIC
    }

    /// Rough 0..1 confidence derived from the score, for API responses.
    pub fn confidence(&self) -> f64 {
        if self.is_general() {
            return 0.0;
        }
        (self.score as f64 / (PRIMARY_WEIGHT * 3) as f64).min(1.0)
    }
}

fn contains_phrase(padded: &str, phrase: &str) -> bool {
    !phrase.is_empty() && padded.contains(&format!(" {} ", phrase))
}

fn best_match<'a>(text: &str, topics: impl IntoIterator<Item = &'a TopicDefinition>) -> TopicMatch {
    let padded = format!(" {} ", normalize_text(text));
    let mut best = TopicMatch::general();

    for topic in topics {
        let Some((score, matched)) = topic.score(&padded) else {
            continue;
        };
        if score > best.score {
            best = TopicMatch {
                topic: topic.name.clone(),
                score,
                matched_keywords: matched,
            };
        }
    }

    if best.score < MATCH_THRESHOLD {
        return TopicMatch::general();
    }
    best
}

/// Classify text against the full topic dictionary.
pub fn classify_topic_with_keywords(text: &str) -> TopicMatch {
    best_match(text, TOPICS.iter())
}

/// Classify text against a caller supplied list of topic names.
///
/// Names found in the dictionary (case-insensitive) use its keywords; unknown
/// names are matched literally as a single primary keyword. An empty list
/// means the full dictionary.
pub fn classify_against(text: &str, candidates: &[String]) -> TopicMatch {
    if candidates.is_empty() {
        return classify_topic_with_keywords(text);
    }

    let definitions: Vec<TopicDefinition> = candidates
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            find_topic(name)
                .cloned()
                .unwrap_or_else(|| TopicDefinition::literal(name))
        })
        .collect();

    best_match(text, definitions.iter())
}

/// Look up a dictionary topic by name, ignoring case and surrounding space.
pub fn find_topic(name: &str) -> Option<&'static TopicDefinition> {
    let wanted = name.trim();
    TOPICS.iter().find(|t| t.name.eq_ignore_ascii_case(wanted))
}

/// Names of all dictionary topics, in tie-break order.
pub fn topic_names() -> Vec<String> {
    TOPICS.iter().map(|t| t.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_money_is_deposits() {
        let result = classify_topic_with_keywords("I tried to deposit money three times");
        assert_eq!(result.topic, "Deposits");
        assert_eq!(result.score, PRIMARY_WEIGHT);
        assert_eq!(result.matched_keywords, vec!["deposit"]);
    }

    #[test]
    fn no_keywords_is_general() {
        let result = classify_topic_with_keywords("Lovely people, would come again.");
        assert!(result.is_general());
        assert_eq!(result.confidence(), 0.0);
    }

    #[test]
    fn secondary_hit_alone_meets_threshold() {
        let result = classify_topic_with_keywords("My card declined and nobody knew why");
        // "card declined" is a secondary Deposits keyword
        assert_eq!(result.topic, "Deposits");
        assert_eq!(result.score, SECONDARY_WEIGHT);
    }

    #[test]
    fn highest_score_wins() {
        let result = classify_topic_with_keywords(
            "The deposit was fine but my withdrawal has been pending for weeks, still waiting on the payout",
        );
        assert_eq!(result.topic, "Withdrawals");
        assert!(result.score > PRIMARY_WEIGHT);
    }

    #[test]
    fn ties_go_to_the_earlier_topic() {
        // one primary hit each for Deposits and Withdrawals
        let result = classify_topic_with_keywords("deposit and withdraw");
        assert_eq!(result.topic, "Deposits");
    }

    #[test]
    fn exclude_keyword_disqualifies_topic() {
        let result = classify_topic_with_keywords("They kept my security deposit");
        assert_ne!(result.topic, "Deposits");
    }

    #[test]
    fn keywords_match_on_word_boundaries() {
        // "app" must not match inside "happy" or "application"
        let result = classify_topic_with_keywords("Happy with the application process");
        assert_ne!(result.topic, "Website & App");
    }

    #[test]
    fn punctuation_does_not_hide_keywords() {
        let result = classify_topic_with_keywords("Total SCAM!!! Avoid.");
        assert_eq!(result.topic, "Trust & Security");
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let result = classify_topic_with_keywords("refund refund refund");
        assert_eq!(result.topic, "Refunds");
        assert_eq!(result.score, PRIMARY_WEIGHT);
    }

    #[test]
    fn candidates_restrict_the_dictionary() {
        let candidates = vec!["customer service".to_string(), "Refunds".to_string()];
        let result = classify_against("Support never answered about my deposit", &candidates);
        assert_eq!(result.topic, "Customer Service");
    }

    #[test]
    fn unknown_candidates_match_literally() {
        let candidates = vec!["Parking".to_string()];
        assert_eq!(
            classify_against("Parking was a nightmare", &candidates).topic,
            "Parking"
        );
        assert!(classify_against("Great food", &candidates).is_general());
    }

    #[test]
    fn empty_candidates_use_full_dictionary() {
        assert_eq!(classify_against("withdrawal stuck", &[]).topic, "Withdrawals");
    }

    #[test]
    fn confidence_is_capped() {
        let result = classify_topic_with_keywords(
            "withdraw withdrawal cash out payout pending still waiting",
        );
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn topic_lookup_is_case_insensitive() {
        assert!(find_topic(" deposits ").is_some());
        assert!(find_topic("Astrology").is_none());
        assert_eq!(topic_names().first().map(String::as_str), Some("Deposits"));
    }
}
