//! VOC analysis built from a batch of reviews.
//!
//! [`generate_analysis`] is pure: it classifies every review by topic and
//! sentiment and aggregates the results into the JSON blob stored on
//! `voc_reports.analysis`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::sentiment::sentiment_for_review;
use super::topics::{classify_topic_with_keywords, GENERAL_TOPIC};
use super::types::{ClassificationMethod, ReviewInput, Sentiment};

/// Sample quotes kept per topic.
const MAX_QUOTES: usize = 3;
/// Quotes longer than this are cut on a char boundary.
const MAX_QUOTE_CHARS: usize = 200;
/// Below this many reviews the analysis carries a "collect more data" note.
const MIN_RELIABLE_REVIEWS: usize = 10;
/// Sentiment score (percentage points) needed to call the overall mood.
const OVERALL_SENTIMENT_MARGIN: i32 = 10;
/// Month-over-month rating change reported as a trend.
const TREND_DELTA: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VocAnalysis {
    pub summary: AnalysisSummary,
    pub sentiment: SentimentBreakdown,
    pub rating_distribution: BTreeMap<String, usize>,
    pub topics: Vec<TopicSummary>,
    pub sources: Vec<SourceSummary>,
    pub trends: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
    pub method: ClassificationMethod,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSummary {
    pub total_reviews: usize,
    pub average_rating: Option<f64>,
    pub overall_sentiment: Sentiment,
    /// Percentage of positive minus percentage of negative reviews (-100..=100)
    pub sentiment_score: i32,
    pub overview: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicSummary {
    pub topic: String,
    pub mentions: usize,
    pub share_pct: f64,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub sentiment: Sentiment,
    pub sample_quotes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSummary {
    pub source: String,
    pub reviews: usize,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month: String,
    pub reviews: usize,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Strength,
    Weakness,
    Trend,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

#[derive(Default)]
struct TopicAccumulator {
    mentions: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
    quotes: Vec<String>,
}

#[derive(Default)]
struct RatingAccumulator {
    count: usize,
    rated: usize,
    sum: f64,
}

impl RatingAccumulator {
    fn add(&mut self, rating: Option<f64>) {
        self.count += 1;
        if let Some(r) = rating {
            self.rated += 1;
            self.sum += r;
        }
    }

    fn average(&self) -> Option<f64> {
        (self.rated > 0).then(|| round2(self.sum / self.rated as f64))
    }
}

/// Build the VOC analysis for a set of reviews.
pub fn generate_analysis(reviews: &[ReviewInput]) -> VocAnalysis {
    let total = reviews.len();
    let mut sentiment = SentimentBreakdown::default();
    let mut distribution: BTreeMap<String, usize> =
        (1..=5).map(|star| (star.to_string(), 0)).collect();
    let mut topics: HashMap<String, TopicAccumulator> = HashMap::new();
    let mut sources: HashMap<String, RatingAccumulator> = HashMap::new();
    let mut months: BTreeMap<String, RatingAccumulator> = BTreeMap::new();
    let mut overall = RatingAccumulator::default();

    for review in reviews {
        let rating = review.valid_rating();
        let label = sentiment_for_review(&review.text, rating);
        match label {
            Sentiment::Positive => sentiment.positive += 1,
            Sentiment::Neutral => sentiment.neutral += 1,
            Sentiment::Negative => sentiment.negative += 1,
        }

        overall.add(rating);
        if let Some(r) = rating {
            let star = (r.round() as i64).clamp(1, 5);
            *distribution.entry(star.to_string()).or_default() += 1;
        }

        let source = review
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "unknown".to_string());
        sources.entry(source).or_default().add(rating);

        if let Some(month) = review.month() {
            months.entry(month).or_default().add(rating);
        }

        let topic = classify_topic_with_keywords(&review.text);
        let acc = topics.entry(topic.topic).or_default();
        acc.mentions += 1;
        match label {
            Sentiment::Positive => acc.positive += 1,
            Sentiment::Neutral => acc.neutral += 1,
            Sentiment::Negative => acc.negative += 1,
        }
        if acc.quotes.len() < MAX_QUOTES && !review.text.trim().is_empty() {
            acc.quotes.push(truncate_quote(review.text.trim()));
        }
    }

    sentiment.positive_pct = pct(sentiment.positive, total);
    sentiment.neutral_pct = pct(sentiment.neutral, total);
    sentiment.negative_pct = pct(sentiment.negative, total);

    let sentiment_score = if total == 0 {
        0
    } else {
        ((sentiment.positive as f64 - sentiment.negative as f64) / total as f64 * 100.0).round()
            as i32
    };
    let overall_sentiment = if sentiment_score >= OVERALL_SENTIMENT_MARGIN {
        Sentiment::Positive
    } else if sentiment_score <= -OVERALL_SENTIMENT_MARGIN {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let mut topic_summaries: Vec<TopicSummary> = topics
        .into_iter()
        .map(|(topic, acc)| TopicSummary {
            sentiment: dominant(acc.positive, acc.negative),
            share_pct: pct(acc.mentions, total),
            topic,
            mentions: acc.mentions,
            positive: acc.positive,
            neutral: acc.neutral,
            negative: acc.negative,
            sample_quotes: acc.quotes,
        })
        .collect();
    topic_summaries.sort_by(|a, b| b.mentions.cmp(&a.mentions).then_with(|| a.topic.cmp(&b.topic)));

    let mut source_summaries: Vec<SourceSummary> = sources
        .into_iter()
        .map(|(source, acc)| SourceSummary {
            source,
            reviews: acc.count,
            average_rating: acc.average(),
        })
        .collect();
    source_summaries.sort_by(|a, b| b.reviews.cmp(&a.reviews).then_with(|| a.source.cmp(&b.source)));

    let trends: Vec<TrendPoint> = months
        .into_iter()
        .map(|(month, acc)| TrendPoint {
            month,
            reviews: acc.count,
            average_rating: acc.average(),
        })
        .collect();

    let average_rating = overall.average();
    let summary = AnalysisSummary {
        total_reviews: total,
        average_rating,
        overall_sentiment,
        sentiment_score,
        overview: overview(total, source_summaries.len(), overall_sentiment, average_rating),
    };

    let insights = build_insights(&summary, &topic_summaries, &trends);

    VocAnalysis {
        summary,
        sentiment,
        rating_distribution: distribution,
        topics: topic_summaries,
        sources: source_summaries,
        trends,
        insights,
        method: ClassificationMethod::Keyword,
        generated_at: Utc::now(),
    }
}

fn overview(
    total: usize,
    source_count: usize,
    overall: Sentiment,
    average_rating: Option<f64>,
) -> String {
    if total == 0 {
        return "No reviews were available to analyze.".to_string();
    }

    let mood = match overall {
        Sentiment::Positive => "mostly positive",
        Sentiment::Neutral => "mixed",
        Sentiment::Negative => "mostly negative",
    };
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{} {}", n, word)
        } else {
            format!("{} {}s", n, word)
        }
    };

    let mut text = format!(
        "Based on {} across {}, customer sentiment is {}",
        plural(total, "review"),
        plural(source_count, "source"),
        mood
    );
    if let Some(avg) = average_rating {
        text.push_str(&format!(" with an average rating of {:.1}/5", avg));
    }
    text.push('.');
    text
}

fn build_insights(
    summary: &AnalysisSummary,
    topics: &[TopicSummary],
    trends: &[TrendPoint],
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let named: Vec<&TopicSummary> = topics.iter().filter(|t| t.topic != GENERAL_TOPIC).collect();

    // topics are sorted by mentions, so the first named one is the most discussed
    if let Some(top) = named.first() {
        insights.push(Insight {
            kind: InsightKind::Info,
            message: format!(
                "{} is the most discussed topic ({} mentions, {:.1}% of reviews).",
                top.topic, top.mentions, top.share_pct
            ),
        });
    }

    if let Some(worst) = max_by_count(&named, |t| t.negative) {
        insights.push(Insight {
            kind: InsightKind::Weakness,
            message: format!(
                "{} draws the most complaints ({} negative mentions).",
                worst.topic, worst.negative
            ),
        });
    }

    if let Some(best) = max_by_count(&named, |t| t.positive) {
        insights.push(Insight {
            kind: InsightKind::Strength,
            message: format!(
                "Customers praise {} most often ({} positive mentions).",
                best.topic, best.positive
            ),
        });
    }

    match summary.average_rating {
        Some(avg) if avg < 3.0 => insights.push(Insight {
            kind: InsightKind::Weakness,
            message: format!("The average rating of {:.1}/5 is below three stars.", avg),
        }),
        Some(avg) if avg >= 4.0 => insights.push(Insight {
            kind: InsightKind::Strength,
            message: format!("Customers rate the business highly ({:.1}/5 on average).", avg),
        }),
        _ => {}
    }

    let rated: Vec<(&str, f64)> = trends
        .iter()
        .filter_map(|t| t.average_rating.map(|avg| (t.month.as_str(), avg)))
        .collect();
    if let [.., (prev_month, prev), (last_month, last)] = rated.as_slice() {
        let delta = last - prev;
        if delta >= TREND_DELTA {
            insights.push(Insight {
                kind: InsightKind::Trend,
                message: format!(
                    "Ratings improved from {:.1} in {} to {:.1} in {}.",
                    prev, prev_month, last, last_month
                ),
            });
        } else if delta <= -TREND_DELTA {
            insights.push(Insight {
                kind: InsightKind::Trend,
                message: format!(
                    "Ratings declined from {:.1} in {} to {:.1} in {}.",
                    prev, prev_month, last, last_month
                ),
            });
        }
    }

    if summary.total_reviews < MIN_RELIABLE_REVIEWS {
        insights.push(Insight {
            kind: InsightKind::Info,
            message: format!(
                "Only {} reviews were found; collect more for reliable results.",
                summary.total_reviews
            ),
        });
    }

    insights
}

/// First topic with the strictly highest non-zero count.
fn max_by_count<'a>(
    topics: &[&'a TopicSummary],
    count: impl Fn(&TopicSummary) -> usize,
) -> Option<&'a TopicSummary> {
    let mut best: Option<&'a TopicSummary> = None;
    for &topic in topics {
        let n = count(topic);
        if n > 0 && best.map_or(true, |b| n > count(b)) {
            best = Some(topic);
        }
    }
    best
}

fn dominant(positive: usize, negative: usize) -> Sentiment {
    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truncate_quote(text: &str) -> String {
    if text.chars().count() <= MAX_QUOTE_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_QUOTE_CHARS).collect();
    format!("{}…", cut.trim_end())
}
