/// Result presentation helpers: filtering, truncation, clipboard summary, CSV export

use crate::comment::{Prediction, Sentiment, SentimentCounts, Statistics};
use regex::Regex;
use std::sync::OnceLock;

pub const PREVIEW_CHARS: usize = 150;

pub const POSITIVE_COLOR: &str = "#2ecc71";
pub const NEUTRAL_COLOR: &str = "#95a5a6";
pub const NEGATIVE_COLOR: &str = "#e74c3c";

/// Which predictions the comment list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Neutral,
    Negative,
}

impl SentimentFilter {
    pub const ALL: [SentimentFilter; 4] = [
        SentimentFilter::All,
        SentimentFilter::Positive,
        SentimentFilter::Neutral,
        SentimentFilter::Negative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SentimentFilter::All => "All",
            SentimentFilter::Positive => "Positive",
            SentimentFilter::Neutral => "Neutral",
            SentimentFilter::Negative => "Negative",
        }
    }

    pub fn matches(self, sentiment: &Sentiment) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Positive => *sentiment == Sentiment::Positive,
            SentimentFilter::Neutral => *sentiment == Sentiment::Neutral,
            SentimentFilter::Negative => *sentiment == Sentiment::Negative,
        }
    }

    pub fn apply(self, predictions: &[Prediction]) -> Vec<Prediction> {
        predictions
            .iter()
            .filter(|p| self.matches(&p.sentiment))
            .cloned()
            .collect()
    }
}

/// Is this tab URL a YouTube video page?
pub fn is_watch_page(url: &str) -> bool {
    static WATCH_PAGE: OnceLock<Option<Regex>> = OnceLock::new();
    WATCH_PAGE
        .get_or_init(|| Regex::new(r"^https?://([a-z0-9-]+\.)*youtube\.com/watch([?#/]|$)").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(url))
}

/// Shorten text to `max_chars` characters, appending "..." when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Plain-text summary copied to the clipboard
pub fn summary_text(predictions: &[Prediction]) -> String {
    let total = predictions.len();
    let SentimentCounts {
        positive,
        neutral,
        negative,
    } = SentimentCounts::tally(predictions);

    format!(
        "YouTube Sentiment Analysis\n\
         ==========================\n\
         Total comments: {}\n\
         Positive: {} ({:.1}%)\n\
         Neutral: {} ({:.1}%)\n\
         Negative: {} ({:.1}%)",
        total,
        positive,
        percent_of(positive, total),
        neutral,
        percent_of(neutral, total),
        negative,
        percent_of(negative, total),
    )
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV export of all predictions
pub fn to_csv(predictions: &[Prediction]) -> String {
    std::iter::once("Text,Sentiment,Confidence".to_string())
        .chain(predictions.iter().map(|p| {
            format!(
                "{},{},{:.4}",
                csv_quote(&p.text),
                p.sentiment.label(),
                p.confidence
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn csv_filename(timestamp_millis: i64) -> String {
    format!("sentiment-analysis-{}.csv", timestamp_millis)
}

/// CSS conic-gradient drawing the sentiment doughnut
pub fn chart_gradient(stats: &Statistics) -> String {
    let segments = [
        (stats.positive_percentage.max(0.0), POSITIVE_COLOR),
        (stats.neutral_percentage.max(0.0), NEUTRAL_COLOR),
        (stats.negative_percentage.max(0.0), NEGATIVE_COLOR),
    ];
    let sum: f64 = segments.iter().map(|(pct, _)| pct).sum();
    if sum <= 0.0 {
        return format!("conic-gradient({} 0% 100%)", NEUTRAL_COLOR);
    }

    let mut start = 0.0;
    let stops: Vec<String> = segments
        .iter()
        .map(|(pct, color)| {
            let end = start + pct / sum * 100.0;
            let stop = format!("{} {:.2}% {:.2}%", color, start, end);
            start = end;
            stop
        })
        .collect();

    format!("conic-gradient({})", stops.join(", "))
}
