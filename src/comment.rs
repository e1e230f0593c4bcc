/// Data structures for comments, predictions and the sentiment API wire format
use serde::{Deserialize, Serialize};

/// A comment scraped from the watch page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub likes: String,
}

impl Comment {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    /// Build a comment from raw node texts. Returns None when the text is blank.
    pub fn from_parts(
        index: usize,
        text: &str,
        author: Option<&str>,
        likes: Option<&str>,
    ) -> Option<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(Self::UNKNOWN_AUTHOR);
        let likes = likes.map(str::trim).filter(|l| !l.is_empty()).unwrap_or("0");

        Some(Comment {
            id: format!("comment_{}", index),
            text: text.to_string(),
            author: author.to_string(),
            likes: likes.to_string(),
        })
    }
}

/// Sentiment class as labelled by the analysis service
///
/// Labels outside the three known classes are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl Sentiment {
    /// Label as the service writes it
    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "Positif",
            Sentiment::Neutral => "Neutre",
            Sentiment::Negative => "Négatif",
            Sentiment::Other(label) => label,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Neutral => "😐",
            Sentiment::Negative => "😞",
            Sentiment::Other(_) => "❓",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Other(_) => "unknown",
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "positif" | "positive" => Sentiment::Positive,
            "neutre" | "neutral" => Sentiment::Neutral,
            "négatif" | "negatif" | "negative" => Sentiment::Negative,
            _ => Sentiment::Other(label),
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// Per-comment classification returned by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u8>,
}

/// Aggregate over a set of predictions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub positive_percentage: f64,
    pub neutral_percentage: f64,
    pub negative_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
}

/// Per-class counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn tally(predictions: &[Prediction]) -> SentimentCounts {
        predictions
            .iter()
            .fold(SentimentCounts::default(), |mut counts, p| {
                match &p.sentiment {
                    Sentiment::Positive => counts.positive += 1,
                    Sentiment::Neutral => counts.neutral += 1,
                    Sentiment::Negative => counts.negative += 1,
                    Sentiment::Other(_) => {}
                }
                counts
            })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Statistics {
    /// Recompute statistics locally, rounding the way the service does
    pub fn from_predictions(predictions: &[Prediction]) -> Statistics {
        if predictions.is_empty() {
            return Statistics {
                average_confidence: Some(0.0),
                ..Statistics::default()
            };
        }

        let total = predictions.len() as f64;
        let counts = SentimentCounts::tally(predictions);
        let pct = |n: usize| round_to(n as f64 / total * 100.0, 2);
        let mean = predictions.iter().map(|p| p.confidence).sum::<f64>() / total;

        Statistics {
            positive_percentage: pct(counts.positive),
            neutral_percentage: pct(counts.neutral),
            negative_percentage: pct(counts.negative),
            average_confidence: Some(round_to(mean, 4)),
        }
    }

    /// Derive per-class counts from the percentages
    pub fn counts(&self, total: usize) -> SentimentCounts {
        let count = |pct: f64| (total as f64 * pct / 100.0).round().max(0.0) as usize;
        SentimentCounts {
            positive: count(self.positive_percentage),
            neutral: count(self.neutral_percentage),
            negative: count(self.negative_percentage),
        }
    }
}

/// One text in a batch request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentText {
    pub text: String,
}

/// Body of `POST /predict_batch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchRequest {
    pub comments: Vec<CommentText>,
}

/// Response of `POST /predict_batch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResponse {
    pub predictions: Vec<Prediction>,
    pub statistics: Statistics,
    pub total_comments: usize,
}

impl BatchResponse {
    /// Merge responses of consecutive batches into one
    pub fn merge(mut parts: Vec<BatchResponse>) -> BatchResponse {
        if parts.len() == 1 {
            if let Some(single) = parts.pop() {
                return single;
            }
        }

        let predictions: Vec<Prediction> = parts
            .into_iter()
            .flat_map(|part| part.predictions)
            .collect();

        BatchResponse {
            statistics: Statistics::from_predictions(&predictions),
            total_comments: predictions.len(),
            predictions,
        }
    }
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub vectorizer_loaded: bool,
    #[serde(default)]
    pub model_type: Option<String>,
}
