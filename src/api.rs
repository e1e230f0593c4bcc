/// Client for the external sentiment analysis service

use crate::comment::{BatchRequest, BatchResponse, Comment, CommentText, HealthStatus};
use crate::error::AnalyzerError;
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

/// Largest batch the service accepts
pub const MAX_BATCH_SIZE: usize = 100;

/// Longest comment text the service accepts, in characters
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<ApiClient, AnalyzerError> {
        let base_url = crate::settings::validate_api_url(base_url)?;
        Ok(ApiClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AnalyzerError> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| AnalyzerError::InvalidApiUrl(format!("Invalid URL '{}': {}", raw, e)))
    }

    /// Classify comments, splitting into service-sized batches
    pub async fn predict_batch(&self, comments: &[Comment]) -> Result<BatchResponse, AnalyzerError> {
        let batches = build_batches(comments);
        if batches.is_empty() {
            return Err(AnalyzerError::NoComments);
        }

        let url = self.endpoint("predict_batch")?;
        let batch_count = batches.len();
        let mut parts = Vec::with_capacity(batch_count);

        for (i, batch) in batches.into_iter().enumerate() {
            log::info!(
                "Sending batch {}/{} ({} comments) to {}",
                i + 1,
                batch_count,
                batch.comments.len(),
                url
            );

            let response = self
                .client
                .post(url.clone())
                .header("Content-Type", "application/json")
                .json(&batch)
                .send()
                .await?;

            let response = check_status(response).await?;
            parts.push(response.json::<BatchResponse>().await?);
        }

        Ok(BatchResponse::merge(parts))
    }

    /// Query the service health endpoint
    pub async fn health(&self) -> Result<HealthStatus, AnalyzerError> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<HealthStatus>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, AnalyzerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body);
    log::error!("Service returned {}: {}", status, body);

    Err(AnalyzerError::ApiStatus {
        status: status.as_u16(),
        detail,
    })
}

/// Pull the `detail` message out of a FastAPI error body
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(message) => Some(message),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Truncate to the service's character limit
fn clamp_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Split comments into request bodies of at most `MAX_BATCH_SIZE` texts
pub fn build_batches(comments: &[Comment]) -> Vec<BatchRequest> {
    comments
        .chunks(MAX_BATCH_SIZE)
        .map(|chunk| BatchRequest {
            comments: chunk
                .iter()
                .map(|c| CommentText { text: clamp_text(&c.text) })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comments(n: usize) -> Vec<Comment> {
        (0..n)
            .map(|i| Comment {
                id: format!("comment_{}", i),
                text: format!("comment number {}", i),
                author: "Unknown".to_string(),
                likes: "0".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_build_batches_single() {
        let batches = build_batches(&comments(3));

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].comments[2].text, "comment number 2");
    }

    #[test]
    fn test_build_batches_splits_at_limit() {
        let batches = build_batches(&comments(250));

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].comments.len(), 100);
        assert_eq!(batches[1].comments.len(), 100);
        assert_eq!(batches[2].comments.len(), 50);
        assert_eq!(batches[2].comments[0].text, "comment number 200");
    }

    #[test]
    fn test_build_batches_empty() {
        assert!(build_batches(&[]).is_empty());
    }

    #[test]
    fn test_clamp_text() {
        let long = "é".repeat(MAX_TEXT_CHARS + 10);
        let clamped = clamp_text(&long);

        assert_eq!(clamped.chars().count(), MAX_TEXT_CHARS);
        assert_eq!(clamp_text("short"), "short");
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Modèles non chargés"}"#),
            Some("Modèles non chargés".to_string())
        );
        assert_eq!(error_detail("Internal Server Error"), None);
        assert!(error_detail(r#"{"detail": [{"msg": "too many"}]}"#).unwrap().contains("too many"));
    }

    #[test]
    fn test_client_endpoints() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint("predict_batch").unwrap().as_str(),
            "http://localhost:8000/predict_batch"
        );
        assert_eq!(client.endpoint("health").unwrap().as_str(), "http://localhost:8000/health");
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        assert!(matches!(ApiClient::new(""), Err(AnalyzerError::InvalidApiUrl(_))));
        assert!(matches!(ApiClient::new("localhost"), Err(AnalyzerError::InvalidApiUrl(_))));
    }
}
