//! HTTP behaviour of the sentiment API client against a mock service
#![cfg(not(target_arch = "wasm32"))]

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt_sentiment_analyzer::api::ApiClient;
use yt_sentiment_analyzer::comment::{Comment, Sentiment};
use yt_sentiment_analyzer::error::AnalyzerError;

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

fn batch_body() -> Value {
    json!({
        "predictions": [
            {"text": "love it", "sentiment": "Positif", "confidence": 0.9, "label": 2},
            {"text": "hate it", "sentiment": "Négatif", "confidence": 0.7, "label": 0}
        ],
        "statistics": {
            "negative_percentage": 50.0,
            "neutral_percentage": 0.0,
            "positive_percentage": 50.0,
            "average_confidence": 0.8
        },
        "total_comments": 2
    })
}

#[tokio::test]
async fn predict_batch_posts_json_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batch_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let response = client.predict_batch(&comments(2)).await.unwrap();

    assert_eq!(response.total_comments, 2);
    assert_eq!(response.predictions[0].sentiment, Sentiment::Positive);
    assert_eq!(response.statistics.positive_percentage, 50.0);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["comments"][1]["text"], "comment number 1");
}

#[tokio::test]
async fn predict_batch_splits_large_inputs_and_merges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batch_body()))
        .expect(3)
        .mount(&server)
        .await;

    let client = ApiClient::new(&format!("{}/", server.uri())).unwrap();
    let response = client.predict_batch(&comments(250)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["comments"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let last: Value = serde_json::from_slice(&requests[2].body).unwrap();
    assert_eq!(last["comments"][0]["text"], "comment number 200");

    // Three mocked replies of two predictions each, statistics recomputed locally
    assert_eq!(response.total_comments, 6);
    assert_eq!(response.predictions.len(), 6);
    assert_eq!(response.statistics.positive_percentage, 50.0);
    assert_eq!(response.statistics.negative_percentage, 50.0);
    assert_eq!(response.statistics.average_confidence, Some(0.8));
}

#[tokio::test]
async fn predict_batch_reports_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "Modèles non chargés"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.predict_batch(&comments(1)).await.unwrap_err();

    assert_eq!(
        err,
        AnalyzerError::ApiStatus {
            status: 503,
            detail: Some("Modèles non chargés".to_string()),
        }
    );
}

#[tokio::test]
async fn predict_batch_status_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict_batch"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.predict_batch(&comments(1)).await.unwrap_err();

    assert_eq!(err, AnalyzerError::ApiStatus { status: 500, detail: None });
}

#[tokio::test]
async fn predict_batch_rejects_empty_input_locally() {
    let server = MockServer::start().await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.predict_batch(&[]).await.unwrap_err();

    assert_eq!(err, AnalyzerError::NoComments);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn health_decodes_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "model_loaded": true,
            "vectorizer_loaded": true,
            "model_type": "LogisticRegression"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let health = client.health().await.unwrap();

    assert_eq!(health.status, "healthy");
    assert!(health.model_loaded);
    assert_eq!(health.model_type.as_deref(), Some("LogisticRegression"));
}

#[tokio::test]
async fn health_fails_when_models_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "Modèles non chargés"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, AnalyzerError::ApiStatus { status: 503, .. }));
}
