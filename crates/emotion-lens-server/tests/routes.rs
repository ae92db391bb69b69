//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use emotion_lens_core::config::LimitsConfig;
use emotion_lens_core::{
    ClassifierError, ClassifierHandles, ClassifierResult, EmotionClassifier, EmotionEngine,
    RawEmotion, SentimentClassifier, SentimentResult,
};
use emotion_lens_server::{create_router, AppState};

struct Fixed(Vec<RawEmotion>);

#[async_trait]
impl EmotionClassifier for Fixed {
    async fn classify(&self, _text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct Broken;

#[async_trait]
impl EmotionClassifier for Broken {
    async fn classify(&self, _text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        Err(ClassifierError::invalid_response("tensor shape mismatch at layer 7"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

struct Slow;

#[async_trait]
impl EmotionClassifier for Slow {
    async fn classify(&self, _text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(vec![])
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Records the text each classifier call received.
#[derive(Default)]
struct Recording {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl EmotionClassifier for Recording {
    async fn classify(&self, text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        self.seen.lock().await.push(text.to_string());
        Ok(vec![RawEmotion::new("love", 0.8)])
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[async_trait]
impl SentimentClassifier for Recording {
    async fn classify(&self, text: &str) -> ClassifierResult<SentimentResult> {
        self.seen.lock().await.push(text.to_string());
        Ok(SentimentResult::new("POSITIVE", 0.9))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct Positive;

#[async_trait]
impl SentimentClassifier for Positive {
    async fn classify(&self, _text: &str) -> ClassifierResult<SentimentResult> {
        Ok(SentimentResult::new("POSITIVE", 0.99))
    }

    fn name(&self) -> &str {
        "positive"
    }
}

fn reference_emotions() -> Vec<RawEmotion> {
    vec![
        RawEmotion::new("optimism", 0.9),
        RawEmotion::new("pride", 0.4),
        RawEmotion::new("anger", 0.95),
    ]
}

fn router_with(
    emotion: Option<Arc<dyn EmotionClassifier>>,
    sentiment: Option<Arc<dyn SentimentClassifier>>,
) -> Router {
    router_with_limits(emotion, sentiment, LimitsConfig::default(), Duration::from_secs(5))
}

fn router_with_limits(
    emotion: Option<Arc<dyn EmotionClassifier>>,
    sentiment: Option<Arc<dyn SentimentClassifier>>,
    limits: LimitsConfig,
    timeout: Duration,
) -> Router {
    let engine = Arc::new(EmotionEngine::new(ClassifierHandles::new(emotion, sentiment)));
    create_router(AppState::new(engine, limits, timeout))
}

fn default_router() -> Router {
    router_with(
        Some(Arc::new(Fixed(reference_emotions()))),
        Some(Arc::new(Positive)),
    )
}

fn analyze_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_analyze_success_shape() {
    let (status, body) = send(
        default_router(),
        analyze_request(json!({"text": "We did it!"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Emotions analyzed successfully using ML model");
    assert_eq!(body["confidence"], 1.0);
    assert_eq!(body["sentiment"], json!({"label": "POSITIVE", "score": 0.99}));

    let emotions = body["emotions"].as_object().unwrap();
    assert_eq!(emotions.len(), 4);
    assert_eq!(emotions["hope"], 1.0);
    assert_eq!(emotions["love"], 0.0);
    assert_eq!(emotions["nostalgia"], 0.0);
    let pride = emotions["pride"].as_f64().unwrap();
    assert!((pride - 0.4 / 0.855).abs() < 1e-9);

    assert!(body.get("raw_emotions").is_none(), "raw output stays internal");
}

#[tokio::test]
async fn test_missing_text_field() {
    let (status, body) = send(default_router(), analyze_request("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Text field is required"}));
}

#[tokio::test]
async fn test_non_string_text() {
    let (status, body) = send(default_router(), analyze_request(r#"{"text": 42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text field is required");
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = send(default_router(), analyze_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text field is required");
}

#[tokio::test]
async fn test_blank_text() {
    for text in ["", "   ", "\n\t"] {
        let (status, body) = send(
            default_router(),
            analyze_request(json!({ "text": text }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", text);
        assert_eq!(body["error"], "Text field is required");
    }
}

#[tokio::test]
async fn test_length_limit() {
    let at_limit = "a".repeat(5000);
    let (status, _) = send(
        default_router(),
        analyze_request(json!({ "text": at_limit }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let over_limit = "a".repeat(5001);
    let (status, body) = send(
        default_router(),
        analyze_request(json!({ "text": over_limit }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Text is too long (max 5000 characters)"})
    );
}

#[tokio::test]
async fn test_padding_does_not_count_toward_limit() {
    let padded = format!("  {}     ", "a".repeat(4999));
    let (status, body) = send(
        default_router(),
        analyze_request(json!({ "text": padded }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let padded_over = format!(" {} ", "a".repeat(5001));
    let (status, _) = send(
        default_router(),
        analyze_request(json!({ "text": padded_over }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_classifiers_receive_stripped_text() {
    let emotion = Recording::default();
    let sentiment = Recording::default();
    let emotion_seen = Arc::clone(&emotion.seen);
    let sentiment_seen = Arc::clone(&sentiment.seen);
    let router = router_with(Some(Arc::new(emotion)), Some(Arc::new(sentiment)));

    let (status, _) = send(
        router,
        analyze_request(json!({"text": "  hello \n\t"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*emotion_seen.lock().await, vec!["hello".to_string()]);
    assert_eq!(*sentiment_seen.lock().await, vec!["hello".to_string()]);
}

#[tokio::test]
async fn test_configured_length_limit_in_message() {
    let router = router_with_limits(
        Some(Arc::new(Fixed(vec![]))),
        None,
        LimitsConfig {
            max_text_chars: 10,
            sentiment_max_chars: 5,
        },
        Duration::from_secs(5),
    );
    let (status, body) = send(
        router,
        analyze_request(json!({"text": "eleven chars"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text is too long (max 10 characters)");
}

#[tokio::test]
async fn test_model_unavailable_is_503() {
    let router = router_with(None, Some(Arc::new(Positive)));
    let (status, body) = send(router, analyze_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"success": false, "error": "Failed to analyze text"}));
}

#[tokio::test]
async fn test_inference_error_is_500_without_detail() {
    let router = router_with(Some(Arc::new(Broken)), None);
    let (status, body) = send(router, analyze_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to analyze text");
    assert!(!body.to_string().contains("tensor"));
}

#[tokio::test]
async fn test_deadline_is_504() {
    let router = router_with_limits(
        Some(Arc::new(Slow)),
        None,
        LimitsConfig::default(),
        Duration::from_millis(50),
    );
    let (status, body) = send(router, analyze_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Failed to analyze text");
}

#[tokio::test]
async fn test_missing_sentiment_is_null() {
    let router = router_with(Some(Arc::new(Fixed(reference_emotions()))), None);
    let (status, body) = send(router, analyze_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["sentiment"].is_null());
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_empty_classification_is_success_not_error() {
    let router = router_with(Some(Arc::new(Fixed(vec![]))), None);
    let (status, body) = send(router, analyze_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(
        body["emotions"],
        json!({"pride": 0.0, "nostalgia": 0.0, "love": 0.0, "hope": 0.0})
    );
}

#[tokio::test]
async fn test_health_reports_each_classifier() {
    let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(default_router(), request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "emotion_model_loaded": true, "sentiment_model_loaded": true})
    );

    let (_, body) = send(router_with(None, Some(Arc::new(Positive))), request()).await;
    assert_eq!(body["emotion_model_loaded"], false);
    assert_eq!(body["sentiment_model_loaded"], true);
}
