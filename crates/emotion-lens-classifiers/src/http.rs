//! Hugging Face style inference client.
//!
//! Talks to any text-classification endpoint that accepts
//! `POST {endpoint}/{model}` with `{"inputs": "..."}` and answers with a
//! list of `{label, score}` pairs. Both the flat `[{..}]` and the nested
//! `[[{..}]]` shapes are accepted. Every request sets
//! `options.wait_for_model` so a cold model is loaded rather than refused.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use emotion_lens_core::config::ClassifierConfig;
use emotion_lens_core::{
    ClassifierError, ClassifierResult, EmotionClassifier, RawEmotion, SentimentClassifier,
    SentimentResult,
};

/// Longest error body echoed into [`ClassifierError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Connection settings for one inference model.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL; the model id is appended as a path segment.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl HttpClientConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> ClassifierResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ClassifierError::config("endpoint cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(ClassifierError::config("model cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ClassifierError::config("timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl From<&ClassifierConfig> for HttpClientConfig {
    fn from(cfg: &ClassifierConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }
}

/// One `{label, score}` pair as returned by the inference service.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Response shapes seen from text-classification endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    /// One list per input. We always send a single input.
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Nested(lists) => lists.into_iter().next().unwrap_or_default(),
            Self::Flat(scores) => scores,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<InferenceParameters>,
    options: InferenceOptions,
}

/// `top_k: null` asks the pipeline for every label.
#[derive(Debug, Serialize)]
struct InferenceParameters {
    top_k: Option<u32>,
}

/// `wait_for_model` makes a cold endpoint hold the request while the model
/// loads instead of answering 503.
#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

const WAIT_FOR_MODEL: InferenceOptions = InferenceOptions {
    wait_for_model: true,
};

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// HTTP client bound to one model.
pub struct HfInferenceClient {
    config: HttpClientConfig,
    http: Client,
}

impl HfInferenceClient {
    pub fn new(config: HttpClientConfig) -> ClassifierResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClassifierError::config)?;

        Ok(Self { config, http })
    }

    /// Full model URL.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Add authorization header if API key is configured.
    fn auth_header(&self) -> Option<(&'static str, String)> {
        self.config
            .api_key
            .as_ref()
            .map(|key| ("Authorization", format!("Bearer {}", key)))
    }

    /// Classify `text`, optionally asking for every label.
    pub async fn classify(&self, text: &str, all_labels: bool) -> ClassifierResult<Vec<LabelScore>> {
        let body = InferenceRequest {
            inputs: text,
            parameters: all_labels.then_some(InferenceParameters { top_k: None }),
            options: WAIT_FOR_MODEL,
        };

        let mut request = self.http.post(self.url()).json(&body);
        if let Some((key, value)) = self.auth_header() {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message: api_error_message(&raw),
            });
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| self.decode_error(e))?;
        let scores = parsed.into_scores();

        debug!(model = %self.config.model, labels = scores.len(), "Inference response");
        Ok(scores)
    }

    fn transport_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_timeout() {
            ClassifierError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            ClassifierError::Http {
                message: e.to_string(),
            }
        }
    }

    fn decode_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_timeout() {
            self.transport_error(e)
        } else {
            ClassifierError::invalid_response(e)
        }
    }
}

/// Prefer the `{"error": ".."}` field, else a bounded slice of the body.
fn api_error_message(raw: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(raw) {
        Ok(body) => body.error,
        Err(_) => raw.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

/// Emotion capability over [`HfInferenceClient`]. Returns every label.
pub struct HttpEmotionClassifier {
    client: HfInferenceClient,
    name: String,
}

impl HttpEmotionClassifier {
    pub fn new(config: HttpClientConfig) -> ClassifierResult<Self> {
        let name = format!("http:{}", config.model);
        Ok(Self {
            client: HfInferenceClient::new(config)?,
            name,
        })
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        let scores = self.client.classify(text, true).await?;
        Ok(scores
            .into_iter()
            .map(|s| RawEmotion::new(s.label, s.score))
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sentiment capability over [`HfInferenceClient`]. Returns the top pair.
pub struct HttpSentimentClassifier {
    client: HfInferenceClient,
    name: String,
}

impl HttpSentimentClassifier {
    pub fn new(config: HttpClientConfig) -> ClassifierResult<Self> {
        let name = format!("http:{}", config.model);
        Ok(Self {
            client: HfInferenceClient::new(config)?,
            name,
        })
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<SentimentResult> {
        let scores = self.client.classify(text, false).await?;
        top_scoring(scores)
            .map(|s| SentimentResult::new(s.label, s.score))
            .ok_or_else(|| ClassifierError::invalid_response("empty sentiment response"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn top_scoring(scores: Vec<LabelScore>) -> Option<LabelScore> {
    scores
        .into_iter()
        .filter(|s| !s.score.is_nan())
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> HttpClientConfig {
        HttpClientConfig {
            endpoint: endpoint.to_string(),
            model: "org/model".to_string(),
            api_key: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_parse_flat_response() {
        let json = r#"[{"label":"joy","score":0.7},{"label":"anger","score":0.1}]"#;
        let parsed: InferenceResponse = serde_json::from_str(json).unwrap();
        let scores = parsed.into_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "joy");
    }

    #[test]
    fn test_parse_nested_response() {
        let json = r#"[[{"label":"POSITIVE","score":0.99},{"label":"NEGATIVE","score":0.01}]]"#;
        let parsed: InferenceResponse = serde_json::from_str(json).unwrap();
        let scores = parsed.into_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "POSITIVE");
    }

    #[test]
    fn test_parse_empty_response() {
        let parsed: InferenceResponse = serde_json::from_str("[]").unwrap();
        assert!(parsed.into_scores().is_empty());
    }

    #[test]
    fn test_request_body_shapes() {
        let all = InferenceRequest {
            inputs: "hi",
            parameters: Some(InferenceParameters { top_k: None }),
            options: WAIT_FOR_MODEL,
        };
        assert_eq!(
            serde_json::to_value(&all).unwrap(),
            serde_json::json!({
                "inputs": "hi",
                "parameters": {"top_k": null},
                "options": {"wait_for_model": true}
            })
        );

        let top = InferenceRequest {
            inputs: "hi",
            parameters: None,
            options: WAIT_FOR_MODEL,
        };
        assert_eq!(
            serde_json::to_value(&top).unwrap(),
            serde_json::json!({"inputs": "hi", "options": {"wait_for_model": true}})
        );
    }

    #[test]
    fn test_top_scoring_picks_max() {
        let scores = vec![
            LabelScore {
                label: "NEGATIVE".into(),
                score: 0.2,
            },
            LabelScore {
                label: "POSITIVE".into(),
                score: 0.8,
            },
        ];
        assert_eq!(top_scoring(scores).unwrap().label, "POSITIVE");
        assert!(top_scoring(vec![]).is_none());
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error":"Model is currently loading","estimated_time":20.0}"#),
            "Model is currently loading"
        );
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message(&"x".repeat(1000)).len(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_url_joins_model() {
        let client = HfInferenceClient::new(config("http://localhost:8080/models/")).unwrap();
        assert_eq!(client.url(), "http://localhost:8080/models/org/model");
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            HfInferenceClient::new(config("")),
            Err(ClassifierError::Config { .. })
        ));

        let mut cfg = config("http://localhost");
        cfg.timeout_secs = 0;
        assert!(HfInferenceClient::new(cfg).is_err());
    }
}
