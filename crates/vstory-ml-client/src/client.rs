//! ML service HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use vstory_models::TranscriptFragment;

use crate::error::{MlError, MlResult};
use crate::types::{
    CaptionRequest, CaptionResponse, HealthResponse, RewriteRequest, RewriteResponse,
    TranscribeRequest, TranscribeResponse,
};

/// Configuration for the ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of the ML sidecar
    pub base_url: String,
    /// Per-call timeout (model inference can be slow)
    pub timeout: Duration,
    /// Max retries per call before the caller falls back
    pub max_retries: u32,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(45),
            max_retries: 1,
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ML_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ML_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(45),
            ),
            max_retries: std::env::var("ML_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        }
    }
}

/// Client for the Python ML sidecar.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    /// Check if the ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Transcribe an extracted audio track into timed fragments.
    pub async fn transcribe(&self, audio_path: impl AsRef<Path>) -> MlResult<Vec<TranscriptFragment>> {
        let request = TranscribeRequest {
            audio_path: audio_path.as_ref().to_string_lossy().to_string(),
        };
        let response: TranscribeResponse = self.post("/transcribe", &request).await?;
        Ok(response.segments.into_iter().map(Into::into).collect())
    }

    /// Caption one representative frame image.
    pub async fn caption(&self, image_path: impl AsRef<Path>) -> MlResult<String> {
        let request = CaptionRequest {
            image_path: image_path.as_ref().to_string_lossy().to_string(),
        };
        let response: CaptionResponse = self.post("/caption", &request).await?;
        Ok(response.caption)
    }

    /// Rewrite a fusion context into one short narrative caption.
    ///
    /// An empty rewrite is unusable; the caller falls back to its
    /// un-rewritten input.
    pub async fn rewrite(&self, context: &str, max_chars: usize) -> MlResult<String> {
        let request = RewriteRequest {
            context: context.to_string(),
            max_chars,
        };
        let response: RewriteResponse = self.post("/rewrite", &request).await?;
        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(MlError::InvalidResponse("empty rewrite".to_string()));
        }
        Ok(text)
    }

    /// POST a JSON request with bounded retry.
    async fn post<Req, Resp>(&self, endpoint: &str, request: &Req) -> MlResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!("Sending ML request to {}", url);

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff before the retry
                tokio::time::sleep(Duration::from_millis(250 * 2u64.pow(attempt - 1))).await;
                debug!(attempt, "Retrying ML request to {}", url);
            }

            let result = self.http.post(&url).json(request).send().await;
            match result {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json().await?);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    last_error = Some(MlError::RequestFailed(format!(
                        "ML service returned {}: {}",
                        status, body
                    )));
                }
                Err(e) => {
                    last_error = Some(MlError::Network(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| MlError::RequestFailed("ML request not attempted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MlClient {
        MlClient::new(MlClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_maps_segments_to_fragments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcribe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "segments": [
                    {"start": 0.0, "end": 2.0, "text": "hello there"},
                    {"start": 2.5, "end": 4.0, "text": "goodbye"}
                ]
            })))
            .mount(&server)
            .await;

        let fragments = client_for(&server).transcribe("/tmp/audio.wav").await.unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "hello there");
        assert_eq!(fragments[1].start_time, 2.5);
    }

    #[tokio::test]
    async fn test_caption_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/caption"))
            .and(body_json_string(r#"{"image_path":"/tmp/scene_001.jpg"}"#))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"caption": "a dog in a park"})),
            )
            .mount(&server)
            .await;

        let caption = client_for(&server).caption("/tmp/scene_001.jpg").await.unwrap();
        assert_eq!(caption, "a dog in a park");
    }

    #[tokio::test]
    async fn test_server_error_surfaces_after_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rewrite"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .expect(2) // initial attempt plus one retry
            .mount(&server)
            .await;

        let err = client_for(&server).rewrite("some context", 120).await.unwrap_err();
        assert!(matches!(err, MlError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rewrite"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "   "})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).rewrite("context", 120).await.unwrap_err();
        assert!(matches!(err, MlError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_health_check_down_is_false_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!client_for(&server).health_check().await.unwrap());
    }
}
