//! OpenRouter provider implementation.
//!
//! OpenAI-style chat completions at `https://openrouter.ai/api/v1`.
//!
//! Supports:
//! - Chat completions (non-streaming and streaming SSE)
//! - Model listing with context length and pricing
//! - Credential validation

use async_trait::async_trait;
use futures::StreamExt;
use loreweave_core::error::ProviderError;
use loreweave_core::provider::*;
use serde::Deserialize;
use tracing::{debug, trace, warn};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// HTTP attribution headers OpenRouter asks integrating apps to send.
const REFERER: &str = "https://github.com/loreweave/loreweave";
const APP_TITLE: &str = "Loreweave";

/// The OpenRouter completion backend.
pub struct OpenRouterProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "openrouter".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(request: &CompletionRequest, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
            "presence_penalty": request.params.presence_penalty,
            "frequency_penalty": request.params.frequency_penalty,
            "top_p": request.params.top_p,
            "stream": stream,
        })
    }

    async fn classify_failure(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            );
        }
        let message = response.text().await.unwrap_or_default();
        warn!(status, body = %message, "OpenRouter returned an error");
        ProviderError::ApiError {
            status_code: status,
            message,
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let stream = request.params.stream;
        let body = Self::request_body(&request, stream);

        debug!(provider = %self.name, model = %request.model, stream, "Sending completion request");

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if stream {
            builder = builder.header("Accept", "text/event-stream");
        }

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status().as_u16() != 200 {
            return Err(Self::classify_failure(response).await);
        }

        if stream {
            return Ok(Completion::Stream(spawn_sse_reader(response)));
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion::Text(text))
    }

    async fn list_models(&self) -> std::result::Result<Vec<ModelInfo>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status().as_u16() != 200 {
            return Err(Self::classify_failure(response).await);
        }

        let listing: ModelListing = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse model listing: {e}"),
        })?;

        Ok(listing.data.into_iter().map(ApiModel::into_info).collect())
    }

    async fn validate_key(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "OpenRouter key validation failed to reach the API");
                false
            }
        }
    }
}

/// Read the SSE byte stream on a background task and forward content
/// deltas over a bounded channel. A `data: [DONE]` event or the end of
/// the byte stream closes the channel.
fn spawn_sse_reader(response: reqwest::Response) -> DeltaStream {
    let (tx, rx) = tokio::sync::mpsc::channel(64);

    tokio::spawn(async move {
        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    let _ = tx
                        .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                        .await;
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            // Process complete lines
            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim_end_matches('\r').to_string();
                buffer = buffer[line_end + 1..].to_string();

                // Skip empty lines and SSE comments
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }

                if let Some(data) = line.strip_prefix("data:") {
                    let data = data.trim();

                    // "[DONE]" signals end of stream
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<StreamResponse>(data) {
                        Ok(stream_response) => {
                            let content = stream_response
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|choice| choice.delta.content)
                                .unwrap_or_default();

                            if content.is_empty() {
                                continue;
                            }

                            if tx.send(Ok(DeltaChunk { content })).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                        Err(e) => {
                            // Keep-alives and other non-JSON events are expected
                            trace!(data = %data, error = %e, "Ignoring unparseable SSE chunk");
                        }
                    }
                }
            }
        }
    });

    rx
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListing {
    data: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
struct ApiModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    context_length: Option<u32>,
    #[serde(default)]
    pricing: Option<ApiPricing>,
}

#[derive(Debug, Deserialize)]
struct ApiPricing {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    completion: Option<String>,
}

impl ApiModel {
    fn into_info(self) -> ModelInfo {
        let pricing = self.pricing.and_then(|p| match (p.prompt, p.completion) {
            (Some(prompt), Some(completion)) => {
                Some(format!("${prompt}/1K prompt, ${completion}/1K completion"))
            }
            _ => None,
        });

        ModelInfo {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            description: self.description.unwrap_or_default(),
            context_length: self.context_length,
            pricing,
        }
    }
}

// --- Streaming SSE types ---

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_defaults() {
        let provider = OpenRouterProvider::new("sk-test");
        assert_eq!(provider.name(), "openrouter");
        assert!(provider.base_url.contains("openrouter.ai"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let provider = OpenRouterProvider::new("sk-test").with_base_url("http://localhost:9999/");
        assert_eq!(provider.base_url, "http://localhost:9999");
    }

    #[test]
    fn request_body_matches_wire_contract() {
        let request = CompletionRequest {
            prompt: "Continue".into(),
            model: "anthropic/claude-sonnet-4".into(),
            params: GenerationParams {
                stream: true,
                max_tokens: 512,
                presence_penalty: 0.1,
                frequency_penalty: 0.2,
                temperature: 1.0,
                top_p: 0.01,
            },
        };
        let body = OpenRouterProvider::request_body(&request, true);

        assert_eq!(body["model"], "anthropic/claude-sonnet-4");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Continue");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["stream"], true);
        assert!(body["presence_penalty"].is_number());
        assert!(body["frequency_penalty"].is_number());
        assert!(body["top_p"].is_number());
    }

    // --- SSE parsing tests ---

    #[test]
    fn parse_stream_content_delta() {
        let data = r#"{"choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].delta.content.as_deref(), Some("Hello"));
    }

    #[test]
    fn parse_stream_empty_delta() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].delta.content.is_none());
    }

    #[test]
    fn parse_non_streaming_response() {
        let data = r#"{"id":"gen-1","model":"m","choices":[{"message":{"role":"assistant","content":"Once upon a time"}}],"usage":{"prompt_tokens":5,"completion_tokens":4,"total_tokens":9}}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Once upon a time")
        );
    }

    #[test]
    fn model_listing_normalization() {
        let data = r#"{"data":[
            {"id":"a/b","name":"A B","description":"big","context_length":200000,
             "pricing":{"prompt":"0.003","completion":"0.015"}},
            {"id":"c/d"}
        ]}"#;
        let listing: ModelListing = serde_json::from_str(data).unwrap();
        let models: Vec<ModelInfo> = listing.data.into_iter().map(ApiModel::into_info).collect();

        assert_eq!(models[0].id, "a/b");
        assert_eq!(models[0].name, "A B");
        assert_eq!(models[0].context_length, Some(200_000));
        assert_eq!(
            models[0].pricing.as_deref(),
            Some("$0.003/1K prompt, $0.015/1K completion")
        );

        // Missing fields fall back to defaults
        assert_eq!(models[1].name, "c/d");
        assert!(models[1].pricing.is_none());
        assert!(models[1].context_length.is_none());
    }
}
