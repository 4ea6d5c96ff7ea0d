//! DeepSeek provider implementation.
//!
//! Chat completions at `https://api.deepseek.com/v1`, with a request
//! convention of its own: a fixed system message is prepended before the
//! user prompt, and the model listing carries bare ids that are normalized
//! with defaults.
//!
//! Capability gap: this backend cannot stream. When a request asks for a
//! stream it silently downgrades to a non-streaming call and returns the
//! `Text` variant — per the provider contract this is not an error.

use async_trait::async_trait;
use loreweave_core::error::ProviderError;
use loreweave_core::provider::*;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// The DeepSeek completion backend.
pub struct DeepseekProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl DeepseekProvider {
    /// Create a new DeepSeek provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "deepseek".into(),
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

    fn request_body(request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": request.prompt }
            ],
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
            "presence_penalty": request.params.presence_penalty,
            "frequency_penalty": request.params.frequency_penalty,
            "top_p": request.params.top_p,
            // Streaming is not supported on this backend; always a single
            // response regardless of what the caller asked for.
            "stream": false,
        })
    }
}

#[async_trait]
impl Provider for DeepseekProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        if request.params.stream {
            debug!(provider = %self.name, "Streaming requested, downgrading to non-streaming");
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::request_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            warn!(status, body = %message, "DeepSeek returned an error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message,
            });
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
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key".into(),
            ));
        }
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status,
                message,
            });
        }

        let listing: ModelListing = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse model listing: {e}"),
        })?;

        Ok(listing
            .data
            .into_iter()
            .map(|model| ModelInfo {
                name: model.id.clone(),
                id: model.id,
                description: model.object.unwrap_or_default(),
                context_length: None,
                pricing: None,
            })
            .collect())
    }

    async fn validate_key(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "DeepSeek key validation failed to reach the API");
                false
            }
        }
    }
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
    object: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_defaults() {
        let provider = DeepseekProvider::new("sk-test");
        assert_eq!(provider.name(), "deepseek");
        assert!(provider.base_url.contains("api.deepseek.com"));
    }

    #[test]
    fn request_body_prepends_system_message() {
        let request = CompletionRequest {
            prompt: "Continue".into(),
            model: "deepseek-chat".into(),
            params: GenerationParams::default(),
        };
        let body = DeepseekProvider::request_body(&request);

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Continue");
    }

    #[test]
    fn request_body_never_asks_for_a_stream() {
        let request = CompletionRequest {
            prompt: "Continue".into(),
            model: "deepseek-chat".into(),
            params: GenerationParams {
                stream: true,
                ..GenerationParams::default()
            },
        };
        let body = DeepseekProvider::request_body(&request);
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn bare_model_ids_are_normalized() {
        let data = r#"{"object":"list","data":[{"id":"deepseek-chat","object":"model"},{"id":"deepseek-reasoner"}]}"#;
        let listing: ModelListing = serde_json::from_str(data).unwrap();
        assert_eq!(listing.data.len(), 2);
        assert_eq!(listing.data[0].id, "deepseek-chat");
        assert_eq!(listing.data[0].object.as_deref(), Some("model"));
        assert!(listing.data[1].object.is_none());
    }
}
