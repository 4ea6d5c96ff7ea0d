//! Provider trait — the abstraction over completion backends.
//!
//! A Provider knows how to send a composed prompt to a completion API and
//! hand the result back, either as one complete string or as a stream of
//! incremental text fragments.
//!
//! Implementations: OpenRouter, DeepSeek.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling and delivery parameters for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Whether to request a token stream instead of a single response.
    #[serde(default)]
    pub stream: bool,

    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub presence_penalty: f32,

    #[serde(default)]
    pub frequency_penalty: f32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_max_tokens() -> u32 {
    512
}
fn default_temperature() -> f32 {
    1.0
}
fn default_top_p() -> f32 {
    0.01
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            stream: false,
            max_tokens: default_max_tokens(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

/// A fully composed completion request. Immutable once built — the
/// dispatcher owns it for the duration of one generation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The composed prompt text.
    pub prompt: String,

    /// The model to use (e.g., "deepseek-chat", "anthropic/claude-sonnet-4").
    pub model: String,

    /// Sampling and delivery parameters.
    pub params: GenerationParams,
}

/// A single unit of incrementally arriving text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaChunk {
    /// Partial content fragment. Arrival order is insertion order.
    pub content: String,
}

/// A lazy, forward-only, single-consumption sequence of delta chunks.
///
/// The sender half lives in the provider's transport task; the channel
/// closing is the end-of-stream signal.
pub type DeltaStream = tokio::sync::mpsc::Receiver<std::result::Result<DeltaChunk, ProviderError>>;

/// The outcome of a completion call — exactly one variant per result.
///
/// A non-streaming call that yields `Text("")` is the terminal
/// empty-response condition; classifying it is the dispatcher's job.
pub enum Completion {
    /// The complete response text, delivered at once.
    Text(String),

    /// Incremental fragments, produced as the backend delivers them.
    Stream(DeltaStream),
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A model advertised by a provider, normalized to a common shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Context window size, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,

    /// Human-readable pricing summary, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
}

/// The core Provider trait.
///
/// Every completion backend implements this trait. The dispatcher calls
/// `complete()` without knowing which backend is configured.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter").
    fn name(&self) -> &str;

    /// List the models this provider offers.
    ///
    /// An empty listing means "no models"; an error means "could not ask" —
    /// callers treat the two differently.
    async fn list_models(&self) -> std::result::Result<Vec<ModelInfo>, ProviderError>;

    /// Send a completion request.
    ///
    /// When `request.params.stream` is false the `Text` variant is returned
    /// after the full response has arrived. When true, backends that can
    /// stream return the `Stream` variant; backends that cannot silently
    /// downgrade to a non-streaming call and return `Text` — a per-provider
    /// capability gap, not an error.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError>;

    /// Best-effort reachability and credential check.
    ///
    /// Network failure maps to `false`; this never errors.
    async fn validate_key(&self) -> bool;
}
