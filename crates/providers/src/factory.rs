//! Provider factory — maps a provider identifier to a constructed backend.
//!
//! Adding a provider means adding a `ProviderKind` variant and a factory
//! branch; callers stay untouched.

use crate::deepseek::DeepseekProvider;
use crate::openrouter::OpenRouterProvider;
use loreweave_core::error::ProviderError;
use loreweave_core::provider::Provider;
use std::sync::Arc;

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenRouter,
    Deepseek,
}

impl ProviderKind {
    /// All supported kinds, for listings.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenRouter, ProviderKind::Deepseek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Deepseek => "deepseek",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openrouter" => Ok(Self::OpenRouter),
            "deepseek" => Ok(Self::Deepseek),
            other => Err(ProviderError::Unsupported(other.to_string())),
        }
    }
}

/// Construct a provider of the given kind with the given credential.
pub fn create(kind: ProviderKind, api_key: &str) -> Arc<dyn Provider> {
    match kind {
        ProviderKind::OpenRouter => Arc::new(OpenRouterProvider::new(api_key)),
        ProviderKind::Deepseek => Arc::new(DeepseekProvider::new(api_key)),
    }
}

/// Construct a provider from its string identifier.
///
/// Unknown identifiers fail with `ProviderError::Unsupported` — fatal to
/// this call only.
pub fn create_named(name: &str, api_key: &str) -> Result<Arc<dyn Provider>, ProviderError> {
    Ok(create(name.parse()?, api_key))
}

/// Build the selected provider from configuration.
///
/// Returns `Ok(None)` when no credential is configured for the selected
/// provider — the dispatcher turns that into a configuration notice before
/// any request is attempted. An unknown provider name is an error.
pub fn from_config(
    config: &loreweave_config::AppConfig,
) -> Result<Option<Arc<dyn Provider>>, ProviderError> {
    let kind: ProviderKind = config.provider.parse()?;
    match config.api_key() {
        Some(key) if !key.is_empty() => Ok(Some(create(kind, key))),
        _ => Ok(None),
    }
}
