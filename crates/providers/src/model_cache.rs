//! Model-list cache scoped to the active configuration.
//!
//! The cache remembers which provider + credential produced its listing
//! and refetches when that fingerprint changes, so a settings change can
//! never serve a stale listing. Invalidation is also available explicitly.

use loreweave_core::error::ProviderError;
use loreweave_core::provider::{ModelInfo, Provider};
use tracing::debug;

/// A cached model listing with explicit, testable lifetime.
#[derive(Debug, Default)]
pub struct ModelCache {
    fingerprint: Option<String>,
    models: Vec<ModelInfo>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached listing for `provider` + `credential`, fetching when the
    /// cache is empty or belongs to a different provider/credential pair.
    ///
    /// On fetch failure the cache is left unchanged and the error is
    /// returned; a later call retries.
    pub async fn get_or_fetch(
        &mut self,
        provider: &dyn Provider,
        credential: &str,
    ) -> Result<&[ModelInfo], ProviderError> {
        let fingerprint = Self::fingerprint(provider.name(), credential);

        if self.fingerprint.as_deref() != Some(fingerprint.as_str()) {
            debug!(provider = %provider.name(), "Model cache miss, fetching listing");
            let models = provider.list_models().await?;
            self.models = models;
            self.fingerprint = Some(fingerprint);
        }

        Ok(&self.models)
    }

    /// Drop the cached listing; the next call fetches fresh.
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
        self.models.clear();
    }

    /// Whether the cache currently holds a listing for this pair.
    pub fn is_fresh_for(&self, provider_name: &str, credential: &str) -> bool {
        self.fingerprint.as_deref() == Some(Self::fingerprint(provider_name, credential).as_str())
    }

    fn fingerprint(provider_name: &str, credential: &str) -> String {
        format!("{provider_name}\u{1f}{credential}")
    }
}
