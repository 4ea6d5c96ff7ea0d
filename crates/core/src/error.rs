//! Error types for the Loreweave domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Loreweave operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Generation cycle errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Vault errors ---
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Unsupported provider: {0}")]
    Unsupported(String),
}

/// Failures of a single generation cycle, raised before or after the
/// provider call. Distinct from [`ProviderError`]: these never involve a
/// failed network exchange.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("No provider configured: {0}")]
    NotConfigured(String),

    #[error("The provider returned an empty response")]
    EmptyResponse,

    #[error("A generation cycle is already in flight")]
    Busy,
}

#[derive(Debug, Clone, Error)]
pub enum VaultError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}
