//! # Loreweave Core
//!
//! Domain types, traits, and error definitions for the Loreweave
//! generation engine. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion backend, note vault, host
//! editor, notice surface) is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod lore;
pub mod notice;
pub mod provider;
pub mod vault;

// Re-export key types at crate root for ergonomics
pub use document::{DocumentSurface, Position};
pub use error::{Error, GenerationError, ProviderError, Result, VaultError};
pub use lore::{LoreEntry, LoreMatch, LoreMeta};
pub use notice::{LogNotifier, Notifier};
pub use provider::{
    Completion, CompletionRequest, DeltaChunk, DeltaStream, GenerationParams, ModelInfo, Provider,
};
pub use vault::{StaticVault, Vault};
