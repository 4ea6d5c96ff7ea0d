//! Completion provider implementations for Loreweave.
//!
//! All providers implement the `loreweave_core::Provider` trait.
//! The factory maps a provider identifier to a constructed backend.

pub mod deepseek;
pub mod factory;
pub mod model_cache;
pub mod openrouter;

pub use deepseek::DeepseekProvider;
pub use factory::{create, create_named, from_config, ProviderKind};
pub use model_cache::ModelCache;
pub use openrouter::OpenRouterProvider;
