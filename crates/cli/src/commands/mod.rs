pub mod generate;
pub mod lore_entry;
pub mod models;
pub mod onboard;
pub mod translate;
pub mod validate_key;

use loreweave_config::AppConfig;
use loreweave_core::{Notifier, Provider};
use loreweave_engine::CompletionDispatcher;
use std::sync::Arc;

/// Notifier that prints notices and progress to stderr, keeping stdout
/// for command output.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    fn progress_begin(&self, label: &str) {
        eprintln!("{label}");
    }

    fn progress_end(&self) {}
}

/// Load configuration and build the dispatcher for the selected provider.
pub fn build_dispatcher() -> Result<CompletionDispatcher, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let provider: Option<Arc<dyn Provider>> = loreweave_providers::from_config(&config)?;
    Ok(CompletionDispatcher::new(
        provider,
        &config,
        Arc::new(ConsoleNotifier),
    ))
}
