//! Completion dispatcher — orchestrates one generation cycle.
//!
//! A cycle walks `Idle → Validating → (Building | Aborted) → Requesting →
//! (Succeeded | Failed) → Idle`. Every provider failure is caught at this
//! boundary, turned into a short user-visible notice, and logged in
//! detail; nothing is retried automatically — re-triggering is the user's
//! retry path.
//!
//! At most one cycle runs at a time: a trigger while one is in flight is
//! rejected, never queued or cancelled.

use crate::{composer, reconciler};
use loreweave_config::AppConfig;
use loreweave_core::error::{Error, GenerationError};
use loreweave_core::provider::{Completion, CompletionRequest, GenerationParams, Provider};
use loreweave_core::{DocumentSurface, LoreMatch, Notifier, Vault};
use loreweave_lorebook::selector::{self, SelectorConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Phases of a generation cycle, traced for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclePhase {
    Validating,
    Building,
    Requesting,
    Succeeded,
    Failed,
    Aborted,
}

impl CyclePhase {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Building => "building",
            Self::Requesting => "requesting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
        }
    }
}

/// Orchestrates generation cycles against a configured provider.
///
/// Owns the provider instance and the settings for the duration of its
/// life; borrows the vault and the document only for the span of one
/// operation.
pub struct CompletionDispatcher {
    provider: Option<Arc<dyn Provider>>,
    model: String,
    defaults: GenerationParams,
    prefix_prompt: String,
    lore_prompt: String,
    selector: SelectorConfig,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
}

impl CompletionDispatcher {
    /// Create a dispatcher from configuration.
    ///
    /// `provider` is `None` when no credential is configured; every
    /// operation then aborts in its validating phase with a notice.
    pub fn new(
        provider: Option<Arc<dyn Provider>>,
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            defaults: GenerationParams {
                stream: config.stream,
                max_tokens: config.max_tokens,
                presence_penalty: config.presence_penalty,
                frequency_penalty: config.frequency_penalty,
                temperature: config.temperature,
                top_p: config.top_p,
            },
            prefix_prompt: config.prefix_prompt.clone(),
            lore_prompt: config.lorebook.prompt.clone(),
            selector: SelectorConfig {
                folder: config.lorebook.folder.clone(),
                search_range: config.lorebook.search_range,
            },
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Continue the story: compose a continuation prompt from the whole
    /// document and insert the result at the cursor.
    pub async fn continue_text(
        &self,
        vault: &dyn Vault,
        document: &mut dyn DocumentSurface,
    ) -> Result<(), Error> {
        let _cycle = self.begin_cycle()?;
        let provider = self.validate()?;

        self.trace(CyclePhase::Building);
        let story = document.content();
        let lore = self.select_lore(vault, &story);
        let prompt = composer::continuation_prompt(&self.prefix_prompt, &story, &lore);

        let request = CompletionRequest {
            prompt,
            model: self.model.clone(),
            params: self.defaults.clone(),
        };

        let completion = self.request(provider.as_ref(), request, "Generating text...").await?;

        match completion {
            Completion::Text(text) => {
                document.insert_at(document.cursor(), &text);
                self.trace(CyclePhase::Succeeded);
                Ok(())
            }
            Completion::Stream(mut stream) => {
                let start = document.cursor();
                self.reconcile(reconciler::append_at(start, &mut stream, document).await)
            }
        }
    }

    /// Generate a structured lorebook entry from the note's own text,
    /// replacing the whole document with the result.
    pub async fn generate_lore_entry(
        &self,
        vault: &dyn Vault,
        document: &mut dyn DocumentSurface,
    ) -> Result<(), Error> {
        let _cycle = self.begin_cycle()?;
        let provider = self.validate()?;

        self.trace(CyclePhase::Building);
        let note = document.content();
        let lore = self.select_lore(vault, &note);
        let prompt = composer::entry_prompt(&self.lore_prompt, &note, &lore);

        let request = CompletionRequest {
            prompt,
            model: self.model.clone(),
            params: GenerationParams {
                stream: self.defaults.stream,
                max_tokens: 2048,
                presence_penalty: 0.0,
                frequency_penalty: 0.0,
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        let completion = self
            .request(provider.as_ref(), request, "Generating lorebook entry...")
            .await?;

        match completion {
            Completion::Text(text) => {
                document.set_content(text.trim());
                self.trace(CyclePhase::Succeeded);
                Ok(())
            }
            Completion::Stream(mut stream) => {
                self.reconcile(reconciler::replace_all(&mut stream, document).await)
            }
        }
    }

    /// Translate the current selection in place.
    pub async fn translate_selection(
        &self,
        document: &mut dyn DocumentSurface,
    ) -> Result<(), Error> {
        let _cycle = self.begin_cycle()?;
        let provider = self.validate()?;

        self.trace(CyclePhase::Building);
        let selection = document.selection().unwrap_or_default();
        let prompt = composer::translation_prompt(&selection);

        let request = CompletionRequest {
            prompt,
            model: self.model.clone(),
            params: GenerationParams {
                max_tokens: 2024,
                ..self.defaults.clone()
            },
        };

        let completion = self
            .request(provider.as_ref(), request, "Translating text...")
            .await?;

        match completion {
            Completion::Text(text) => {
                document.replace_selection(&text);
                self.trace(CyclePhase::Succeeded);
                Ok(())
            }
            Completion::Stream(mut stream) => {
                // Empty the selection first; the stream then appends from
                // the collapsed cursor.
                document.replace_selection("");
                let start = document.cursor();
                self.reconcile(reconciler::append_at(start, &mut stream, document).await)
            }
        }
    }

    // --- Cycle plumbing ---

    /// Claim the single in-flight slot, rejecting overlapping cycles.
    fn begin_cycle(&self) -> Result<CycleGuard<'_>, Error> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.notifier
                .notify("A generation is already running. Wait for it to finish.");
            return Err(GenerationError::Busy.into());
        }
        debug!("Generation cycle started");
        Ok(CycleGuard {
            flag: &self.in_flight,
        })
    }

    /// Validating phase: a provider instance must be configured before
    /// anything else happens; absence aborts with no request sent.
    fn validate(&self) -> Result<Arc<dyn Provider>, Error> {
        self.trace(CyclePhase::Validating);
        match &self.provider {
            Some(provider) => Ok(provider.clone()),
            None => {
                self.notifier
                    .notify("Configure an API key and add a valid token first.");
                self.trace(CyclePhase::Aborted);
                Err(GenerationError::NotConfigured("no provider instance".into()).into())
            }
        }
    }

    /// Building-phase lore selection. Selection never fails the cycle —
    /// unreadable entries are skipped inside the selector.
    fn select_lore(&self, vault: &dyn Vault, working_text: &str) -> Vec<LoreMatch> {
        let lore = selector::select(vault, working_text, &self.selector);
        if !lore.is_empty() {
            info!(count = lore.len(), "Lore entries selected");
        }
        lore
    }

    /// Requesting phase: run the provider call behind the progress
    /// indicator and classify the outcome.
    async fn request(
        &self,
        provider: &dyn Provider,
        request: CompletionRequest,
        progress_label: &str,
    ) -> Result<Completion, Error> {
        self.trace(CyclePhase::Requesting);
        self.notifier.progress_begin(progress_label);
        let result = provider.complete(request).await;
        self.notifier.progress_end();

        match result {
            // An empty non-streaming result is a semantic failure,
            // distinct from a transport error.
            Ok(Completion::Text(text)) if text.is_empty() => {
                self.notifier.notify("The response of the API is empty.");
                self.trace(CyclePhase::Failed);
                Err(GenerationError::EmptyResponse.into())
            }
            Ok(completion) => Ok(completion),
            Err(e) => {
                error!(provider = %provider.name(), error = ?e, "Completion request failed");
                self.notifier.notify(&format!("Error generating text: {e}"));
                self.trace(CyclePhase::Failed);
                Err(e.into())
            }
        }
    }

    /// Route a reconciler outcome into the final phase.
    fn reconcile(
        &self,
        outcome: Result<String, loreweave_core::error::ProviderError>,
    ) -> Result<(), Error> {
        match outcome {
            Ok(_) => {
                self.trace(CyclePhase::Succeeded);
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "Stream reconciliation failed");
                self.notifier.notify(&format!("Error generating text: {e}"));
                self.trace(CyclePhase::Failed);
                Err(e.into())
            }
        }
    }

    fn trace(&self, phase: CyclePhase) {
        debug!(phase = phase.as_str(), "Generation cycle phase");
    }
}

/// Releases the in-flight slot on every exit path.
struct CycleGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        debug!("Generation cycle finished");
    }
}
