//! Stream reconciler — applies streamed deltas into the live document.
//!
//! Chunks are consumed one at a time in arrival order, with no buffering
//! beyond the current chunk. Insertion points are computed from the start
//! position plus the cumulative length of everything inserted so far —
//! never by re-reading the live cursor, which may have moved — so they
//! advance monotonically and never overlap.

use loreweave_core::error::ProviderError;
use loreweave_core::provider::DeltaStream;
use loreweave_core::{DocumentSurface, Position};
use tracing::debug;

/// Append-at-position policy: insert each fragment after the fixed start
/// point, advancing by the characters inserted so far.
///
/// Returns the concatenation of all fragments. A stream that ends with
/// zero chunks produces no mutation. A mid-stream error propagates after
/// the fragments already inserted; they are not rolled back.
pub async fn append_at(
    start: Position,
    stream: &mut DeltaStream,
    document: &mut dyn DocumentSurface,
) -> Result<String, ProviderError> {
    let mut inserted_chars = 0usize;
    let mut full_text = String::new();

    while let Some(item) = stream.recv().await {
        let chunk = item?;
        if chunk.content.is_empty() {
            continue;
        }

        let at = start.advanced_by(inserted_chars);
        document.insert_at(at, &chunk.content);
        inserted_chars += chunk.content.chars().count();
        full_text.push_str(&chunk.content);
    }

    debug!(chars = inserted_chars, "Stream reconciled at position");
    Ok(full_text)
}

/// Replace-whole-document policy: each chunk replaces the entire content
/// with the cumulative text so far (last-write-wins).
///
/// A stream that ends with zero chunks produces no mutation.
pub async fn replace_all(
    stream: &mut DeltaStream,
    document: &mut dyn DocumentSurface,
) -> Result<String, ProviderError> {
    let mut accumulated = String::new();

    while let Some(item) = stream.recv().await {
        let chunk = item?;
        if chunk.content.is_empty() {
            continue;
        }

        accumulated.push_str(&chunk.content);
        document.set_content(&accumulated);
    }

    debug!(chars = accumulated.chars().count(), "Stream reconciled as replacement");
    Ok(accumulated)
}
