//! `loreweave generate` — continue a note with generated text.

use loreweave_core::DocumentSurface;
use loreweave_engine::TextBuffer;
use loreweave_lorebook::FsVault;
use std::path::PathBuf;

pub async fn run(vault_dir: PathBuf, note: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = super::build_dispatcher()?;
    let vault = FsVault::new(&vault_dir);

    let note_path = vault_dir.join(&note);
    let content = std::fs::read_to_string(&note_path)?;

    // Cursor at the end of the note: generated text continues the story.
    let mut document = TextBuffer::new(content);
    dispatcher.continue_text(&vault, &mut document).await?;

    std::fs::write(&note_path, document.content())?;
    println!("Updated {}", note.display());
    Ok(())
}
