//! `loreweave lore-entry` — generate a structured lorebook entry from a
//! note, overwriting the note with the result.

use loreweave_core::DocumentSurface;
use loreweave_engine::TextBuffer;
use loreweave_lorebook::FsVault;
use std::path::PathBuf;

pub async fn run(vault_dir: PathBuf, note: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = super::build_dispatcher()?;
    let vault = FsVault::new(&vault_dir);

    let note_path = vault_dir.join(&note);
    let content = std::fs::read_to_string(&note_path)?;

    let mut document = TextBuffer::new(content);
    dispatcher.generate_lore_entry(&vault, &mut document).await?;

    std::fs::write(&note_path, document.content())?;
    println!("Rewrote {}", note.display());
    Ok(())
}
