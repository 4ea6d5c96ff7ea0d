//! `loreweave translate` — translate a piece of text and print it.

use loreweave_core::DocumentSurface;
use loreweave_engine::TextBuffer;

pub async fn run(text: String) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = super::build_dispatcher()?;

    let char_count = text.chars().count();
    let mut document = TextBuffer::new(text);
    document.select_chars(0, char_count);

    dispatcher.translate_selection(&mut document).await?;

    println!("{}", document.content());
    Ok(())
}
