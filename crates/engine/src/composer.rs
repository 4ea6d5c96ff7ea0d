//! Prompt composer — merges selected lore, instructions, and story text
//! into a single request prompt.
//!
//! Lore entries are inlined with their front matter stripped and joined by
//! a blank line. No entry is truncated; length bounding is left to the
//! model's own limits.

use loreweave_core::LoreMatch;
use loreweave_lorebook::strip_front_matter;

const LORE_HEADER: &str = "START OF THE LORE:";
const LORE_FOOTER: &str = "END OF THE LORE:";

/// Continuation mode: instruction + story, wrapped with a lore section
/// when any lore was selected.
pub fn continuation_prompt(prefix_prompt: &str, story: &str, lore: &[LoreMatch]) -> String {
    let lore_text = joined_lore(lore);
    if lore_text.is_empty() {
        format!("{prefix_prompt} {story}")
    } else {
        format!("{LORE_HEADER}\n{lore_text}\n{LORE_FOOTER}\n{prefix_prompt} {story}")
    }
}

/// Entry-generation mode: a fixed instructional prompt + the note's own
/// text as a description + optionally the matching lore as supplementary
/// context, used to synthesize a new structured note.
pub fn entry_prompt(instruction: &str, note: &str, lore: &[LoreMatch]) -> String {
    let lore_text = joined_lore(lore);
    if lore_text.is_empty() {
        format!("{instruction}\nDescription:\n{note}")
    } else {
        format!("{instruction}\nDescription:\n{note}\nRelevant lorebook entries:\n{lore_text}")
    }
}

/// Translation mode: translate the selection, answer with the
/// translation only.
pub fn translation_prompt(selection: &str) -> String {
    format!(
        "Translate this text to Spanish. You will answer with just the translation. \
         This is the text: {selection}"
    )
}

fn joined_lore(lore: &[LoreMatch]) -> String {
    lore.iter()
        .map(|entry| strip_front_matter(&entry.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dragon_match() -> LoreMatch {
        LoreMatch {
            source_id: "Lorebook/Dragon.md".into(),
            content: "---\nkeys: [dragon]\n---\nDragons breathe fire.".into(),
        }
    }

    #[test]
    fn continuation_with_lore_wraps_in_markers() {
        let prompt = continuation_prompt("Continue:", "The dragon woke up.", &[dragon_match()]);
        let header_at = prompt.find(LORE_HEADER).unwrap();
        let body_at = prompt.find("Dragons breathe fire.").unwrap();
        let footer_at = prompt.find(LORE_FOOTER).unwrap();
        assert!(header_at < body_at && body_at < footer_at);
        assert!(prompt.ends_with("Continue: The dragon woke up."));
    }

    #[test]
    fn continuation_without_lore_has_no_lore_section() {
        let prompt = continuation_prompt("Continue:", "The story so far.", &[]);
        assert_eq!(prompt, "Continue: The story so far.");
        assert!(!prompt.contains(LORE_HEADER));
    }

    #[test]
    fn lore_front_matter_is_stripped() {
        let prompt = continuation_prompt("Continue:", "story", &[dragon_match()]);
        assert!(!prompt.contains("keys: [dragon]"));
        assert!(prompt.contains("Dragons breathe fire."));
    }

    #[test]
    fn multiple_entries_joined_by_blank_line() {
        let castle = LoreMatch {
            source_id: "Lorebook/Castle.md".into(),
            content: "---\nkeys: [castle]\n---\nThe castle is old.".into(),
        };
        let prompt = continuation_prompt("Continue:", "story", &[dragon_match(), castle]);
        assert!(prompt.contains("Dragons breathe fire.\n\nThe castle is old."));
    }

    #[test]
    fn entry_prompt_includes_description() {
        let prompt = entry_prompt("Write an entry.", "A mountain fortress.", &[]);
        assert!(prompt.starts_with("Write an entry."));
        assert!(prompt.contains("Description:\nA mountain fortress."));
        assert!(!prompt.contains("Relevant lorebook entries:"));
    }

    #[test]
    fn entry_prompt_appends_related_lore() {
        let prompt = entry_prompt("Write an entry.", "A dragon's lair.", &[dragon_match()]);
        assert!(prompt.contains("Relevant lorebook entries:\nDragons breathe fire."));
    }

    #[test]
    fn translation_prompt_embeds_selection() {
        let prompt = translation_prompt("Good morning");
        assert!(prompt.contains("This is the text: Good morning"));
    }
}
