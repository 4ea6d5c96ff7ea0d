//! Context selector — keyword-relevance filtering of lore entries.
//!
//! Only the last `search_range` characters of the working text are
//! searched, which bounds the cost of a selection pass and biases matches
//! toward recent story events.

use crate::frontmatter;
use loreweave_core::{LoreMatch, Vault};
use tracing::{debug, warn};

/// The narrowed slice of configuration the selector needs.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Vault folder holding lore files; only paths under it are candidates.
    pub folder: String,

    /// How many trailing characters of the working text to search.
    pub search_range: usize,
}

/// Select the lore entries relevant to `recent_text`.
///
/// Candidates are the vault paths under `config.folder`. An entry is
/// included when it is `alwaysOn`, or when any of its keys occurs as a
/// literal substring of the lower-cased tail of `recent_text`; entries
/// with `enabled: false` are never included. Matches come back in
/// enumeration order.
///
/// Unreadable files are logged and skipped — a partial lore set is
/// preferable to a failed generation cycle.
pub fn select(vault: &dyn Vault, recent_text: &str, config: &SelectorConfig) -> Vec<LoreMatch> {
    let paths = match vault.list_paths() {
        Ok(paths) => paths,
        Err(e) => {
            warn!(error = %e, "Could not enumerate vault, selecting no lore");
            return Vec::new();
        }
    };

    let prefix = format!("{}/", config.folder.trim_end_matches('/'));
    let tail = window_tail(recent_text, config.search_range);

    let mut matches = Vec::new();
    for path in paths {
        if !path.starts_with(&prefix) {
            continue;
        }

        let content = match vault.read(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path, error = %e, "Skipping unreadable lore file");
                continue;
            }
        };

        let meta = frontmatter::parse_meta(&path, &content);

        if !meta.enabled {
            continue;
        }

        if meta.always_on || meta.keys.iter().any(|key| tail.contains(key.as_str())) {
            matches.push(LoreMatch {
                source_id: path,
                content,
            });
        }
    }

    debug!(count = matches.len(), "Lore selection complete");
    matches
}

/// The lower-cased last `range` characters of `text`.
///
/// When `range` exceeds the text length the whole text is used.
fn window_tail(text: &str, range: usize) -> String {
    let char_count = text.chars().count();
    let skip = char_count.saturating_sub(range);
    text.chars().skip(skip).collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreweave_core::StaticVault;

    fn config() -> SelectorConfig {
        SelectorConfig {
            folder: "Lorebook".into(),
            search_range: 1000,
        }
    }

    fn dragon_file() -> (String, String) {
        (
            "Lorebook/Dragon.md".into(),
            "---\nkeys: [dragon]\nenabled: true\n---\nDragons breathe fire.".into(),
        )
    }

    #[test]
    fn matches_key_in_recent_text() {
        let vault = StaticVault::new(vec![dragon_file()]);
        let matches = select(&vault, "The dragon woke up.", &config());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].source_id, "Lorebook/Dragon.md");
    }

    #[test]
    fn match_is_case_insensitive() {
        let vault = StaticVault::new(vec![dragon_file()]);
        let matches = select(&vault, "The DRAGON woke up.", &config());
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn key_outside_window_does_not_match() {
        let vault = StaticVault::new(vec![dragon_file()]);
        let cfg = SelectorConfig {
            folder: "Lorebook".into(),
            search_range: 5,
        };
        // "dragon" appears, but only before the 5-char tail "e up."
        let matches = select(&vault, "The dragon woke up.", &cfg);
        assert!(matches.is_empty());
    }

    #[test]
    fn window_larger_than_text_uses_whole_text() {
        let vault = StaticVault::new(vec![dragon_file()]);
        let cfg = SelectorConfig {
            folder: "Lorebook".into(),
            search_range: 10_000,
        };
        let matches = select(&vault, "dragon", &cfg);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn disabled_entries_never_match() {
        let vault = StaticVault::new(vec![(
            "Lorebook/Dragon.md".into(),
            "---\nkeys: [dragon]\nenabled: false\nalwaysOn: true\n---\nbody".into(),
        )]);
        let matches = select(&vault, "The dragon woke up.", &config());
        assert!(matches.is_empty());
    }

    #[test]
    fn always_on_matches_without_keyword() {
        let vault = StaticVault::new(vec![(
            "Lorebook/World.md".into(),
            "---\nalwaysOn: true\n---\nThe world is flat.".into(),
        )]);
        let matches = select(&vault, "Nothing relevant here.", &config());
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn paths_outside_folder_are_not_candidates() {
        let vault = StaticVault::new(vec![(
            "Notes/Dragon.md".into(),
            "---\nkeys: [dragon]\n---\nbody".into(),
        )]);
        let matches = select(&vault, "The dragon woke up.", &config());
        assert!(matches.is_empty());
    }

    #[test]
    fn folder_prefix_requires_separator() {
        // "LorebookOld/..." must not match folder "Lorebook".
        let vault = StaticVault::new(vec![(
            "LorebookOld/Dragon.md".into(),
            "---\nkeys: [dragon]\n---\nbody".into(),
        )]);
        let matches = select(&vault, "The dragon woke up.", &config());
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_candidate_set_is_empty_result() {
        let vault = StaticVault::default();
        assert!(select(&vault, "anything", &config()).is_empty());
    }

    #[test]
    fn matches_keep_enumeration_order() {
        let vault = StaticVault::new(vec![
            (
                "Lorebook/Castle.md".into(),
                "---\nkeys: [castle]\n---\nA castle.".into(),
            ),
            (
                "Lorebook/Dragon.md".into(),
                "---\nkeys: [dragon]\n---\nA dragon.".into(),
            ),
        ]);
        let matches = select(&vault, "The dragon circled the castle.", &config());
        let ids: Vec<_> = matches.iter().map(|m| m.source_id.as_str()).collect();
        assert_eq!(ids, vec!["Lorebook/Castle.md", "Lorebook/Dragon.md"]);
    }

    #[test]
    fn entry_without_front_matter_needs_always_on_to_match() {
        let vault = StaticVault::new(vec![(
            "Lorebook/Plain.md".into(),
            "No metadata at all.".into(),
        )]);
        // Defaults: enabled, not always-on, no keys — never matches.
        let matches = select(&vault, "No metadata at all.", &config());
        assert!(matches.is_empty());
    }
}
