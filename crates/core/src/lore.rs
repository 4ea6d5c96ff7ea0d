//! Lorebook domain types.
//!
//! A lorebook entry is a note whose front matter declares trigger keywords.
//! Entries are parsed fresh on every selection pass and never cached — they
//! are owned by the single call that produced them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parsed front-matter metadata of a lore file.
///
/// Keys are lower-cased at parse time. A `BTreeSet` keeps iteration
/// deterministic for the same input set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreMeta {
    /// Trigger keywords, lower-cased.
    pub keys: BTreeSet<String>,

    /// `false` excludes the entry unconditionally.
    pub enabled: bool,

    /// `true` includes the entry regardless of keyword matches,
    /// unless `enabled` is false.
    pub always_on: bool,
}

impl Default for LoreMeta {
    fn default() -> Self {
        Self {
            keys: BTreeSet::new(),
            enabled: true,
            always_on: false,
        }
    }
}

/// A candidate lore entry under consideration by the selector.
#[derive(Debug, Clone)]
pub struct LoreEntry {
    /// Vault-relative path of the source file.
    pub source_id: String,

    /// Raw file content, front matter included.
    pub content: String,

    pub meta: LoreMeta,
}

/// A lore entry the selector decided to include.
///
/// Content is raw — front-matter stripping happens at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreMatch {
    pub source_id: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_meta_is_enabled_and_not_always_on() {
        let meta = LoreMeta::default();
        assert!(meta.keys.is_empty());
        assert!(meta.enabled);
        assert!(!meta.always_on);
    }

    #[test]
    fn meta_serialization_roundtrip() {
        let meta = LoreMeta {
            keys: ["dragon".to_string(), "wyrm".to_string()].into(),
            enabled: true,
            always_on: false,
        };
        let json = serde_json::to_string(&meta).unwrap();
        let parsed: LoreMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }
}
