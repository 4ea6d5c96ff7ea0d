//! Front-matter extraction and parsing for lore files.
//!
//! A lore file starts with a metadata block delimited by `---` lines,
//! followed by free-form body text:
//!
//! ```text
//! ---
//! keys: [dragon, wyrm]
//! enabled: true
//! alwaysOn: false
//! ---
//! Dragons breathe fire.
//! ```
//!
//! Malformed or absent metadata yields the defaults — a single broken lore
//! file must never block generation for the whole vault, so parse errors
//! are logged and swallowed here.

use loreweave_core::LoreMeta;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

const DELIMITER: &str = "---";

/// Split a file into its front-matter block and the body after it.
///
/// Returns `None` when the file does not start with a `---` line or the
/// closing delimiter is missing. The body has the delimiter's trailing
/// whitespace trimmed off, matching how entries are inlined into prompts.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DELIMITER)?;

    // The opening delimiter must be a whole line.
    let rest = rest
        .strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))?;

    let mut search_from = 0;
    loop {
        let close = rest[search_from..].find(DELIMITER)? + search_from;
        let at_line_start = close == 0 || rest.as_bytes()[close - 1] == b'\n';
        if at_line_start {
            let block = &rest[..close];
            let body = rest[close + DELIMITER.len()..].trim_start();
            return Some((block, body));
        }
        search_from = close + DELIMITER.len();
    }
}

/// The body of a lore file with its front matter removed.
///
/// Files without a metadata block pass through unchanged.
pub fn strip_front_matter(content: &str) -> &str {
    match split_front_matter(content) {
        Some((_, body)) => body,
        None => content,
    }
}

/// Raw front-matter shape as it appears on disk. Only the recognized keys
/// are read; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    keys: Option<serde_yaml::Value>,

    #[serde(default)]
    enabled: Option<bool>,

    #[serde(default, rename = "alwaysOn")]
    always_on: Option<bool>,
}

/// Parse a lore file's metadata.
///
/// `keys` accepts a single string or a list; scalar list items are
/// stringified and everything is lower-cased. `enabled` defaults to true,
/// `alwaysOn` to false.
pub fn parse_meta(source_id: &str, content: &str) -> LoreMeta {
    let Some((block, _)) = split_front_matter(content) else {
        return LoreMeta::default();
    };

    let raw: RawMeta = match serde_yaml::from_str(block) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(source = %source_id, error = %e, "Malformed lore front matter, using defaults");
            return LoreMeta::default();
        }
    };

    let mut meta = LoreMeta::default();
    if let Some(keys) = raw.keys {
        meta.keys = coerce_keys(keys);
    }
    if let Some(enabled) = raw.enabled {
        meta.enabled = enabled;
    }
    if let Some(always_on) = raw.always_on {
        meta.always_on = always_on;
    }
    meta
}

/// Coerce the `keys` value into a lower-cased string set.
fn coerce_keys(value: serde_yaml::Value) -> BTreeSet<String> {
    match value {
        serde_yaml::Value::String(s) => [s.to_lowercase()].into(),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_yaml::Value::String(s) => Some(s.to_lowercase()),
                serde_yaml::Value::Number(n) => Some(n.to_string()),
                serde_yaml::Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    }
}
