//! Lorebook support for Loreweave.
//!
//! Reads front-matter metadata from candidate lore files and selects the
//! entries relevant to the recent working text. Entries are parsed fresh
//! per selection pass and never cached.

pub mod frontmatter;
pub mod fs_vault;
pub mod selector;

pub use frontmatter::{parse_meta, split_front_matter, strip_front_matter};
pub use fs_vault::FsVault;
pub use selector::{select, SelectorConfig};
