//! Vault seam — read-only access to the host's note files.
//!
//! The lore file set is read-only from the engine's perspective; writes go
//! through the document surface only.

use crate::error::VaultError;

/// Read-only access to candidate lore files.
pub trait Vault: Send + Sync {
    /// All note paths in the vault, relative to its root, in a
    /// deterministic order.
    fn list_paths(&self) -> std::result::Result<Vec<String>, VaultError>;

    /// Read the content of one note.
    fn read(&self, path: &str) -> std::result::Result<String, VaultError>;
}

/// A fixed in-memory vault, useful for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct StaticVault {
    entries: Vec<(String, String)>,
}

impl StaticVault {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }
}

impl Vault for StaticVault {
    fn list_paths(&self) -> std::result::Result<Vec<String>, VaultError> {
        Ok(self.entries.iter().map(|(p, _)| p.clone()).collect())
    }

    fn read(&self, path: &str) -> std::result::Result<String, VaultError> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| VaultError::Io {
                path: path.to_string(),
                reason: "not found".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_vault_lists_in_insertion_order() {
        let vault = StaticVault::new(vec![
            ("Lorebook/Dragon.md".into(), "fire".into()),
            ("Lorebook/Castle.md".into(), "stone".into()),
        ]);
        let paths = vault.list_paths().unwrap();
        assert_eq!(paths, vec!["Lorebook/Dragon.md", "Lorebook/Castle.md"]);
    }

    #[test]
    fn static_vault_read_missing_is_error() {
        let vault = StaticVault::default();
        assert!(vault.read("nope.md").is_err());
    }
}
