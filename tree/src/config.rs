// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Build configuration.

use crate::errors::TreeError;
use csca_leaf::HashMode;
use csca_treap::TREE_HEIGHT;
use serde::{Deserialize, Serialize};

/// Leaves requested per page from a remote source.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Options controlling how a [`CertTree`](crate::CertTree) is built.
///
/// Every field has a default, so a partial JSON object is enough:
/// ```
/// # use csca_tree::TreeConfig;
/// let config = TreeConfig::from_json(r#"{"page_size": 50}"#).unwrap();
/// assert_eq!(config.page_size, 50);
/// assert!(config.deduplicate);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// How public keys are turned into leaves.
    pub hash_mode: HashMode,
    /// Page size used by [`fetch_all_leaves`](crate::fetch_all_leaves).
    pub page_size: usize,
    /// Proofs are padded to this many levels, doubled until the path fits.
    pub proof_depth: usize,
    /// Drop repeated leaves before insertion.
    pub deduplicate: bool,
    /// Skip keys of unsupported length instead of failing the build.
    pub skip_invalid_lengths: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            hash_mode: HashMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            proof_depth: TREE_HEIGHT,
            deduplicate: true,
            skip_invalid_lengths: false,
        }
    }
}

impl TreeConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TreeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no build can work with.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.page_size == 0 {
            return Err(TreeError::Config("page_size must be positive".to_string()));
        }
        if self.proof_depth == 0 {
            return Err(TreeError::Config("proof_depth must be positive".to_string()));
        }
        Ok(())
    }

    /// Set the leaf hash mode.
    pub fn with_hash_mode(mut self, hash_mode: HashMode) -> Self {
        self.hash_mode = hash_mode;
        self
    }

    /// Set the remote page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the proof padding depth.
    pub fn with_proof_depth(mut self, proof_depth: usize) -> Self {
        self.proof_depth = proof_depth;
        self
    }

    /// Enable or disable deduplication.
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Enable or disable skipping keys of unsupported length.
    pub fn with_skip_invalid_lengths(mut self, skip: bool) -> Self {
        self.skip_invalid_lengths = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::from_json("{}").unwrap();
        assert_eq!(config, TreeConfig::default());
        assert_eq!(config.page_size, 100);
        assert_eq!(config.proof_depth, 16);
        assert_eq!(config.hash_mode, HashMode::Circuit);
        assert!(!config.skip_invalid_lengths);
    }

    #[test]
    fn test_overrides() {
        let config = TreeConfig::from_json(
            r#"{"hash_mode": "plain", "proof_depth": 32, "deduplicate": false}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            TreeConfig::default()
                .with_hash_mode(HashMode::Plain)
                .with_proof_depth(32)
                .with_deduplicate(false)
        );
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            TreeConfig::from_json(r#"{"page_size": 0}"#),
            Err(TreeError::Config(_))
        ));
        assert!(matches!(
            TreeConfig::from_json(r#"{"unknown": 1}"#),
            Err(TreeError::Config(_))
        ));
        assert!(matches!(
            TreeConfig::from_json(r#"{"hash_mode": "sha1"}"#),
            Err(TreeError::Config(_))
        ));
        assert!(TreeConfig::default().with_proof_depth(0).validate().is_err());
    }
}
