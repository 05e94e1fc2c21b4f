// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.
//! Error types

use csca_leaf::LeafError;
use csca_treap::TreapError;
use displaydoc::Display;

/// Error type for building and querying a certificate tree
#[derive(Debug, Display, Clone, Eq, PartialEq)]
pub enum TreeError {
    /// Leaf #{index} could not be hashed: {source}
    Leaf {
        /// position of the offending input
        index: usize,
        /// underlying hashing error
        source: LeafError,
    },
    /// Public key could not be hashed: {0}
    Key(LeafError),
    /// Certificate #{index} could not be parsed: {reason}
    Certificate {
        /// position of the offending PEM block
        index: usize,
        /// parser message
        reason: String,
    },
    /// Leaf is not in the tree: {0}
    NotFound(String),
    /// Fetching leaves from the remote source failed: {0}
    UpstreamFetch(String),
    /// Malformed proof, {0}
    MalformedProof(String),
    /// Invalid configuration, {0}
    Config(String),
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Leaf { source, .. } | TreeError::Key(source) => Some(source),
            _ => None,
        }
    }
}

impl From<TreapError> for TreeError {
    fn from(err: TreapError) -> Self {
        TreeError::MalformedProof(err.to_string())
    }
}
