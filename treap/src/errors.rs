// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.
//! Error types

use ark_std::string::String;
use displaydoc::Display;

/// Error type for the authenticated treap and its proofs
#[derive(Debug, Display, Clone, Eq, PartialEq)]
pub enum TreapError {
    /// Invalid hash value, {0}
    InvalidHash(String),
    /// Malformed proof, {0}
    MalformedProof(String),
}

impl ark_std::error::Error for TreapError {}

impl From<hex::FromHexError> for TreapError {
    fn from(err: hex::FromHexError) -> Self {
        TreapError::InvalidHash(ark_std::format!("{}", err))
    }
}
