// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.
//! Error types

use csca_poseidon::PoseidonError;
use displaydoc::Display;

/// Error type for leaf hashing
#[derive(Debug, Display, Clone, Eq, PartialEq)]
pub enum LeafError {
    /// Unsupported public key, supported formats: rsa, ecdsa ({0})
    UnsupportedPublicKey(String),
    /// Public key of {0} bytes, expected 256, 384 or 512
    InvalidLength(usize),
    /// Poseidon error, {0}
    Poseidon(PoseidonError),
}

impl std::error::Error for LeafError {}

impl From<PoseidonError> for LeafError {
    fn from(err: PoseidonError) -> Self {
        LeafError::Poseidon(err)
    }
}

impl From<der::Error> for LeafError {
    fn from(err: der::Error) -> Self {
        LeafError::UnsupportedPublicKey(format!("malformed key encoding: {}", err))
    }
}
