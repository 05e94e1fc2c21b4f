// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Derivation of treap leaves from CSCA public keys.

#![deny(missing_docs)]

pub mod errors;
pub mod hasher;
pub mod public_key;

pub use crate::{
    errors::LeafError,
    hasher::{HashMode, LeafHasher},
    public_key::PublicKey,
};
pub use x509_cert::Certificate;
