// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Authenticated treap of public-key fingerprints.
//!
//! Keys are 32-byte leaf hashes and priorities are derived from the keys, so
//! the tree, and therefore its root digest, is a function of the key set
//! alone. Membership proofs are fixed-depth sibling lists together with the
//! combination order at each level.
//!
//! ```
//! use csca_treap::{Hash32, PoseidonHasher, Treap};
//!
//! let leaves: Vec<Hash32> = (1u8..=8)
//!     .map(|i| Hash32::from_be_slice(&[i]).unwrap())
//!     .collect();
//! let treap: Treap = leaves.iter().copied().collect();
//!
//! let root = treap.merkle_root().unwrap();
//! let proof = treap.merkle_path(&leaves[3]).unwrap();
//! assert!(proof.verify::<PoseidonHasher>(&leaves[3], &root));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod errors;
pub mod hash;
pub mod hasher;
pub mod proof;
mod treap;

pub use crate::{
    errors::TreapError,
    hash::Hash32,
    hasher::{combine, KeccakHasher, PoseidonHasher, TreapHasher},
    proof::{HashOrder, MerkleProof},
    treap::{Treap, TREE_HEIGHT},
};
