// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Authenticated tree of CSCA public keys.
//!
//! A [`CertTree`] collects the public keys of country signing certificates,
//! turns each into a leaf with [`csca_leaf::LeafHasher`], and stores the
//! leaves in a [`csca_treap::Treap`]. The root commits to the whole key set
//! independently of insertion order, and inclusion proofs can be checked
//! with [`verify_proof`] against a published root.
//!
//! ```
//! use csca_treap::{Hash32, PoseidonHasher};
//! use csca_tree::{verify_proof, CertTree, TreeConfig};
//!
//! let leaves: Vec<Hash32> = (1u8..=4).map(|i| Hash32([i; 32])).collect();
//! let tree: CertTree = CertTree::from_leaf_hashes(leaves.clone(), TreeConfig::default()).unwrap();
//!
//! let proof = tree.inclusion_proof(&leaves[2]).unwrap();
//! let root = tree.root().unwrap();
//! assert!(verify_proof::<PoseidonHasher>(&root, &leaves[2], &proof));
//! ```

#![deny(missing_docs)]

pub mod builder;
pub mod config;
pub mod errors;
pub mod pem;
pub mod source;

pub use crate::{
    builder::{extract_public_keys, verify_json_proof, verify_proof, CertTree, PlainCertTree},
    config::TreeConfig,
    errors::TreeError,
    pem::{parse_pem_bundle, parse_pem_certificates},
    source::{fetch_all_leaves, LeafPage, LeafSource, PageRequest, RemoteLeaf},
};
