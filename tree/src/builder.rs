// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The certificate tree facade.

use crate::{
    config::TreeConfig,
    errors::TreeError,
    source::{fetch_all_leaves, LeafSource},
};
use csca_leaf::{Certificate, LeafError, LeafHasher, PublicKey};
use csca_treap::{codec, Hash32, KeccakHasher, MerkleProof, PoseidonHasher, Treap, TreapHasher};
use hashbrown::HashSet;
use tracing::{debug, info, warn};

/// Tree over keccak leaves and keccak nodes, for consumers outside a circuit.
pub type PlainCertTree = CertTree<KeccakHasher>;

/// Authenticated tree of CSCA public keys.
///
/// `H` hashes the inner nodes; [`TreeConfig::hash_mode`] selects how keys
/// become leaves. The circuit pairs Poseidon leaves with [`PoseidonHasher`].
#[derive(Clone, Debug)]
pub struct CertTree<H: TreapHasher = PoseidonHasher> {
    treap: Treap<H>,
    hasher: LeafHasher,
    config: TreeConfig,
}

impl<H: TreapHasher> CertTree<H> {
    /// An empty tree.
    pub fn new(config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self {
            treap: Treap::new(),
            hasher: LeafHasher::new(config.hash_mode),
            config,
        })
    }

    /// Build from parsed certificates.
    ///
    /// Certificates with an unsupported key type, and 768-byte keys in
    /// circuit mode, are skipped. Other hashing errors abort the build.
    pub fn from_certificates(
        certificates: &[Certificate],
        config: TreeConfig,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new(config)?;
        info!(
            certificates = certificates.len(),
            mode = ?tree.hasher.mode(),
            "building tree from certificates"
        );
        let mut leaves = Vec::with_capacity(certificates.len());
        for (index, certificate) in certificates.iter().enumerate() {
            let leaf = tree.hasher.hash_certificate(certificate);
            leaves.extend(tree.accept(index, leaf)?);
        }
        tree.insert_leaves(leaves);
        Ok(tree)
    }

    /// Build from raw big-endian keys, e.g. RSA moduli.
    pub fn from_public_keys<K: AsRef<[u8]>>(
        keys: &[K],
        config: TreeConfig,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new(config)?;
        info!(
            keys = keys.len(),
            mode = ?tree.hasher.mode(),
            "building tree from public keys"
        );
        let mut leaves = Vec::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            let leaf = tree.hasher.hash_raw(key.as_ref());
            leaves.extend(tree.accept(index, leaf)?);
        }
        tree.insert_leaves(leaves);
        Ok(tree)
    }

    /// Build from precomputed leaves, bypassing the leaf hasher.
    pub fn from_leaf_hashes<I>(leaves: I, config: TreeConfig) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = Hash32>,
    {
        let mut tree = Self::new(config)?;
        tree.insert_leaves(leaves);
        Ok(tree)
    }

    /// Build from every leaf of a paginated remote source.
    pub fn from_remote<S: LeafSource>(source: &mut S, config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        let leaves = fetch_all_leaves(source, config.page_size)?;
        info!(leaves = leaves.len(), "fetched remote leaves");
        Self::from_leaf_hashes(leaves, config)
    }

    /// Sort a hashing outcome into a leaf, a skip, or a fatal error.
    fn accept(
        &self,
        index: usize,
        leaf: Result<Option<Hash32>, LeafError>,
    ) -> Result<Option<Hash32>, TreeError> {
        match leaf {
            Ok(Some(leaf)) => Ok(Some(leaf)),
            Ok(None) => {
                debug!(index, "skipping key excluded from the circuit");
                Ok(None)
            },
            Err(LeafError::UnsupportedPublicKey(reason)) => {
                warn!(index, %reason, "skipping unsupported public key");
                Ok(None)
            },
            Err(LeafError::InvalidLength(len)) if self.config.skip_invalid_lengths => {
                warn!(index, len, "skipping key of unsupported length");
                Ok(None)
            },
            Err(source) => Err(TreeError::Leaf { index, source }),
        }
    }

    fn insert_leaves<I: IntoIterator<Item = Hash32>>(&mut self, leaves: I) {
        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        for leaf in leaves {
            if self.config.deduplicate && !seen.insert(leaf) {
                duplicates += 1;
                continue;
            }
            self.treap.insert_leaf(leaf);
        }
        info!(
            leaves = self.treap.len(),
            duplicates,
            root = %self.root_hex().unwrap_or_default(),
            "tree built"
        );
    }

    /// Root digest, `None` for an empty tree.
    pub fn root(&self) -> Option<Hash32> {
        self.treap.merkle_root()
    }

    /// Root digest as `0x`-prefixed hex, `None` for an empty tree.
    pub fn root_hex(&self) -> Option<String> {
        self.root().map(|root| root.to_string())
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.treap.len()
    }

    /// True if no leaf was inserted.
    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    /// Whether `leaf` is in the tree.
    pub fn contains(&self, leaf: &Hash32) -> bool {
        self.treap.contains(leaf)
    }

    /// Inclusion proof of `leaf`, padded to the configured depth.
    pub fn inclusion_proof(&self, leaf: &Hash32) -> Result<MerkleProof, TreeError> {
        self.treap
            .merkle_path_with_depth(leaf, self.config.proof_depth)
            .ok_or_else(|| TreeError::NotFound(leaf.to_string()))
    }

    /// Inclusion proof of the key of `certificate`.
    pub fn certificate_proof(&self, certificate: &Certificate) -> Result<MerkleProof, TreeError> {
        let key = PublicKey::from_certificate(certificate).map_err(TreeError::Key)?;
        self.key_proof(self.hasher.hash_public_key(&key))
    }

    /// Inclusion proof of a raw big-endian key.
    pub fn public_key_proof(&self, key: &[u8]) -> Result<MerkleProof, TreeError> {
        self.key_proof(self.hasher.hash_raw(key))
    }

    fn key_proof(&self, leaf: Result<Option<Hash32>, LeafError>) -> Result<MerkleProof, TreeError> {
        match leaf.map_err(TreeError::Key)? {
            Some(leaf) => self.inclusion_proof(&leaf),
            None => Err(TreeError::NotFound(
                "keys of this length are not indexed".to_string(),
            )),
        }
    }

    /// Check `proof` for `leaf` against this tree's root.
    pub fn verify(&self, leaf: &Hash32, proof: &MerkleProof) -> bool {
        self.root()
            .map_or(false, |root| verify_proof::<H>(&root, leaf, proof))
    }

    /// The underlying treap.
    pub fn treap(&self) -> &Treap<H> {
        &self.treap
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

/// Check that `proof` authenticates `leaf` under `root`, without access to
/// the tree.
pub fn verify_proof<H: TreapHasher>(root: &Hash32, leaf: &Hash32, proof: &MerkleProof) -> bool {
    proof.verify::<H>(leaf, root)
}

/// Decode a JSON proof and check it for `leaf` under `root`.
pub fn verify_json_proof<H: TreapHasher>(
    root: &Hash32,
    leaf: &Hash32,
    json: &str,
) -> Result<bool, TreeError> {
    let proof = codec::decode_json(json)?;
    Ok(verify_proof::<H>(root, leaf, &proof))
}

/// Unique RSA moduli of `certificates`, in first-seen order.
///
/// EC keys and 768-byte moduli are left out, other key types are an error.
pub fn extract_public_keys(certificates: &[Certificate]) -> Result<Vec<Vec<u8>>, TreeError> {
    let mut seen = HashSet::new();
    let mut keys = Vec::with_capacity(certificates.len());
    for (index, certificate) in certificates.iter().enumerate() {
        match PublicKey::from_certificate(certificate) {
            Ok(PublicKey::Rsa { modulus }) => {
                if modulus.len() != csca_leaf::hasher::IGNORED_KEY_LENGTH
                    && seen.insert(modulus.clone())
                {
                    keys.push(modulus);
                }
            },
            Ok(PublicKey::Ec { .. }) => debug!(index, "skipping EC key"),
            Err(source) => return Err(TreeError::Leaf { index, source }),
        }
    }
    Ok(keys)
}
