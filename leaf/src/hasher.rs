// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Leaf derivation.
//!
//! In [`HashMode::Circuit`] a key of 256, 384 or 512 bytes is split into 64
//! big-endian chunks, least significant chunk first. Every group of 16
//! chunks is hashed with Poseidon and the 4 group digests are hashed again.
//! This is what the passport verification circuit recomputes.
//!
//! In [`HashMode::Plain`] the leaf is `keccak256(key)`.

use crate::{errors::LeafError, public_key::PublicKey};
use ark_bn254::Fr;
use ark_ff::PrimeField;
use csca_treap::Hash32;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use x509_cert::Certificate;

/// Key lengths, in bytes, accepted in circuit mode.
pub const SUPPORTED_KEY_LENGTHS: [usize; 3] = [256, 384, 512];

/// Key length, in bytes, that the circuit does not support and that is
/// silently left out of the tree.
pub const IGNORED_KEY_LENGTH: usize = 768;

/// Number of chunks a key is split into in circuit mode.
pub const CHUNKS: usize = 64;

/// Number of chunks absorbed per Poseidon call.
const CHUNKS_PER_HASH: usize = 16;

/// Which hash leaves are derived with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    /// Poseidon over chunks of the key, verifiable in a circuit.
    #[default]
    Circuit,
    /// Keccak-256 of the key.
    Plain,
}

/// Turns public keys into treap leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeafHasher {
    mode: HashMode,
}

impl LeafHasher {
    /// Hasher for the given mode.
    pub fn new(mode: HashMode) -> Self {
        Self { mode }
    }

    /// Circuit-compatible hasher.
    pub fn circuit() -> Self {
        Self::new(HashMode::Circuit)
    }

    /// Keccak hasher.
    pub fn plain() -> Self {
        Self::new(HashMode::Plain)
    }

    /// The configured mode.
    pub fn mode(&self) -> HashMode {
        self.mode
    }

    /// Leaf of a raw big-endian key.
    ///
    /// Returns `Ok(None)` for a 768-byte key in circuit mode, which callers
    /// must leave out of the tree.
    pub fn hash_raw(&self, key: &[u8]) -> Result<Option<Hash32>, LeafError> {
        let start = key.iter().position(|b| *b != 0).unwrap_or(key.len());
        let key = &key[start..];
        match self.mode {
            HashMode::Plain => Ok(Some(Hash32(Keccak256::digest(key).into()))),
            HashMode::Circuit if key.len() == IGNORED_KEY_LENGTH => Ok(None),
            HashMode::Circuit if SUPPORTED_KEY_LENGTHS.contains(&key.len()) => {
                chunked_poseidon(key).map(Some)
            },
            HashMode::Circuit => Err(LeafError::InvalidLength(key.len())),
        }
    }

    /// Leaf of an extracted public key.
    ///
    /// The circuit only verifies RSA signatures, so EC keys are rejected in
    /// circuit mode.
    pub fn hash_public_key(&self, key: &PublicKey) -> Result<Option<Hash32>, LeafError> {
        match (self.mode, key) {
            (HashMode::Circuit, PublicKey::Ec { .. }) => Err(LeafError::UnsupportedPublicKey(
                "EC keys cannot be hashed for the circuit".to_string(),
            )),
            _ => self.hash_raw(key.as_bytes()),
        }
    }

    /// Leaf of the public key of `certificate`.
    pub fn hash_certificate(&self, certificate: &Certificate) -> Result<Option<Hash32>, LeafError> {
        self.hash_public_key(&PublicKey::from_certificate(certificate)?)
    }
}

fn chunked_poseidon(key: &[u8]) -> Result<Hash32, LeafError> {
    // at most 8 bytes per chunk, always below the modulus
    let chunks: Vec<Fr> = key
        .rchunks(key.len() / CHUNKS)
        .map(Fr::from_be_bytes_mod_order)
        .collect();
    let groups = chunks
        .chunks(CHUNKS_PER_HASH)
        .map(csca_poseidon::hash)
        .collect::<Result<Vec<_>, _>>()?;
    let digest = csca_poseidon::hash(&groups)?;
    Ok(Hash32(csca_poseidon::fr_to_bytes(&digest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 255) as u8 + 1).collect()
    }

    fn h(s: &str) -> Hash32 {
        s.parse().unwrap()
    }

    #[test]
    fn test_circuit_vectors() {
        let hasher = LeafHasher::circuit();
        let cases = [
            (256, "1d300af46b5966c3154c01826f143fbdf0745d4d1dd4f0c9771a126265593f53"),
            (384, "183af406d3435cfde343874bef2e4dbdb6616855b6efeb4076a6ab248503e4b4"),
            (512, "19f6b512248568144f5f57d978a00c2ff7ad4a224db1a552b773bbda39231ed6"),
        ];
        for (len, leaf) in cases {
            assert_eq!(hasher.hash_raw(&synthetic(len)).unwrap(), Some(h(leaf)));
        }
    }

    #[test]
    fn test_plain_vector() {
        assert_eq!(
            LeafHasher::plain().hash_raw(&synthetic(512)).unwrap(),
            Some(h(
                "eb7040c1968d668db8f16ec8a1a73c030d4cfdd3652217e623e8716a8b9d0446"
            ))
        );
        // plain mode accepts any length
        assert!(LeafHasher::plain().hash_raw(&[1, 2, 3]).unwrap().is_some());
    }

    #[test]
    fn test_leading_zeros_are_ignored() {
        let hasher = LeafHasher::circuit();
        let key = synthetic(256);
        let mut padded = vec![0u8; 3];
        padded.extend_from_slice(&key);
        assert_eq!(hasher.hash_raw(&padded), hasher.hash_raw(&key));
    }

    #[test]
    fn test_lengths() {
        let hasher = LeafHasher::circuit();
        assert_eq!(hasher.hash_raw(&synthetic(768)), Ok(None));
        assert_eq!(
            hasher.hash_raw(&synthetic(128)),
            Err(LeafError::InvalidLength(128))
        );
        assert_eq!(
            hasher.hash_raw(&synthetic(513)),
            Err(LeafError::InvalidLength(513))
        );
        assert_eq!(hasher.hash_raw(&[]), Err(LeafError::InvalidLength(0)));
    }

    #[test]
    fn test_chunk_order() {
        // reversing the chunk order must change the leaf
        let key = synthetic(256);
        let reversed: Vec<u8> = key
            .chunks(4)
            .rev()
            .flat_map(|c| c.iter().copied())
            .collect();
        let hasher = LeafHasher::circuit();
        assert_ne!(hasher.hash_raw(&key), hasher.hash_raw(&reversed));
    }

    #[test]
    fn test_ec_keys() {
        let key = PublicKey::Ec {
            point: synthetic(64),
        };
        assert!(matches!(
            LeafHasher::circuit().hash_public_key(&key),
            Err(LeafError::UnsupportedPublicKey(_))
        ));
        assert_eq!(
            LeafHasher::plain().hash_public_key(&key),
            LeafHasher::plain().hash_raw(&synthetic(64))
        );
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&HashMode::Plain).unwrap(), "\"plain\"");
        assert_eq!(
            serde_json::from_str::<HashMode>("\"circuit\"").unwrap(),
            HashMode::Circuit
        );
        assert_eq!(LeafHasher::default().mode(), HashMode::Circuit);
    }
}
