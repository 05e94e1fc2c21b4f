// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Hash functions used to authenticate the treap and to derive priorities.

use crate::hash::Hash32;
use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

/// Hashing strategy of a [`Treap`](crate::Treap).
///
/// Implementors supply the two compression functions; the node combination
/// rule and the priority derivation are shared.
pub trait TreapHasher {
    /// Digest of a single value, used for priorities.
    fn hash_single(value: &Hash32) -> Hash32;

    /// Digest of an ordered pair.
    fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32;

    /// Whether `value` is a valid input of this hasher. Proofs carrying any
    /// other value do not verify.
    fn is_canonical(_value: &Hash32) -> bool {
        true
    }

    /// Heap priority of `key`: `hash_single(key) mod (2^64 - 1)`.
    fn priority(key: &Hash32) -> u64 {
        let digest = BigUint::from_bytes_be(Self::hash_single(key).as_bytes());
        let reduced = digest % BigUint::from(u64::MAX);
        reduced.iter_u64_digits().next().unwrap_or(0)
    }
}

/// Poseidon over the BN254 scalar field, compatible with circom verifiers.
///
/// Values are reduced into the field before hashing so that tree operations
/// cannot fail; leaf hashes produced by the circuit-mode leaf hasher and all
/// inner node hashes are already canonical, so the reduction never changes
/// them. Verification rejects values at or above the modulus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoseidonHasher;

impl PoseidonHasher {
    fn to_field(value: &Hash32) -> Fr {
        Fr::from_be_bytes_mod_order(value.as_bytes())
    }
}

impl TreapHasher for PoseidonHasher {
    fn is_canonical(value: &Hash32) -> bool {
        csca_poseidon::fr_from_be_bytes(value.as_bytes()).is_some()
    }

    fn hash_single(value: &Hash32) -> Hash32 {
        let digest = csca_poseidon::hash_single(Self::to_field(value));
        Hash32(csca_poseidon::fr_to_bytes(&digest))
    }

    fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32 {
        let digest = csca_poseidon::hash_pair(Self::to_field(left), Self::to_field(right));
        Hash32(csca_poseidon::fr_to_bytes(&digest))
    }
}

/// Keccak-256 of the concatenated inputs, for consumers outside a circuit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeccakHasher;

impl TreapHasher for KeccakHasher {
    fn hash_single(value: &Hash32) -> Hash32 {
        Hash32(Keccak256::digest(value.as_bytes()).into())
    }

    fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32 {
        let mut hasher = Keccak256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Hash32(hasher.finalize().into())
    }
}

/// Combine two optional subtree hashes.
///
/// A missing side is absorbed and the other value returned unchanged.
/// Otherwise the pair is hashed smaller value first, so the result does not
/// depend on which side each value came from.
pub fn combine<H: TreapHasher>(a: Option<&Hash32>, b: Option<&Hash32>) -> Option<Hash32> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(*x),
        (Some(a), Some(b)) => Some(hash_sorted::<H>(a, b)),
    }
}

#[inline]
pub(crate) fn hash_sorted<H: TreapHasher>(a: &Hash32, b: &Hash32) -> Hash32 {
    if a < b {
        H::hash_pair(a, b)
    } else {
        H::hash_pair(b, a)
    }
}
