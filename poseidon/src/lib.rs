// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The Poseidon hash over the BN254 scalar field.
//!
//! This instantiation (`x^5` S-box, 8 full rounds, width `t = n + 1` for `n`
//! inputs) is bit-for-bit compatible with circomlib's `Poseidon(n)` template
//! and the iden3 Go/JS libraries, so digests computed here can be checked
//! inside a zero-knowledge circuit.
//!
//! Resources:
//! - <https://eprint.iacr.org/2019/458.pdf>
//! - <https://github.com/iden3/circomlib/blob/master/circuits/poseidon.circom>

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_std::vec::Vec;

pub mod errors;
mod grain;
pub mod params;
mod permutation;

pub use errors::PoseidonError;
pub use params::{bn254_params, PoseidonParams};

/// Maximum number of field elements absorbed by a single call.
pub const MAX_INPUTS: usize = 16;

/// Byte length of a serialized field element.
pub const FIELD_BYTES: usize = 32;

/// Poseidon digest of 1 to 16 field elements.
pub fn hash(inputs: &[Fr]) -> Result<Fr, PoseidonError> {
    let params =
        bn254_params(inputs.len()).ok_or(PoseidonError::InvalidInputLength(inputs.len()))?;

    let mut state = Vec::with_capacity(params.width);
    state.push(Fr::zero());
    state.extend_from_slice(inputs);
    permutation::permute(params, &mut state);
    Ok(state[0])
}

/// Poseidon digest of a single element.
pub fn hash_single(input: Fr) -> Fr {
    permute_fixed([Fr::zero(), input])
}

/// Poseidon digest of two elements, in the given order.
pub fn hash_pair(left: Fr, right: Fr) -> Fr {
    permute_fixed([Fr::zero(), left, right])
}

fn permute_fixed<const T: usize>(mut state: [Fr; T]) -> Fr {
    // `T - 1` is always within `1..=MAX_INPUTS` for the callers above
    match bn254_params(T - 1) {
        Some(params) => {
            permutation::permute(params, &mut state);
            state[0]
        },
        None => unreachable!("no parameters for width {}", T),
    }
}

/// Hash big-endian byte strings, each interpreted as one field element, and
/// return the digest as 32 big-endian bytes.
pub fn hash_bytes(inputs: &[&[u8]]) -> Result<[u8; FIELD_BYTES], PoseidonError> {
    let elements = inputs
        .iter()
        .enumerate()
        .map(|(i, bytes)| fr_from_be_bytes(bytes).ok_or(PoseidonError::NonCanonicalInput(i)))
        .collect::<Result<Vec<_>, _>>()?;
    hash(&elements).map(|digest| fr_to_bytes(&digest))
}

/// Parse a big-endian integer as a field element.
///
/// Returns `None` when the integer is not smaller than the field modulus.
/// Leading zero bytes are ignored, so inputs longer than 32 bytes are
/// accepted as long as their value fits.
pub fn fr_from_be_bytes(bytes: &[u8]) -> Option<Fr> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if significant.len() > FIELD_BYTES {
        return None;
    }
    let mut padded = [0u8; FIELD_BYTES];
    padded[FIELD_BYTES - significant.len()..].copy_from_slice(significant);
    let element = Fr::from_be_bytes_mod_order(&padded);
    // values at or above the modulus do not survive the round trip
    (fr_to_bytes(&element) == padded).then_some(element)
}

/// Serialize a field element as 32 big-endian bytes.
pub fn fr_to_bytes(element: &Fr) -> [u8; FIELD_BYTES] {
    let mut out = [0u8; FIELD_BYTES];
    let bytes = element.into_bigint().to_bytes_be();
    out[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::str::FromStr;

    fn fr(s: &str) -> Fr {
        Fr::from_str(s).unwrap()
    }

    fn frs(range: core::ops::RangeInclusive<u64>) -> Vec<Fr> {
        range.map(Fr::from).collect()
    }

    #[test]
    fn test_circomlib_vectors() {
        assert_eq!(
            hash(&frs(1..=1)).unwrap(),
            fr("18586133768512220936620570745912940619677854269274689475585506675881198879027")
        );
        assert_eq!(
            hash(&frs(1..=2)).unwrap(),
            fr("7853200120776062878684798364095072458815029376092732009249414926327459813530")
        );
        assert_eq!(
            hash(&frs(1..=4)).unwrap(),
            fr("18821383157269793795438455681495246036402687001665670618754263018637548127333")
        );
        assert_eq!(
            hash(&frs(1..=5)).unwrap(),
            fr("6183221330272524995739186171720101788151706631170188140075976616310159254464")
        );
        assert_eq!(
            hash(&frs(1..=16)).unwrap(),
            fr("9989051620750914585850546081941653841776809718687451684622678807385399211877")
        );
        assert_eq!(
            hash(&[Fr::zero(), Fr::zero()]).unwrap(),
            fr("14744269619966411208579211824598458697587494354926760081771325075741142829156")
        );
    }

    #[test]
    fn test_fixed_arity_helpers() {
        let (a, b) = (Fr::from(1u64), Fr::from(2u64));
        assert_eq!(hash_pair(a, b), hash(&[a, b]).unwrap());
        assert_ne!(hash_pair(a, b), hash_pair(b, a));
        assert_eq!(hash_single(a), hash(&[a]).unwrap());
    }

    #[test]
    fn test_input_length() {
        assert_eq!(hash(&[]), Err(PoseidonError::InvalidInputLength(0)));
        assert_eq!(
            hash(&frs(1..=17)),
            Err(PoseidonError::InvalidInputLength(17))
        );
    }

    #[test]
    fn test_hash_bytes() {
        let digest = hash_bytes(&[&[1u8], &[0u8, 0, 2]]).unwrap();
        assert_eq!(
            hex::encode(digest),
            "115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a"
        );

        let too_big = [0xffu8; 32];
        assert_eq!(
            hash_bytes(&[&[1u8], &too_big]),
            Err(PoseidonError::NonCanonicalInput(1))
        );
    }

    #[test]
    fn test_byte_conversion() {
        let x = Fr::from(0x0102u64);
        let bytes = fr_to_bytes(&x);
        assert_eq!(&bytes[30..], &[1, 2]);
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(fr_from_be_bytes(&bytes), Some(x));

        let mut padded = vec![0u8; 40];
        padded[39] = 7;
        assert_eq!(fr_from_be_bytes(&padded), Some(Fr::from(7u64)));
        assert_eq!(fr_from_be_bytes(&[0u8; 33][..]), Some(Fr::zero()));
        assert_eq!(fr_from_be_bytes(&[1u8; 33][..]), None);
        // the modulus itself is not canonical
        let modulus = Fr::MODULUS.to_bytes_be();
        assert_eq!(fr_from_be_bytes(&modulus), None);
    }
}
