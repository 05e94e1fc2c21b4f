// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The Grain LFSR used by the Poseidon reference implementation to derive
//! round constants and the MDS matrix.
//!
//! Follows `generate_parameters_grain.sage` from
//! <https://extgit.iaik.tugraz.at/krypto/hadeshash>, which is also what the
//! circom/iden3 constants were generated with.

use ark_ff::{BigInteger, PrimeField};
use ark_std::{marker::PhantomData, vec::Vec};

const STATE_LEN: usize = 80;

/// Prime field (as opposed to binary field).
const FIELD_TYPE: u16 = 1;
/// `x^alpha` S-box (as opposed to `x^-1`).
const SBOX_TYPE: u16 = 0;

/// Self-shrinking Grain generator seeded with the permutation's shape.
pub(crate) struct Grain<F: PrimeField> {
    state: [bool; STATE_LEN],
    // index of the oldest bit of the shift register
    head: usize,
    _field: PhantomData<F>,
}

impl<F: PrimeField> Grain<F> {
    /// Seed the register with `(field, sbox, n, t, R_F, R_P)` followed by 30
    /// set bits, then discard the first 160 outputs.
    pub(crate) fn new(width: usize, full_rounds: usize, partial_rounds: usize) -> Self {
        let mut state = [true; STATE_LEN];
        let mut offset = 0;
        let mut set_bits = |len: usize, value: u16| {
            // most significant bit first
            for i in 0..len {
                state[offset + i] = (value >> (len - 1 - i)) & 1 == 1;
            }
            offset += len;
        };
        set_bits(2, FIELD_TYPE);
        set_bits(4, SBOX_TYPE);
        set_bits(12, F::MODULUS_BIT_SIZE as u16);
        set_bits(12, width as u16);
        set_bits(10, full_rounds as u16);
        set_bits(10, partial_rounds as u16);

        let mut grain = Self {
            state,
            head: 0,
            _field: PhantomData,
        };
        for _ in 0..160 {
            grain.clock();
        }
        grain
    }

    /// Shift the register once and return the new bit.
    #[inline]
    fn clock(&mut self) -> bool {
        let bit = |i: usize| self.state[(self.head + i) % STATE_LEN];
        let new_bit = bit(62) ^ bit(51) ^ bit(38) ^ bit(23) ^ bit(13) ^ bit(0);
        self.state[self.head] = new_bit;
        self.head = (self.head + 1) % STATE_LEN;
        new_bit
    }

    /// Next output of the self-shrinking generator: bits are consumed in
    /// pairs, the second bit of a pair is emitted only if the first is set.
    fn next_bit(&mut self) -> bool {
        loop {
            let select = self.clock();
            let bit = self.clock();
            if select {
                return bit;
            }
        }
    }

    fn next_bigint(&mut self) -> F::BigInt {
        let bits: Vec<bool> = (0..F::MODULUS_BIT_SIZE).map(|_| self.next_bit()).collect();
        F::BigInt::from_bits_be(&bits)
    }

    /// Next field element, rejecting samples that are not below the modulus.
    pub(crate) fn next_field_element(&mut self) -> F {
        loop {
            if let Some(element) = F::from_bigint(self.next_bigint()) {
                return element;
            }
        }
    }

    /// Next field element, reducing the sample modulo the field order.
    pub(crate) fn next_field_element_without_rejection(&mut self) -> F {
        F::from_be_bytes_mod_order(&self.next_bigint().to_bytes_be())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_grain_is_deterministic() {
        let mut a = Grain::<Fr>::new(3, 8, 57);
        let mut b = Grain::<Fr>::new(3, 8, 57);
        for _ in 0..8 {
            assert_eq!(a.next_field_element(), b.next_field_element());
        }
    }

    #[test]
    fn test_grain_depends_on_shape() {
        let mut a = Grain::<Fr>::new(3, 8, 57);
        let mut b = Grain::<Fr>::new(4, 8, 56);
        assert_ne!(a.next_field_element(), b.next_field_element());
    }
}
