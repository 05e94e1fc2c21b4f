// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The Poseidon permutation: add-round-key, S-box, MDS mixing.

use crate::params::PoseidonParams;
use ark_ff::PrimeField;
use ark_std::vec::Vec;

/// Apply the full permutation in place.
pub(crate) fn permute<F: PrimeField>(params: &PoseidonParams<F>, state: &mut [F]) {
    debug_assert_eq!(state.len(), params.width);
    let half_full = params.full_rounds / 2;
    let total = params.full_rounds + params.partial_rounds;

    for round in 0..total {
        add_rc(state, &params.round_constants[round * params.width..][..params.width]);
        if round < half_full || round >= half_full + params.partial_rounds {
            state.iter_mut().for_each(sbox);
        } else {
            sbox(&mut state[0]);
        }
        mix(state, &params.mds);
    }
}

#[inline]
fn add_rc<F: PrimeField>(state: &mut [F], rc: &[F]) {
    state.iter_mut().zip(rc).for_each(|(s, c)| *s += c);
}

/// `x -> x^5`
#[inline(always)]
fn sbox<F: PrimeField>(x: &mut F) {
    let x2 = x.square();
    let x4 = x2.square();
    *x *= x4;
}

#[inline]
fn mix<F: PrimeField>(state: &mut [F], mds: &[Vec<F>]) {
    let mixed: Vec<F> = mds
        .iter()
        .map(|row| {
            row.iter()
                .zip(state.iter())
                .fold(F::zero(), |acc, (m, s)| acc + *m * s)
        })
        .collect();
    state.copy_from_slice(&mixed);
}
