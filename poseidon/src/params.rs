// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Poseidon parameters for the BN254 scalar field.

use crate::grain::Grain;
use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_std::{vec, vec::Vec};
use lazy_static::lazy_static;

/// Smallest supported state size (one input plus the capacity element).
pub const MIN_WIDTH: usize = 2;
/// Largest supported state size (16 inputs plus the capacity element).
pub const MAX_WIDTH: usize = 17;
/// Number of full rounds, split evenly before and after the partial rounds.
pub const FULL_ROUNDS: usize = 8;
/// Number of partial rounds indexed by `width - MIN_WIDTH`, matching the
/// circom/iden3 instantiation over BN254 with the `x^5` S-box.
pub const PARTIAL_ROUNDS: [usize; MAX_WIDTH - MIN_WIDTH + 1] =
    [56, 57, 56, 60, 60, 63, 64, 63, 60, 66, 60, 65, 70, 60, 64, 68];

/// Round constants and MDS matrix of one Poseidon instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseidonParams<F: PrimeField> {
    /// state size t
    pub width: usize,
    /// R_F
    pub full_rounds: usize,
    /// R_P
    pub partial_rounds: usize,
    /// `(R_F + R_P) * t` constants, `t` per round
    pub round_constants: Vec<F>,
    /// `t x t` Cauchy matrix, row-major
    pub mds: Vec<Vec<F>>,
}

impl<F: PrimeField> PoseidonParams<F> {
    /// Derive the parameters from the Grain LFSR exactly as the reference
    /// script does: round constants first, then the MDS matrix from the same
    /// stream.
    pub fn generate(width: usize, full_rounds: usize, partial_rounds: usize) -> Self {
        let mut grain = Grain::<F>::new(width, full_rounds, partial_rounds);
        let round_constants = (0..(full_rounds + partial_rounds) * width)
            .map(|_| grain.next_field_element())
            .collect();
        let mds = cauchy_matrix(&mut grain, width);
        Self {
            width,
            full_rounds,
            partial_rounds,
            round_constants,
            mds,
        }
    }
}

/// `M[i][j] = 1 / (x_i + y_j)` over `2t` distinct samples.
fn cauchy_matrix<F: PrimeField>(grain: &mut Grain<F>, width: usize) -> Vec<Vec<F>> {
    'sample: loop {
        let samples: Vec<F> = (0..2 * width)
            .map(|_| grain.next_field_element_without_rejection())
            .collect();
        let mut sorted = samples.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != samples.len() {
            continue;
        }

        let (xs, ys) = samples.split_at(width);
        let mut mds = vec![vec![F::zero(); width]; width];
        for (i, x) in xs.iter().enumerate() {
            for (j, y) in ys.iter().enumerate() {
                match (*x + y).inverse() {
                    Some(entry) => mds[i][j] = entry,
                    None => continue 'sample,
                }
            }
        }
        return mds;
    }
}

lazy_static! {
    /// Parameters for every supported width, generated on first use.
    static ref BN254_PARAMS: Vec<PoseidonParams<Fr>> = (MIN_WIDTH..=MAX_WIDTH)
        .map(|width| {
            PoseidonParams::generate(width, FULL_ROUNDS, PARTIAL_ROUNDS[width - MIN_WIDTH])
        })
        .collect();
}

/// Parameters for the permutation absorbing `num_inputs` field elements, or
/// `None` outside of `1..=16`.
pub fn bn254_params(num_inputs: usize) -> Option<&'static PoseidonParams<Fr>> {
    BN254_PARAMS.get(num_inputs.checked_sub(1)?)
}
