// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Error types.

// using `displaydoc` instead of `thiserror`, see
// https://github.com/dtolnay/thiserror/pull/64#issuecomment-735805334
// `thiserror` does not support #![no_std]

use displaydoc::Display;

/// Various error modes of the Poseidon hash.
#[derive(Debug, Display, Clone, Copy, Eq, PartialEq)]
pub enum PoseidonError {
    /// Poseidon accepts 1 to 16 inputs per call, got {0}
    InvalidInputLength(usize),
    /// Input #{0} is not a canonical element of the scalar field
    NonCanonicalInput(usize),
}

impl ark_std::error::Error for PoseidonError {}
