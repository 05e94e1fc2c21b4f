// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Inclusion proofs.

use crate::{hash::Hash32, hasher::TreapHasher};
use ark_std::vec::Vec;

/// How the running digest is combined with a sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HashOrder {
    /// `hash(calculated, sibling)`
    #[default]
    Forward = 0,
    /// `hash(sibling, calculated)`
    Reverse = 1,
}

impl HashOrder {
    /// Order chosen by the node combination rule: smaller value first.
    pub fn between(calculated: &Hash32, sibling: &Hash32) -> Self {
        if calculated < sibling {
            HashOrder::Forward
        } else {
            HashOrder::Reverse
        }
    }

    /// Combine `calculated` with `sibling` in this order.
    pub fn apply<H: TreapHasher>(self, calculated: &Hash32, sibling: &Hash32) -> Hash32 {
        match self {
            HashOrder::Forward => H::hash_pair(calculated, sibling),
            HashOrder::Reverse => H::hash_pair(sibling, calculated),
        }
    }
}

impl From<HashOrder> for u8 {
    fn from(order: HashOrder) -> Self {
        order as u8
    }
}

impl TryFrom<u8> for HashOrder {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HashOrder::Forward),
            1 => Ok(HashOrder::Reverse),
            other => Err(other),
        }
    }
}

/// Leaf-to-root path authenticating one key.
///
/// `siblings` and `order` always have the same, fixed length; levels that do
/// not exist in the tree are `None` and skipped during recombination.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MerkleProof {
    /// Whether the proof claims membership.
    pub existence: bool,
    /// Sibling digests, leaf first.
    pub siblings: Vec<Option<Hash32>>,
    /// Combination order per sibling.
    pub order: Vec<HashOrder>,
}

impl MerkleProof {
    /// Build a membership proof for `leaf` from leaf-first siblings, deriving
    /// the order bits by replaying the combination rule.
    pub fn from_siblings<H: TreapHasher>(leaf: &Hash32, siblings: Vec<Option<Hash32>>) -> Self {
        let mut calculated = *leaf;
        let order = siblings
            .iter()
            .map(|sibling| match sibling {
                None => HashOrder::Forward,
                Some(sibling) => {
                    let order = HashOrder::between(&calculated, sibling);
                    calculated = order.apply::<H>(&calculated, sibling);
                    order
                },
            })
            .collect();
        Self {
            existence: true,
            siblings,
            order,
        }
    }

    /// Number of levels, padding included.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// True for a proof without levels.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Number of non-empty siblings.
    pub fn depth(&self) -> usize {
        self.siblings.iter().filter(|s| s.is_some()).count()
    }

    /// Recompute the root from `leaf`, following the recorded order bits.
    pub fn compute_root<H: TreapHasher>(&self, leaf: &Hash32) -> Hash32 {
        self.siblings
            .iter()
            .zip(self.order.iter())
            .fold(*leaf, |calculated, (sibling, order)| match sibling {
                Some(sibling) => order.apply::<H>(&calculated, sibling),
                None => calculated,
            })
    }

    /// Check that the proof authenticates `leaf` under `root`.
    ///
    /// Fails if the leaf or any sibling is not a canonical input of `H`.
    pub fn verify<H: TreapHasher>(&self, leaf: &Hash32, root: &Hash32) -> bool {
        self.existence
            && self.siblings.len() == self.order.len()
            && H::is_canonical(leaf)
            && self.siblings.iter().flatten().all(H::is_canonical)
            && self.compute_root::<H>(leaf) == *root
    }
}
