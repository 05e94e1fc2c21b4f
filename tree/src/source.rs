// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Paginated retrieval of precomputed leaves from an authoritative ledger.

use crate::errors::TreeError;
use csca_treap::Hash32;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// Window of leaves requested from a [`LeafSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of leaves to skip.
    pub offset: u64,
    /// Maximum number of leaves to return.
    pub limit: u64,
}

/// One leaf as reported by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLeaf {
    /// Hex encoded leaf, `0x` prefix optional.
    pub key: String,
}

/// A page of leaves together with the total number of leaves available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPage {
    /// Leaves of this page.
    pub leaves: Vec<RemoteLeaf>,
    /// Number of leaves across all pages.
    pub total: u64,
}

/// Paginated query over the leaves of a remote tree.
///
/// Transport, retries and timeouts are up to the implementor.
pub trait LeafSource {
    /// Transport error.
    type Error: Display;

    /// Fetch the leaves in the requested window.
    fn fetch_page(&mut self, request: PageRequest) -> Result<LeafPage, Self::Error>;
}

/// Fetch every leaf of `source`, `page_size` leaves at a time, until the
/// reported total has been collected.
pub fn fetch_all_leaves<S: LeafSource>(
    source: &mut S,
    page_size: usize,
) -> Result<Vec<Hash32>, TreeError> {
    if page_size == 0 {
        return Err(TreeError::Config("page_size must be positive".to_string()));
    }

    let mut leaves = Vec::new();
    loop {
        let offset = leaves.len() as u64;
        let page = source
            .fetch_page(PageRequest {
                offset,
                limit: page_size as u64,
            })
            .map_err(|e| TreeError::UpstreamFetch(format!("page at offset {}: {}", offset, e)))?;
        debug!(
            offset,
            received = page.leaves.len(),
            total = page.total,
            "fetched leaf page"
        );

        let received = page.leaves.len();
        for leaf in page.leaves {
            let hash = leaf.key.parse::<Hash32>().map_err(|e| {
                TreeError::UpstreamFetch(format!("undecodable key {:?}: {}", leaf.key, e))
            })?;
            leaves.push(hash);
        }

        if leaves.len() as u64 >= page.total {
            return Ok(leaves);
        }
        if received == 0 {
            return Err(TreeError::UpstreamFetch(format!(
                "empty page at offset {} with {} of {} leaves collected",
                offset,
                leaves.len(),
                page.total
            )));
        }
    }
}
