// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The authenticated treap.
//!
//! A binary search tree ordered by key and max-heap ordered by priority.
//! Since priorities are derived from keys, the shape of the tree only
//! depends on the set of keys, not on the order they were inserted in.
//! Every node caches the digest of its subtree.

use crate::{
    hash::Hash32,
    hasher::{combine, hash_sorted, PoseidonHasher, TreapHasher},
    proof::MerkleProof,
};
use ark_std::{boxed::Box, cmp::Ordering, marker::PhantomData, vec::Vec};

/// Number of levels of a proof, as expected by fixed-size verifiers.
pub const TREE_HEIGHT: usize = 16;

type Link = Option<Box<Node>>;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    key: Hash32,
    priority: u64,
    merkle: Hash32,
    left: Link,
    right: Link,
}

impl Node {
    fn new(key: Hash32, priority: u64) -> Box<Self> {
        Box::new(Self {
            key,
            priority,
            merkle: key,
            left: None,
            right: None,
        })
    }

    fn children_hash<H: TreapHasher>(&self) -> Option<Hash32> {
        combine::<H>(merkle(&self.left), merkle(&self.right))
    }

    /// Recompute the cached digest from the children.
    fn refresh<H: TreapHasher>(&mut self) {
        self.merkle = match self.children_hash::<H>() {
            Some(children) => hash_sorted::<H>(&children, &self.key),
            None => self.key,
        };
    }
}

#[inline]
fn merkle(link: &Link) -> Option<&Hash32> {
    link.as_ref().map(|node| &node.merkle)
}

/// Partition into keys `<= key` and keys `> key`.
fn split<H: TreapHasher>(link: Link, key: &Hash32) -> (Link, Link) {
    match link {
        None => (None, None),
        Some(mut node) => {
            if node.key <= *key {
                let (left, right) = split::<H>(node.right.take(), key);
                node.right = left;
                node.refresh::<H>();
                (Some(node), right)
            } else {
                let (left, right) = split::<H>(node.left.take(), key);
                node.left = right;
                node.refresh::<H>();
                (left, Some(node))
            }
        },
    }
}

/// Join two trees where every key of `left` precedes every key of `right`.
/// On equal priorities the right root wins.
fn merge<H: TreapHasher>(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(mut left), Some(mut right)) => {
            if left.priority > right.priority {
                left.right = merge::<H>(left.right.take(), Some(right));
                left.refresh::<H>();
                Some(left)
            } else {
                right.left = merge::<H>(Some(left), right.left.take());
                right.refresh::<H>();
                Some(right)
            }
        },
    }
}

fn count(link: &Link) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + count(&node.left) + count(&node.right))
}

/// Authenticated treap generic over its [`TreapHasher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Treap<H: TreapHasher = PoseidonHasher> {
    root: Link,
    num_nodes: usize,
    _hasher: PhantomData<H>,
}

impl<H: TreapHasher> Default for Treap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TreapHasher> Treap<H> {
    /// An empty treap.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
            _hasher: PhantomData,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// True if no key was inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert `key` with an explicit heap priority.
    ///
    /// Keys are not deduplicated: inserting a present key adds a second node
    /// next to the first one.
    pub fn insert(&mut self, key: Hash32, priority: u64) {
        let (left, right) = split::<H>(self.root.take(), &key);
        let middle = Some(Node::new(key, priority));
        self.root = merge::<H>(merge::<H>(left, middle), right);
        self.num_nodes += 1;
    }

    /// Insert `key` with its derived priority.
    pub fn insert_leaf(&mut self, key: Hash32) {
        self.insert(key, H::priority(&key))
    }

    /// Remove every node holding `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: &Hash32) -> bool {
        let (left, rest) = match key.predecessor() {
            Some(below) => split::<H>(self.root.take(), &below),
            // nothing is smaller than zero
            None => (None, self.root.take()),
        };
        let (removed, right) = split::<H>(rest, key);
        self.root = merge::<H>(left, right);

        let removed = count(&removed);
        self.num_nodes -= removed;
        removed > 0
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &Hash32) -> bool {
        self.find(key).is_some()
    }

    fn find(&self, key: &Hash32) -> Option<&Node> {
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            node = match current.key.cmp(key) {
                Ordering::Equal => return Some(current),
                Ordering::Greater => current.left.as_deref(),
                Ordering::Less => current.right.as_deref(),
            };
        }
        None
    }

    /// Digest of the whole tree, `None` when empty.
    pub fn merkle_root(&self) -> Option<Hash32> {
        merkle(&self.root).copied()
    }

    /// Inclusion proof for `key` padded to [`TREE_HEIGHT`] levels, `None` if
    /// the key is absent.
    pub fn merkle_path(&self, key: &Hash32) -> Option<MerkleProof> {
        self.merkle_path_with_depth(key, TREE_HEIGHT)
    }

    /// Inclusion proof padded to `depth` levels.
    ///
    /// Paths longer than `depth` are not cut: the padded length doubles until
    /// it fits, giving `depth`, `2 * depth`, `4 * depth` and so on.
    pub fn merkle_path_with_depth(&self, key: &Hash32, depth: usize) -> Option<MerkleProof> {
        let mut siblings = Vec::with_capacity(depth);
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            match current.key.cmp(key) {
                Ordering::Equal => {
                    siblings.push(current.children_hash::<H>());
                    siblings.reverse();
                    siblings.resize(padded_len(siblings.len(), depth), None);
                    return Some(MerkleProof::from_siblings::<H>(key, siblings));
                },
                Ordering::Greater => {
                    siblings.push(Some(current.key));
                    if let Some(right) = merkle(&current.right) {
                        siblings.push(Some(*right));
                    }
                    node = current.left.as_deref();
                },
                Ordering::Less => {
                    siblings.push(Some(current.key));
                    if let Some(left) = merkle(&current.left) {
                        siblings.push(Some(*left));
                    }
                    node = current.right.as_deref();
                },
            }
        }
        None
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Hash32> {
        fn walk(link: &Link, out: &mut Vec<Hash32>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(node.key);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.num_nodes);
        walk(&self.root, &mut out);
        out
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height(link: &Link) -> usize {
            link.as_ref()
                .map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
        }
        height(&self.root)
    }
}

/// Smallest `depth * 2^k` holding `len` levels.
fn padded_len(len: usize, depth: usize) -> usize {
    let mut padded = depth.max(1);
    while padded < len {
        padded *= 2;
    }
    padded
}

impl<H: TreapHasher> Extend<Hash32> for Treap<H> {
    fn extend<T: IntoIterator<Item = Hash32>>(&mut self, iter: T) {
        iter.into_iter().for_each(|key| self.insert_leaf(key));
    }
}

impl<H: TreapHasher> FromIterator<Hash32> for Treap<H> {
    fn from_iter<T: IntoIterator<Item = Hash32>>(iter: T) -> Self {
        let mut treap = Self::new();
        treap.extend(iter);
        treap
    }
}
