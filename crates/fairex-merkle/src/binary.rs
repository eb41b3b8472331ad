//! Binary Merkle Tree implementation.
//!
//! An ordered commitment over chunk hashes with positional inclusion proofs.
//!
//! # Odd levels
//!
//! When a level has an odd number of nodes, the last node is promoted to the
//! next level unchanged. A promoted node has no sibling at that level, so its
//! proof carries no step for it. Because every [`ProofStep`] records which side
//! its sibling sits on, verification replays exactly the pairings construction
//! performed.
//!
//! # Example
//!
//! ```
//! use fairex_merkle::{BinaryMerkleTree, MerkleHasher, Sha256Hasher};
//!
//! let leaves: Vec<_> = [b"a", b"b", b"c"].iter().map(|d| Sha256Hasher.digest(*d)).collect();
//! let tree = BinaryMerkleTree::build(leaves.clone(), Sha256Hasher);
//!
//! let proof = tree.proof(&leaves[2], 2).unwrap();
//! assert!(tree.verify(&proof, &leaves[2], &tree.root()));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};
use crate::hash::HashValue;
use crate::hasher::{MerkleHasher, Sha256Hasher};

/// Which side of the running hash a proof sibling sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One level of an inclusion proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: HashValue,
    pub side: Side,
}

/// Inclusion proof for one leaf position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMerkleProof {
    leaf_index: usize,
    leaf_count: usize,
    /// Sibling hashes from leaf to root (bottom-up)
    steps: Vec<ProofStep>,
}

impl BinaryMerkleProof {
    pub fn new(leaf_index: usize, leaf_count: usize, steps: Vec<ProofStep>) -> Self {
        Self {
            leaf_index,
            leaf_count,
            steps,
        }
    }

    pub fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Number of sibling hashes in this proof
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Recompute the root implied by `leaf` and this proof.
    pub fn compute_root<H: MerkleHasher + ?Sized>(&self, hasher: &H, leaf: &HashValue) -> HashValue {
        self.steps.iter().fold(*leaf, |current, step| match step.side {
            Side::Left => hasher.digest_pair(&step.sibling, &current),
            Side::Right => hasher.digest_pair(&current, &step.sibling),
        })
    }

    /// Verify inclusion of `leaf` under `root`.
    ///
    /// # Returns
    ///
    /// Ok(()) if the recomputed root equals `root`
    pub fn verify_inclusion<H: MerkleHasher + ?Sized>(
        &self,
        hasher: &H,
        root: &HashValue,
        leaf: &HashValue,
    ) -> MerkleResult<()> {
        if self.leaf_index >= self.leaf_count {
            return Err(MerkleError::InvalidProof(format!(
                "Leaf index {} outside tree of {} leaves",
                self.leaf_index, self.leaf_count
            )));
        }

        let computed_root = self.compute_root(hasher, leaf);
        if &computed_root == root {
            Ok(())
        } else {
            Err(MerkleError::InvalidProof(format!(
                "Root mismatch: expected {}, computed {}",
                root, computed_root
            )))
        }
    }

    /// Boolean form of [`verify_inclusion`](Self::verify_inclusion).
    pub fn verify<H: MerkleHasher + ?Sized>(&self, hasher: &H, leaf: &HashValue, root: &HashValue) -> bool {
        self.verify_inclusion(hasher, root, leaf).is_ok()
    }
}

/// A binary Merkle tree over an ordered list of leaf hashes.
///
/// The tree keeps every level (`levels[0]` are the leaves, the last level
/// holds the root) and the hasher it was built with.
#[derive(Clone, Debug)]
pub struct BinaryMerkleTree<H: MerkleHasher = Sha256Hasher> {
    levels: Vec<Vec<HashValue>>,
    hasher: H,
}

impl<H: MerkleHasher> BinaryMerkleTree<H> {
    /// Build a tree over already-hashed leaves.
    ///
    /// An empty leaf list yields an empty tree whose root is [`HashValue::ZERO`].
    pub fn build(leaves: Vec<HashValue>, hasher: H) -> Self {
        if leaves.is_empty() {
            return Self {
                levels: Vec::new(),
                hasher,
            };
        }

        let mut levels = Vec::new();
        let mut current = leaves;
        while current.len() > 1 {
            let next = parent_level(&hasher, &current);
            levels.push(std::mem::replace(&mut current, next));
        }
        levels.push(current);

        Self { levels, hasher }
    }

    /// Hash each item as a leaf, then build.
    pub fn from_data<T: AsRef<[u8]> + Sync>(items: &[T], hasher: H) -> Self {
        let leaves = hash_leaves(&hasher, items);
        Self::build(leaves, hasher)
    }

    /// Root hash of the tree.
    pub fn root(&self) -> HashValue {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(HashValue::ZERO)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn leaves(&self) -> &[HashValue] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn leaf(&self, index: usize) -> Option<&HashValue> {
        self.leaves().get(index)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Positional proof for `index`, independent of the leaf value stored there.
    pub fn proof_at(&self, index: usize) -> MerkleResult<BinaryMerkleProof> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, leaf_count });
        }

        let mut steps = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in &self.levels[..self.depth()] {
            let sibling = position ^ 1;
            if let Some(hash) = level.get(sibling) {
                let side = if position % 2 == 0 { Side::Right } else { Side::Left };
                steps.push(ProofStep {
                    sibling: *hash,
                    side,
                });
            }
            position /= 2;
        }

        Ok(BinaryMerkleProof::new(index, leaf_count, steps))
    }

    /// Proof that `leaf` sits at `index`.
    ///
    /// Fails with [`MerkleError::NotFound`] if the tree holds a different leaf
    /// at that position (or no leaf at all).
    pub fn proof(&self, leaf: &HashValue, index: usize) -> MerkleResult<BinaryMerkleProof> {
        match self.leaf(index) {
            Some(stored) if stored == leaf => self.proof_at(index),
            _ => Err(MerkleError::NotFound { index }),
        }
    }

    /// Verify `proof` for `leaf` against `root` with this tree's hasher.
    pub fn verify(&self, proof: &BinaryMerkleProof, leaf: &HashValue, root: &HashValue) -> bool {
        proof.verify(&self.hasher, leaf, root)
    }
}

/// Hash raw items into leaves (in parallel with the `parallel` feature).
pub fn hash_leaves<H: MerkleHasher, T: AsRef<[u8]> + Sync>(hasher: &H, items: &[T]) -> Vec<HashValue> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(|item| hasher.digest(item.as_ref())).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(|item| hasher.digest(item.as_ref())).collect()
    }
}

fn parent_level<H: MerkleHasher>(hasher: &H, current: &[HashValue]) -> Vec<HashValue> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        current.par_chunks(2).map(|pair| combine(hasher, pair)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        current.chunks(2).map(|pair| combine(hasher, pair)).collect()
    }
}

fn combine<H: MerkleHasher>(hasher: &H, pair: &[HashValue]) -> HashValue {
    match pair {
        [left, right] => hasher.digest_pair(left, right),
        // Unpaired node: promote
        [single] => *single,
        _ => unreachable!("chunks(2) yields one or two nodes"),
    }
}
