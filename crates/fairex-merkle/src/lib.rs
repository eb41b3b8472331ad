//! # fairex-merkle
//!
//! Commitment engine for the fairex data-sale protocol.
//!
//! - [`binary::BinaryMerkleTree`]: binary Merkle tree over the ordered list of
//!   chunk hashes a seller commits to; positional inclusion proofs let a buyer
//!   point at the exact chunk that does not match the published root.
//! - [`hasher::MerkleHasher`]: the hash function instance. SHA-256 is the
//!   protocol default, BLAKE3 can be selected through [`HashAlgorithm`].
//!
//! Internal nodes are domain separated (`0x01 || left || right`); leaves are
//! used as given.

pub mod binary;
pub mod error;
pub mod hash;
pub mod hasher;

pub use binary::{hash_leaves, BinaryMerkleProof, BinaryMerkleTree, ProofStep, Side};
pub use error::{MerkleError, MerkleResult};
pub use hash::HashValue;
pub use hasher::{Blake3Hasher, HashAlgorithm, MerkleHasher, Sha256Hasher};

/// The length of hash digests used in merkle trees (32 bytes = 256 bits)
pub const HASH_LENGTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_tree_basic() {
        let leaves: Vec<Vec<u8>> = vec![
            b"leaf0".to_vec(),
            b"leaf1".to_vec(),
            b"leaf2".to_vec(),
            b"leaf3".to_vec(),
        ];

        let tree = BinaryMerkleTree::from_data(&leaves, Sha256Hasher);
        let root = tree.root();

        // Verify all proofs
        for (i, leaf) in leaves.iter().enumerate() {
            let leaf_hash = Sha256Hasher.digest(leaf);
            let proof = tree.proof(&leaf_hash, i).unwrap();
            assert!(proof.verify_inclusion(tree.hasher(), &root, &leaf_hash).is_ok());
        }
    }
}
