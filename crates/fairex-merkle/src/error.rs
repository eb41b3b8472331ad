//! Error types for merkle tree operations.

use thiserror::Error;

/// Errors raised by the commitment tree and hash utilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    /// The requested leaf is not the one stored at that position.
    #[error("Leaf not found at index {index}")]
    NotFound { index: usize },

    #[error("Leaf index {index} out of range (tree has {leaf_count} leaves)")]
    IndexOutOfRange { index: usize, leaf_count: usize },
}

pub type MerkleResult<T> = Result<T, MerkleError>;
