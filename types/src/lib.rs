// ========== Core Modules ==========
pub mod chunk; // Plaintext / cipher chunks and the hex boundary
pub mod commitment; // Published (MerkleRoot, KeyHash) pair
pub mod identity; // Seller / buyer public-key hashes
pub mod key; // Master key

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use chunk::{parse_chunks, Chunk, ChunkIndex, MAX_CHUNK_BYTES};
pub use commitment::{ChunkHash, Commitment, KeyHash};
pub use identity::IdentityHash;
pub use key::MasterKey;

// Re-export the digest type (single source of truth)
pub use fairex_merkle::HashValue;

// Error types
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Malformed chunk input, rejected at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Chunk must be a (n*2)-hex string, got {len} hex digits")]
    OddHexLength { len: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Chunk is empty")]
    EmptyChunk,

    #[error("Chunk of {len} bytes exceeds the {max}-byte keystream")]
    ChunkTooLong { len: usize, max: usize },
}
