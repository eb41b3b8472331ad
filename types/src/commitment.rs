//! The published commitment.

use fairex_merkle::HashValue;
use serde::{Deserialize, Serialize};

/// Digest of the master key. Independent of chunk index.
pub type KeyHash = HashValue;

/// Digest of one plaintext chunk's bytes.
pub type ChunkHash = HashValue;

/// `(MerkleRoot, KeyHash)` published before any chunk key is revealed.
///
/// Immutable once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub merkle_root: HashValue,
    pub key_hash: KeyHash,
}

impl Commitment {
    pub fn new(merkle_root: HashValue, key_hash: KeyHash) -> Self {
        Self {
            merkle_root,
            key_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairex_merkle::{MerkleHasher, Sha256Hasher};

    #[test]
    fn test_commitment_json_uses_hex_digests() {
        let commitment = Commitment::new(
            Sha256Hasher.digest(b"root"),
            Sha256Hasher.digest(b"secret"),
        );
        let json = serde_json::to_value(commitment).unwrap();
        assert_eq!(
            json["key_hash"],
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
        assert_eq!(json["merkle_root"].as_str().unwrap().len(), 64);
    }
}
