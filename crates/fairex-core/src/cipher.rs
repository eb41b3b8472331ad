//! Per-chunk keyed XOR cipher.
//!
//! Chunk `i` is masked with the leading bytes of `H(master_key || decimal(i))`.
//! Encryption and decryption are the same operation. This is a placeholder
//! keystream construction, not a secure cipher.

use fairex_merkle::{HashValue, MerkleHasher, HASH_LENGTH};
use fairex_types::{Chunk, ChunkIndex, KeyHash, MasterKey, ValidationError};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Keystream material for one chunk index.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChunkKey([u8; HASH_LENGTH]);

impl ChunkKey {
    pub fn from_digest(digest: HashValue) -> Self {
        Self(*digest.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Keystream length in bits.
    pub fn bit_len(&self) -> usize {
        HASH_LENGTH * 8
    }
}

impl fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChunkKey(<redacted>)")
    }
}

/// `H(master_key || index.to_string())`. Deterministic and pure.
pub fn derive_chunk_key<H: MerkleHasher + ?Sized>(
    hasher: &H,
    master_key: &MasterKey,
    index: ChunkIndex,
) -> ChunkKey {
    let suffix = index.to_string();
    let mut material = Vec::with_capacity(master_key.len() + suffix.len());
    material.extend_from_slice(master_key.as_bytes());
    material.extend_from_slice(suffix.as_bytes());
    let key = ChunkKey::from_digest(hasher.digest(&material));
    material.zeroize();
    key
}

/// `H(master_key)`, the key commitment.
pub fn key_hash<H: MerkleHasher + ?Sized>(hasher: &H, master_key: &MasterKey) -> KeyHash {
    hasher.digest(master_key.as_bytes())
}

/// XOR `input` against the leading `input.len()` bytes of `key`.
///
/// Fails if the input is longer than the keystream.
pub fn crypt(input: &[u8], key: &ChunkKey) -> Result<Vec<u8>, ValidationError> {
    if input.len() > HASH_LENGTH {
        return Err(ValidationError::ChunkTooLong {
            len: input.len(),
            max: HASH_LENGTH,
        });
    }
    Ok(input.iter().zip(key.as_bytes()).map(|(b, k)| b ^ k).collect())
}

/// Hex-level form of [`crypt`]: validates the hex string first.
pub fn crypt_hex(input: &str, key: &ChunkKey) -> Result<String, ValidationError> {
    let chunk = Chunk::from_hex(input)?;
    crypt_chunk(&chunk, key).map(|c| c.to_hex())
}

pub fn crypt_chunk(chunk: &Chunk, key: &ChunkKey) -> Result<Chunk, ValidationError> {
    Chunk::new(crypt(chunk.as_bytes(), key)?)
}

pub fn encrypt(plaintext: &Chunk, key: &ChunkKey) -> Result<Chunk, ValidationError> {
    crypt_chunk(plaintext, key)
}

pub fn decrypt(cipher: &Chunk, key: &ChunkKey) -> Result<Chunk, ValidationError> {
    crypt_chunk(cipher, key)
}
