//! Data chunks and their hex representation.
//!
//! A chunk is 1 to [`MAX_CHUNK_BYTES`] bytes. The limit comes from the cipher:
//! each chunk is masked with one 256-bit digest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Upper bound on chunk size: one 256-bit keystream digest per chunk.
pub const MAX_CHUNK_BYTES: usize = 32;

/// Position of a chunk in the exchanged data. Dense and 0-based.
pub type ChunkIndex = usize;

/// One plaintext or cipher chunk.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Chunk(Vec<u8>);

impl Chunk {
    /// Wrap raw bytes, enforcing the 1..=32 byte bound.
    pub fn new(bytes: Vec<u8>) -> Result<Self, ValidationError> {
        check_len(bytes.len())?;
        Ok(Self(bytes))
    }

    /// Parse an even-length hex string (either case, optional `0x`).
    pub fn from_hex(hex_str: &str) -> Result<Self, ValidationError> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        if digits.is_empty() {
            return Err(ValidationError::EmptyChunk);
        }
        if digits.len() % 2 != 0 {
            return Err(ValidationError::OddHexLength { len: digits.len() });
        }
        let bytes =
            hex::decode(digits).map_err(|e| ValidationError::InvalidHex(e.to_string()))?;
        Self::new(bytes)
    }

    /// Upper-case hex, as chunks are published.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bit length of the chunk.
    pub fn bit_len(&self) -> usize {
        self.0.len() * 8
    }
}

/// Parse a list of hex chunks, stopping at the first invalid one.
pub fn parse_chunks<S: AsRef<str>>(items: &[S]) -> Result<Vec<Chunk>, ValidationError> {
    items.iter().map(|s| Chunk::from_hex(s.as_ref())).collect()
}

fn check_len(len: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::EmptyChunk);
    }
    if len > MAX_CHUNK_BYTES {
        return Err(ValidationError::ChunkTooLong {
            len,
            max: MAX_CHUNK_BYTES,
        });
    }
    Ok(())
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({})", self.to_hex())
    }
}

impl FromStr for Chunk {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Chunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Chunk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Chunk::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
