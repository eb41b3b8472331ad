//! Hash function instances.
//!
//! Every component takes its hasher explicitly. [`HashAlgorithm`] is the
//! configuration-facing form and dispatches to the concrete hashers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hash::{self, prefix, HashValue};
use crate::{MerkleError, HASH_LENGTH};

/// A 256-bit hash function used for chunk hashes, key derivation and tree nodes.
pub trait MerkleHasher: Send + Sync {
    /// Plain digest of `data`.
    fn digest(&self, data: &[u8]) -> HashValue;

    /// Parent node of two children: `digest(INTERNAL || left || right)`.
    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue {
        let mut buf = Vec::with_capacity(prefix::INTERNAL.len() + 2 * HASH_LENGTH);
        buf.extend_from_slice(prefix::INTERNAL);
        buf.extend_from_slice(left.as_bytes());
        buf.extend_from_slice(right.as_bytes());
        self.digest(&buf)
    }
}

impl<H: MerkleHasher + ?Sized> MerkleHasher for &H {
    fn digest(&self, data: &[u8]) -> HashValue {
        (**self).digest(data)
    }

    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue {
        (**self).digest_pair(left, right)
    }
}

/// SHA-256, the protocol default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> HashValue {
        hash::sha256(data)
    }

    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue {
        hash::hash_internal(left, right)
    }
}

/// BLAKE3 in 256-bit output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> HashValue {
        hash::blake3(data)
    }
}

/// Hash algorithm selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl MerkleHasher for HashAlgorithm {
    fn digest(&self, data: &[u8]) -> HashValue {
        match self {
            HashAlgorithm::Sha256 => Sha256Hasher.digest(data),
            HashAlgorithm::Blake3 => Blake3Hasher.digest(data),
        }
    }

    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue {
        match self {
            HashAlgorithm::Sha256 => Sha256Hasher.digest_pair(left, right),
            HashAlgorithm::Blake3 => Blake3Hasher.digest_pair(left, right),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(MerkleError::InvalidInput(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair_matches_sha256_specialization() {
        let left = hash::sha256(b"left");
        let right = hash::sha256(b"right");

        // Sha256Hasher overrides digest_pair; the trait default must agree with it.
        struct Generic;
        impl MerkleHasher for Generic {
            fn digest(&self, data: &[u8]) -> HashValue {
                hash::sha256(data)
            }
        }

        assert_eq!(
            Generic.digest_pair(&left, &right),
            Sha256Hasher.digest_pair(&left, &right)
        );
    }

    #[test]
    fn test_algorithm_dispatch() {
        assert_eq!(HashAlgorithm::Sha256.digest(b"x"), Sha256Hasher.digest(b"x"));
        assert_eq!(HashAlgorithm::Blake3.digest(b"x"), Blake3Hasher.digest(b"x"));
        assert_ne!(HashAlgorithm::Sha256.digest(b"x"), HashAlgorithm::Blake3.digest(b"x"));
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md5".parse::<HashAlgorithm>().is_err());
        assert_eq!(
            serde_json::to_string(&HashAlgorithm::Blake3).unwrap(),
            "\"blake3\""
        );
    }
}
