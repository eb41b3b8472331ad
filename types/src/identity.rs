//! Participant identities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::ValidationError;

/// Public-key hash of a seller or buyer, as supplied by the identity provider.
///
/// Treated as an opaque byte string; its length depends on the chain
/// (20 bytes for a hash160, 32 for a SHA-256 digest).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct IdentityHash(Vec<u8>);

impl IdentityHash {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ValidationError> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        hex::decode(digits)
            .map(Self)
            .map_err(|e| ValidationError::InvalidHex(e.to_string()))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityHash({})", self.to_hex())
    }
}

impl AsRef<[u8]> for IdentityHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for IdentityHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for IdentityHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        IdentityHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
