//! Exchange configuration.
//!
//! Identities and the hash function are explicit values handed to each call;
//! nothing here is process-global.

use fairex_merkle::HashAlgorithm;
use fairex_types::IdentityHash;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const ENV_SELLER_ID: &str = "FAIREX_SELLER_ID";
pub const ENV_BUYER_ID: &str = "FAIREX_BUYER_ID";
pub const ENV_HASH_ALGORITHM: &str = "FAIREX_HASH_ALGORITHM";

/// Supplies the public-key-hash identities of both parties.
pub trait IdentityProvider {
    fn seller(&self) -> IdentityHash;
    fn buyer(&self) -> IdentityHash;
}

/// Configuration for one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Seller public-key hash
    pub seller: IdentityHash,

    /// Buyer public-key hash
    pub buyer: IdentityHash,

    /// Hash function for chunk hashes, key derivation and the commitment tree
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
}

impl ExchangeConfig {
    pub fn new(seller: IdentityHash, buyer: IdentityHash) -> Self {
        Self {
            seller,
            buyer,
            hash_algorithm: HashAlgorithm::default(),
        }
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> CoreResult<Self> {
        let seller = read_identity(ENV_SELLER_ID)?;
        let buyer = read_identity(ENV_BUYER_ID)?;

        let hash_algorithm = match std::env::var(ENV_HASH_ALGORITHM) {
            Ok(value) => value
                .parse()
                .map_err(|e| CoreError::Config(format!("{}: {}", ENV_HASH_ALGORITHM, e)))?,
            Err(_) => HashAlgorithm::default(),
        };

        let config = Self {
            seller,
            buyer,
            hash_algorithm,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.seller.is_empty() {
            return Err(CoreError::Config("seller identity is empty".to_string()));
        }
        if self.buyer.is_empty() {
            return Err(CoreError::Config("buyer identity is empty".to_string()));
        }
        Ok(())
    }
}

impl IdentityProvider for ExchangeConfig {
    fn seller(&self) -> IdentityHash {
        self.seller.clone()
    }

    fn buyer(&self) -> IdentityHash {
        self.buyer.clone()
    }
}

fn read_identity(var: &str) -> CoreResult<IdentityHash> {
    let value = std::env::var(var).map_err(|_| CoreError::Config(format!("{} is not set", var)))?;
    IdentityHash::from_hex(&value).map_err(|e| CoreError::Config(format!("{}: {}", var, e)))
}
