//! CLI configuration file

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fairex_core::config::{ENV_BUYER_ID, ENV_HASH_ALGORITHM, ENV_SELLER_ID};
use fairex_core::{ExchangeConfig, IdentityHash};
use fairex_merkle::HashAlgorithm;
use serde::{Deserialize, Serialize};

use crate::PartyArgs;

/// Contents of `~/.fairex/config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Seller public-key hash (hex)
    pub seller: Option<String>,

    /// Buyer public-key hash (hex)
    pub buyer: Option<String>,

    #[serde(default)]
    pub hash_algorithm: Option<HashAlgorithm>,
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".fairex").join("config.toml"))
    }

    /// Load `path`, or the default file if it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Build the exchange configuration. Each value is taken from its flag,
    /// then the file, then its `FAIREX_*` environment variable.
    pub fn resolve(&self, args: &PartyArgs) -> Result<ExchangeConfig> {
        let seller = resolve_identity(
            "seller",
            args.seller.as_deref().or(self.seller.as_deref()),
            ENV_SELLER_ID,
        )?;
        let buyer = resolve_identity(
            "buyer",
            args.buyer.as_deref().or(self.buyer.as_deref()),
            ENV_BUYER_ID,
        )?;

        let hash_algorithm = match args.hash.or(self.hash_algorithm) {
            Some(hash_algorithm) => hash_algorithm,
            None => match std::env::var(ENV_HASH_ALGORITHM) {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("Invalid {}: {}", ENV_HASH_ALGORITHM, value))?,
                Err(_) => HashAlgorithm::default(),
            },
        };

        let config = ExchangeConfig::new(seller, buyer).with_hash_algorithm(hash_algorithm);
        config.validate()?;
        Ok(config)
    }
}

fn resolve_identity(role: &str, value: Option<&str>, var: &str) -> Result<IdentityHash> {
    if let Some(value) = value {
        return parse_identity(role, value);
    }
    match std::env::var(var) {
        Ok(value) => IdentityHash::from_hex(&value)
            .with_context(|| format!("Invalid {} identity in {}: {}", role, var, value)),
        Err(_) => bail!(
            "{} identity is required (--{}, config file or {})",
            role,
            role,
            var
        ),
    }
}

fn parse_identity(role: &str, value: &str) -> Result<IdentityHash> {
    IdentityHash::from_hex(value).with_context(|| format!("Invalid {} identity: {}", role, value))
}
