//! Contract-factory seam.
//!
//! The core describes contracts as pure templates; turning a template into
//! an on-chain contract is the job of a [`ContractFactory`] supplied by the
//! orchestration layer. [`MockContractFactory`] stands in for a real chain
//! in tests and the CLI demo.

use std::collections::HashMap;
use std::fmt;

use fairex_merkle::{HashAlgorithm, HashValue, MerkleHasher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispute::{ClaimTemplate, KeyExchangeTemplate, LockingTemplate};
use crate::error::{CoreError, CoreResult};

/// Domain tag mixed into mock contract addresses.
const ADDRESS_DOMAIN: &[u8] = b"fairex/contract/v1";

/// Any of the three contract kinds of one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractTemplate {
    Locking(LockingTemplate),
    KeyExchange(KeyExchangeTemplate),
    Claim(ClaimTemplate),
}

impl ContractTemplate {
    pub fn kind(&self) -> &'static str {
        match self {
            ContractTemplate::Locking(_) => "locking",
            ContractTemplate::KeyExchange(_) => "key_exchange",
            ContractTemplate::Claim(_) => "claim",
        }
    }

    /// Spending paths the contract exposes.
    pub fn actions(&self) -> Vec<ContractAction> {
        match self {
            ContractTemplate::Locking(_) => vec![ContractAction::Unlock, ContractAction::UseForRefund],
            ContractTemplate::KeyExchange(_) => vec![ContractAction::Solve, ContractAction::Reclaim],
            ContractTemplate::Claim(_) => vec![ContractAction::Claim, ContractAction::Revert],
        }
    }

    /// Digest over the canonical JSON encoding of the template.
    pub fn digest<H: MerkleHasher + ?Sized>(&self, hasher: &H) -> CoreResult<HashValue> {
        let mut material = ADDRESS_DOMAIN.to_vec();
        material.extend_from_slice(&serde_json::to_vec(self)?);
        Ok(hasher.digest(&material))
    }
}

impl From<LockingTemplate> for ContractTemplate {
    fn from(template: LockingTemplate) -> Self {
        ContractTemplate::Locking(template)
    }
}

impl From<KeyExchangeTemplate> for ContractTemplate {
    fn from(template: KeyExchangeTemplate) -> Self {
        ContractTemplate::KeyExchange(template)
    }
}

impl From<ClaimTemplate> for ContractTemplate {
    fn from(template: ClaimTemplate) -> Self {
        ContractTemplate::Claim(template)
    }
}

/// A callable spending path of an instantiated contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractAction {
    /// Seller takes the deposit back
    Unlock,
    /// Deposit funds one refund contract
    UseForRefund,
    /// Seller reveals the key and collects the payment
    Solve,
    /// Buyer takes the payment back
    Reclaim,
    /// Buyer proves a faulty chunk with the revealed key
    Claim,
    /// Seller takes the refund deposit back
    Revert,
}

impl ContractAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractAction::Unlock => "unlock",
            ContractAction::UseForRefund => "use_for_refund",
            ContractAction::Solve => "solve",
            ContractAction::Reclaim => "reclaim",
            ContractAction::Claim => "claim",
            ContractAction::Revert => "revert",
        }
    }
}

impl fmt::Display for ContractAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instantiated contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInstance {
    pub address: HashValue,
    pub actions: Vec<ContractAction>,
}

impl ContractInstance {
    pub fn supports(&self, action: ContractAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Turns templates into callable contracts.
pub trait ContractFactory: Send + Sync {
    fn instantiate(&self, template: &ContractTemplate) -> CoreResult<ContractInstance>;
}

/// In-memory factory with deterministic addresses.
///
/// The address of a template is its [`ContractTemplate::digest`], so the
/// same template always lands at the same address. Instantiating it again
/// returns the existing instance.
#[derive(Debug, Default)]
pub struct MockContractFactory {
    hasher: HashAlgorithm,
    deployed: RwLock<HashMap<HashValue, ContractTemplate>>,
}

impl MockContractFactory {
    pub fn new(hasher: HashAlgorithm) -> Self {
        Self {
            hasher,
            deployed: RwLock::new(HashMap::new()),
        }
    }

    pub fn deployed_count(&self) -> usize {
        self.deployed.read().len()
    }

    /// Template deployed at `address`, if any.
    pub fn template_at(&self, address: &HashValue) -> Option<ContractTemplate> {
        self.deployed.read().get(address).cloned()
    }
}

impl ContractFactory for MockContractFactory {
    fn instantiate(&self, template: &ContractTemplate) -> CoreResult<ContractInstance> {
        let address = template.digest(&self.hasher)?;

        let mut deployed = self.deployed.write();
        match deployed.get(&address) {
            Some(existing) if existing != template => {
                return Err(CoreError::Factory(format!(
                    "address {} already holds a different {} contract",
                    address,
                    existing.kind()
                )));
            }
            Some(_) => {
                debug!(address = %address, kind = template.kind(), "Contract already deployed");
            }
            None => {
                deployed.insert(address, template.clone());
                info!(address = %address, kind = template.kind(), "Deployed mock contract");
            }
        }

        Ok(ContractInstance {
            address,
            actions: template.actions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairex_merkle::Sha256Hasher;
    use fairex_types::test_utils::{buyer_identity, seller_identity};

    fn locking() -> ContractTemplate {
        LockingTemplate {
            seller: seller_identity(),
            buyer: buyer_identity(),
        }
        .into()
    }

    #[test]
    fn test_actions_per_kind() {
        let factory = MockContractFactory::default();
        let instance = factory.instantiate(&locking()).unwrap();
        assert!(instance.supports(ContractAction::Unlock));
        assert!(instance.supports(ContractAction::UseForRefund));
        assert!(!instance.supports(ContractAction::Claim));

        let exchange: ContractTemplate = KeyExchangeTemplate {
            seller: seller_identity(),
            buyer: buyer_identity(),
            key_hash: Sha256Hasher.digest(b"secret"),
        }
        .into();
        assert_eq!(exchange.actions(), vec![ContractAction::Solve, ContractAction::Reclaim]);
        assert_eq!(exchange.kind(), "key_exchange");
    }

    #[test]
    fn test_addresses_are_deterministic_and_distinct() {
        let factory = MockContractFactory::new(HashAlgorithm::Sha256);
        let a = factory.instantiate(&locking()).unwrap();
        let again = factory.instantiate(&locking()).unwrap();
        assert_eq!(a, again);
        assert_eq!(factory.deployed_count(), 1);

        // Swapped parties are a different contract
        let swapped: ContractTemplate = LockingTemplate {
            seller: buyer_identity(),
            buyer: seller_identity(),
        }
        .into();
        let b = factory.instantiate(&swapped).unwrap();
        assert_ne!(a.address, b.address);
        assert_eq!(factory.template_at(&b.address), Some(swapped));
    }

    #[test]
    fn test_address_depends_on_hasher() {
        let sha = MockContractFactory::new(HashAlgorithm::Sha256);
        let blake = MockContractFactory::new(HashAlgorithm::Blake3);
        assert_ne!(
            sha.instantiate(&locking()).unwrap().address,
            blake.instantiate(&locking()).unwrap().address
        );
    }

    #[test]
    fn test_template_json_is_tagged() {
        let json = serde_json::to_value(locking()).unwrap();
        assert_eq!(json["kind"], "locking");
        assert_eq!(ContractAction::UseForRefund.to_string(), "use_for_refund");
    }
}
