//! The five exchange scenarios driven end to end against the mock factory:
//! optimistic, seller aborts, seller malicious, buyer aborts, buyer malicious.

use fairex_core::{
    cipher, seal, ClaimVerdict, ContractAction, ContractFactory, ContractTemplate,
    DisputeTemplateSet, ExchangeConfig, ExchangeEvent, ExchangeSession, KeyExchangeTemplate,
    LockingTemplate, MasterKey, MockContractFactory, Phase, SealedExchange, Settlement,
};
use fairex_types::test_utils::{buyer_identity, seller_identity, sequential_chunks};

struct Fixture {
    config: ExchangeConfig,
    key: MasterKey,
    sealed: SealedExchange,
    factory: MockContractFactory,
}

impl Fixture {
    fn new() -> Self {
        let config = ExchangeConfig::new(seller_identity(), buyer_identity());
        let key = MasterKey::new("correct horse battery staple");
        let sealed = seal(&sequential_chunks(4), &key, &config).unwrap();
        let factory = MockContractFactory::new(config.hash_algorithm);
        Self {
            config,
            key,
            sealed,
            factory,
        }
    }

    fn locking(&self) -> ContractTemplate {
        LockingTemplate {
            seller: self.config.seller.clone(),
            buyer: self.config.buyer.clone(),
        }
        .into()
    }

    fn key_exchange(&self) -> KeyExchangeTemplate {
        KeyExchangeTemplate {
            seller: self.config.seller.clone(),
            buyer: self.config.buyer.clone(),
            key_hash: self.sealed.commitment.key_hash,
        }
    }

    fn session(&self) -> ExchangeSession {
        ExchangeSession::new(self.sealed.cipher_chunks.len())
    }
}

#[test]
fn test_optimistic_exchange() {
    let fx = Fixture::new();
    let mut session = fx.session();

    let locking = fx.factory.instantiate(&fx.locking()).unwrap();
    assert!(locking.supports(ContractAction::Unlock));
    session.apply(ExchangeEvent::LockingFunded).unwrap();

    let exchange = fx.key_exchange();
    fx.factory.instantiate(&exchange.clone().into()).unwrap();
    assert_eq!(session.apply(ExchangeEvent::ExchangeFunded).unwrap(), Phase::Offered);

    // Seller solves the payment with the real key
    assert!(exchange.solves(&fx.config.hash_algorithm, &fx.key));
    assert_eq!(session.apply(ExchangeEvent::KeyRevealed).unwrap(), Phase::KeyRevealed);

    // Buyer decodes with the revealed key: nothing to dispute
    let outcome = fx.sealed.open(&fx.key).unwrap();
    assert!(outcome.is_verified());
    assert_eq!(ExchangeEvent::refund_for(&outcome), None);

    let phase = session.apply(ExchangeEvent::DepositUnlocked).unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::Completed));
    assert_eq!(fx.factory.deployed_count(), 2);
}

#[test]
fn test_seller_aborts() {
    let fx = Fixture::new();
    let mut session = fx.session();

    let phase = session
        .apply_all([
            ExchangeEvent::LockingFunded,
            ExchangeEvent::ExchangeFunded,
            ExchangeEvent::DepositUnlocked,
        ])
        .unwrap();
    assert_eq!(phase, Phase::Aborting);

    let phase = session.apply(ExchangeEvent::ExchangeReclaimed).unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::SellerAborted));

    // No key can be revealed once the payment is gone
    assert!(session.apply(ExchangeEvent::KeyRevealed).is_err());
}

#[test]
fn test_seller_malicious() {
    let fx = Fixture::new();
    let hasher = fx.config.hash_algorithm;
    let wrong_key = MasterKey::new("not the key");

    // Seller commits the refund contracts to the hash of a key that does not decrypt the data
    let malicious = DisputeTemplateSet::generate(
        &fx.config.buyer,
        &fx.config.seller,
        &cipher::key_hash(&hasher, &wrong_key),
        &fx.sealed.cipher_chunks,
        &fx.sealed.chunk_hashes,
    )
    .unwrap();

    // Buyer decodes with the revealed key and finds the first bad chunk
    let outcome = fx.sealed.open(&wrong_key).unwrap();
    let refund = ExchangeEvent::refund_for(&outcome).unwrap();
    let index = outcome.fault_index().unwrap();

    let claim = malicious.select(index).unwrap().clone();
    assert_eq!(claim.adjudicate(&hasher, &wrong_key).unwrap(), ClaimVerdict::RefundGranted);
    let instance = fx.factory.instantiate(&claim.into()).unwrap();
    assert!(instance.supports(ContractAction::Claim));

    let mut session = fx.session();
    session
        .apply_all([ExchangeEvent::LockingFunded, ExchangeEvent::ExchangeFunded, refund])
        .unwrap();
    assert_eq!(session.phase(), Phase::Disputed(index));

    let phase = session.apply(ExchangeEvent::RefundClaimed(index)).unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::BuyerRefunded(index)));

    // The payment contract still settles on its own; the outcome stands
    let phase = session.apply(ExchangeEvent::KeyRevealed).unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::BuyerRefunded(index)));
}

#[test]
fn test_buyer_aborts() {
    let fx = Fixture::new();
    let mut session = fx.session();

    let phase = session
        .apply_all([ExchangeEvent::LockingFunded, ExchangeEvent::DepositUnlocked])
        .unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::BuyerAborted));
    assert!(session.apply(ExchangeEvent::ExchangeFunded).is_err());
}

#[test]
fn test_buyer_malicious() {
    let fx = Fixture::new();
    let hasher = fx.config.hash_algorithm;

    // Buyer opens a dispute on an honest chunk without paying
    let claim = fx.sealed.templates.select(0).unwrap();
    assert_eq!(claim.adjudicate(&hasher, &fx.key).unwrap(), ClaimVerdict::ChunkIntact);

    let mut session = fx.session();
    session
        .apply_all([ExchangeEvent::LockingFunded, ExchangeEvent::RefundFunded(0)])
        .unwrap();
    assert!(session.apply(ExchangeEvent::RefundClaimed(1)).is_err());

    let phase = session.apply(ExchangeEvent::RefundReverted(0)).unwrap();
    assert_eq!(phase, Phase::Settled(Settlement::RefundReverted(0)));
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_sealed_package_survives_json() {
    let fx = Fixture::new();
    let json = serde_json::to_string(&fx.sealed).unwrap();
    let restored: SealedExchange = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, fx.sealed);
    restored.check_commitment().unwrap();
    assert!(restored.open(&fx.key).unwrap().is_verified());
}
