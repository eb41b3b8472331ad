//! `fairex demo`: one honest and one disputed exchange on random data

use anyhow::{Context, Result};
use colored::Colorize;
use fairex_core::config::{ENV_BUYER_ID, ENV_SELLER_ID};
use fairex_core::sample::{random_chunks, random_key};
use fairex_core::{
    seal, ContractFactory, DisputeTemplateSet, ExchangeConfig, ExchangeEvent, ExchangeSession,
    IdentityHash, MockContractFactory, Phase,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CliConfig;
use crate::PartyArgs;

pub fn handle(
    chunks: usize,
    size: usize,
    seed: Option<u64>,
    parties: &PartyArgs,
    config: &CliConfig,
) -> Result<()> {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let exchange = demo_config(&mut rng, parties, config)?;

    let plaintext = random_chunks(&mut rng, chunks, size)?;
    let key = random_key(&mut rng, 32);
    let wrong_key = random_key(&mut rng, 32);

    println!("{} Demo exchange (seed {})", "→".cyan().bold(), seed.to_string().cyan());
    println!("  Chunks: {} x {} byte(s)", chunks, plaintext.first().map_or(0, |c| c.len()));
    println!("  Hash:   {}", exchange.hash_algorithm.to_string().cyan());

    let sealed = seal(&plaintext, &key, &exchange)?;
    println!("  Root:   {}", sealed.commitment.merkle_root.to_string().dimmed());
    let factory = MockContractFactory::new(exchange.hash_algorithm);

    // Honest seller
    println!();
    println!("{} Honest seller reveals the committed key", "→".cyan().bold());
    let outcome = sealed.open(&key)?;
    let mut session = ExchangeSession::new(sealed.cipher_chunks.len());
    session.apply_all([
        ExchangeEvent::LockingFunded,
        ExchangeEvent::ExchangeFunded,
        ExchangeEvent::KeyRevealed,
    ])?;
    match ExchangeEvent::refund_for(&outcome) {
        Some(refund) => {
            session.apply(refund)?;
        }
        None => {
            println!("  {} decoded {} chunk(s), no dispute", "✓".green().bold(), outcome.data.len());
            session.apply(ExchangeEvent::DepositUnlocked)?;
        }
    }
    print_phase(session.phase());

    // Seller commits to a key that does not decrypt the data
    println!();
    println!("{} Malicious seller commits to a wrong key", "→".cyan().bold());
    let malicious = DisputeTemplateSet::generate(
        &exchange.buyer,
        &exchange.seller,
        &fairex_core::key_hash(&exchange.hash_algorithm, &wrong_key),
        &sealed.cipher_chunks,
        &sealed.chunk_hashes,
    )?;
    let outcome = sealed.open(&wrong_key)?;
    let mut session = ExchangeSession::new(sealed.cipher_chunks.len());
    session.apply_all([ExchangeEvent::LockingFunded, ExchangeEvent::ExchangeFunded])?;

    match outcome.fault_index() {
        Some(index) => {
            println!("  {} fault located at chunk {}", "✗".red().bold(), index.to_string().red());
            let claim = malicious
                .select(index)
                .with_context(|| format!("No claim template for chunk {}", index))?;
            let verdict = claim.adjudicate(&exchange.hash_algorithm, &wrong_key)?;
            let instance = factory.instantiate(&claim.clone().into())?;
            println!("  Refund contract: {}", instance.address.to_string().dimmed());
            println!("  Claim verdict:   {:?}", verdict);

            session.apply(ExchangeEvent::RefundFunded(index))?;
            session.apply(ExchangeEvent::RefundClaimed(index))?;
        }
        None => {
            // Every chunk decrypted identically under both keys
            println!("  {} wrong key happened to decode every chunk", "!".yellow().bold());
            session.apply(ExchangeEvent::KeyRevealed)?;
            session.apply(ExchangeEvent::DepositUnlocked)?;
        }
    }
    print_phase(session.phase());

    Ok(())
}

/// Roles with no flag, file entry or environment variable get a random identity.
fn demo_config(rng: &mut StdRng, parties: &PartyArgs, config: &CliConfig) -> Result<ExchangeConfig> {
    let mut parties = parties.clone();
    if parties.seller.is_none() && config.seller.is_none() && std::env::var_os(ENV_SELLER_ID).is_none() {
        parties.seller = Some(random_identity(rng).to_hex());
    }
    if parties.buyer.is_none() && config.buyer.is_none() && std::env::var_os(ENV_BUYER_ID).is_none() {
        parties.buyer = Some(random_identity(rng).to_hex());
    }
    config.resolve(&parties)
}

fn random_identity(rng: &mut StdRng) -> IdentityHash {
    let mut bytes = [0u8; 20];
    rng.fill(&mut bytes[..]);
    IdentityHash::new(bytes.to_vec())
}

fn print_phase(phase: Phase) {
    let label = phase.to_string();
    if phase.is_settled() {
        println!("  Final phase: {}", label.green());
    } else {
        println!("  Final phase: {}", label.yellow());
    }
}
