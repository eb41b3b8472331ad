//! Command handlers

pub mod adjudicate;
pub mod decode;
pub mod demo;
pub mod encode;
pub mod templates;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use fairex_core::{ClaimTemplate, SealedExchange};

/// Read a sealed package and check that its chunk hashes match its commitment.
pub(crate) fn load_package(path: &Path) -> Result<SealedExchange> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read package {}", path.display()))?;
    let sealed: SealedExchange = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse package {}", path.display()))?;
    sealed
        .check_commitment()
        .with_context(|| format!("Package {} is inconsistent", path.display()))?;
    Ok(sealed)
}

pub(crate) fn print_template(template: &ClaimTemplate) {
    println!("  {} #{}", "Claim".bold(), template.index.to_string().cyan());
    println!("    Cipher chunk: {}", template.cipher_chunk.to_hex().cyan());
    println!("    Chunk hash:   {}", template.chunk_hash.to_string().dimmed());
    println!("    Key hash:     {}", template.key_hash.to_string().dimmed());
    println!("    Seller:       {}", template.seller.to_hex());
    println!("    Buyer:        {}", template.buyer.to_hex());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::PartyArgs;
    use fairex_core::{MasterKey, Verdict};
    use fairex_merkle::HashAlgorithm;

    fn parties() -> PartyArgs {
        PartyArgs {
            seller: Some("a1".repeat(20)),
            buyer: Some("b0".repeat(20)),
            hash: Some(HashAlgorithm::Blake3),
        }
    }

    fn chunks() -> Vec<String> {
        vec!["00".to_string(), "01FF".to_string(), "02".to_string()]
    }

    #[test]
    fn test_package_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        encode::handle(&chunks(), "secret", Some(path.as_path()), &parties(), &CliConfig::default()).unwrap();

        let sealed = load_package(&path).unwrap();
        assert_eq!(sealed.hash_algorithm, HashAlgorithm::Blake3);
        assert_eq!(sealed.cipher_chunks.len(), 3);
        assert_eq!(sealed.templates.len(), 3);
        assert_eq!(sealed.templates.as_slice()[1].seller.as_bytes(), &[0xa1; 20]);

        let outcome = sealed.open(&MasterKey::new("secret")).unwrap();
        assert_eq!(outcome.verdict, Verdict::Verified);
        let data: Vec<String> = outcome.data.iter().map(|c| c.to_hex()).collect();
        assert_eq!(data, chunks());

        decode::handle(&path, "secret").unwrap();
        decode::handle(&path, "wrong").unwrap();
        templates::handle(&path, Some(2)).unwrap();
        assert!(templates::handle(&path, Some(3)).is_err());
        adjudicate::handle(&path, 0, "secret").unwrap();
    }

    #[test]
    fn test_inconsistent_package_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        encode::handle(&chunks(), "secret", Some(path.as_path()), &parties(), &CliConfig::default()).unwrap();

        let mut sealed = load_package(&path).unwrap();
        sealed.chunk_hashes[0] = sealed.commitment.key_hash;
        std::fs::write(&path, serde_json::to_string(&sealed).unwrap()).unwrap();

        let err = load_package(&path).unwrap_err();
        assert!(err.to_string().contains("inconsistent"), "{}", err);
    }
}
