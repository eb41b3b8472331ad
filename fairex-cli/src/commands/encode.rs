//! `fairex encode`

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use fairex_core::{seal, MasterKey};
use fairex_types::parse_chunks;

use crate::config::CliConfig;
use crate::PartyArgs;

pub fn handle(
    chunks: &[String],
    key: &str,
    out: Option<&Path>,
    parties: &PartyArgs,
    config: &CliConfig,
) -> Result<()> {
    let exchange = config.resolve(parties)?;
    let plaintext = parse_chunks(chunks).context("Invalid plaintext chunk")?;
    let key = MasterKey::new(key);

    let sealed = seal(&plaintext, &key, &exchange)?;
    let json = serde_json::to_string_pretty(&sealed)?;

    match out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Sealed {} chunk(s)", "✓".green().bold(), sealed.cipher_chunks.len());
            eprintln!("  Merkle root: {}", sealed.commitment.merkle_root.to_string().cyan());
            eprintln!("  Key hash:    {}", sealed.commitment.key_hash.to_string().cyan());
            eprintln!("  Package:     {}", path.display().to_string().cyan());
        }
        None => println!("{}", json),
    }

    Ok(())
}
