//! `fairex adjudicate`

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use fairex_core::{ClaimVerdict, MasterKey};

use super::load_package;

pub fn handle(package: &Path, index: usize, key: &str) -> Result<()> {
    let sealed = load_package(package)?;
    let template = sealed
        .templates
        .select(index)
        .with_context(|| format!("Package has no claim template for chunk {}", index))?;

    let verdict = template.adjudicate(&sealed.hash_algorithm, &MasterKey::new(key))?;
    match verdict {
        ClaimVerdict::RefundGranted => {
            println!("{} Refund granted: chunk {} is faulty under the revealed key", "✓".green().bold(), index)
        }
        ClaimVerdict::ChunkIntact => {
            println!("{} Claim rejected: chunk {} matches the commitment", "✗".red().bold(), index)
        }
        ClaimVerdict::KeyHashMismatch => {
            println!("{} Claim rejected: key does not match the committed key hash", "✗".red().bold())
        }
    }

    Ok(())
}
