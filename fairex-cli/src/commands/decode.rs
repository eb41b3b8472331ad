//! `fairex decode`

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use fairex_core::{MasterKey, Verdict};

use super::{load_package, print_template};

pub fn handle(package: &Path, key: &str) -> Result<()> {
    let sealed = load_package(package)?;
    let outcome = sealed.open(&MasterKey::new(key))?;

    match outcome.verdict {
        Verdict::Verified => {
            println!("{} All {} chunk(s) match the commitment", "✓".green().bold(), outcome.data.len());
            let data: Vec<String> = outcome.data.iter().map(|c| c.to_hex()).collect();
            println!("  Data: {}", data.join(",").cyan());
        }
        Verdict::FaultLocated(index) => {
            println!("{} Chunk {} does not match the commitment", "✗".red().bold(), index.to_string().red());
            let template = sealed
                .templates
                .select(index)
                .with_context(|| format!("Package has no claim template for chunk {}", index))?;
            println!("{} Claim template for the dispute:", "→".cyan().bold());
            print_template(template);
        }
    }

    Ok(())
}
