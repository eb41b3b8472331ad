//! `fairex templates`

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;

use super::{load_package, print_template};

pub fn handle(package: &Path, index: Option<usize>) -> Result<()> {
    let sealed = load_package(package)?;

    match index {
        Some(index) => match sealed.templates.select(index) {
            Some(template) => print_template(template),
            None => bail!(
                "Chunk index {} out of range (package has {} chunks)",
                index,
                sealed.templates.len()
            ),
        },
        None => {
            println!("{} {} claim template(s)", "→".cyan().bold(), sealed.templates.len());
            for template in &sealed.templates {
                print_template(template);
            }
        }
    }

    Ok(())
}
