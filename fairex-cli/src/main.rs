//! fairex - seal, open and dispute data exchanges from the command line

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fairex_merkle::HashAlgorithm;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "fairex")]
#[command(about = "Fair data exchange: commitment, decoding and dispute templates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: ~/.fairex/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Identity and hash overrides shared by commands that seal packages.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PartyArgs {
    /// Seller public-key hash (hex)
    #[arg(long)]
    pub seller: Option<String>,

    /// Buyer public-key hash (hex)
    #[arg(long)]
    pub buyer: Option<String>,

    /// Hash function: sha256 or blake3
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt chunks and write the sealed package (commitment + claim templates)
    Encode {
        /// Plaintext chunks as hex, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        chunks: Vec<String>,

        /// Master key
        #[arg(short, long)]
        key: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        parties: PartyArgs,
    },

    /// Decode a sealed package with a revealed key
    Decode {
        /// Sealed package file
        #[arg(short, long)]
        package: PathBuf,

        /// Revealed master key
        #[arg(short, long)]
        key: String,
    },

    /// List the claim templates of a sealed package
    Templates {
        /// Sealed package file
        #[arg(short, long)]
        package: PathBuf,

        /// Only show the template for this chunk
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Evaluate a refund claim on one chunk with a revealed key
    Adjudicate {
        /// Sealed package file
        #[arg(short, long)]
        package: PathBuf,

        /// Chunk index of the claim
        #[arg(short, long)]
        index: usize,

        /// Revealed master key
        #[arg(short, long)]
        key: String,
    },

    /// Run honest and wrong-key exchanges on random data
    Demo {
        /// Number of chunks
        #[arg(short = 'n', long, default_value = "8")]
        chunks: usize,

        /// Bytes per chunk (1-32)
        #[arg(short, long, default_value = "4")]
        size: usize,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        parties: PartyArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode {
            chunks,
            key,
            out,
            parties,
        } => commands::encode::handle(&chunks, &key, out.as_deref(), &parties, &config),
        Commands::Decode { package, key } => commands::decode::handle(&package, &key),
        Commands::Templates { package, index } => commands::templates::handle(&package, index),
        Commands::Adjudicate {
            package,
            index,
            key,
        } => commands::adjudicate::handle(&package, index, &key),
        Commands::Demo {
            chunks,
            size,
            seed,
            parties,
        } => commands::demo::handle(chunks, size, seed, &parties, &config),
    }
}
