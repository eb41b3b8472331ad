//! # fairex-core
//!
//! Dispute core of a fair data-sale exchange.
//!
//! A seller splits data into chunks of at most 32 bytes, encrypts chunk `i`
//! under `H(key || i)` and publishes a commitment `(merkle_root, key_hash)`
//! over the plaintext chunk hashes. Once the key is revealed the buyer
//! decodes; if the result does not match the commitment, the decoder names
//! the first faulty chunk and the matching claim template carries the
//! dispute on-chain.
//!
//! ```rust,ignore
//! use fairex_core::{seal, ExchangeConfig};
//!
//! let sealed = seal(&chunks, &key, &config)?;
//! let outcome = sealed.open(&revealed_key)?;
//! if let Some(index) = outcome.fault_index() {
//!     let claim = sealed.templates.select(index);
//! }
//! ```

pub mod cipher;
pub mod codec;
pub mod config;
pub mod contract;
pub mod dispute;
pub mod error;
pub mod exchange;
pub mod parallel;
pub mod sample;

pub use cipher::{derive_chunk_key, key_hash, ChunkKey};
pub use codec::{
    chunk_hashes, commit, decode, encode, encode_hex, seal, DecodeOutcome, EncodedData,
    SealedExchange, Verdict,
};
pub use config::{ExchangeConfig, IdentityProvider};
pub use contract::{
    ContractAction, ContractFactory, ContractInstance, ContractTemplate, MockContractFactory,
};
pub use dispute::{
    ClaimTemplate, ClaimVerdict, DisputeTemplateSet, KeyExchangeTemplate, LockingTemplate,
};
pub use error::{CoreError, CoreResult};
pub use exchange::{ExchangeEvent, ExchangeSession, Phase, Settlement};

// Re-export the building blocks callers need alongside the core
pub use fairex_merkle::{BinaryMerkleTree, HashAlgorithm, HashValue, MerkleHasher};
pub use fairex_types::{Chunk, ChunkIndex, Commitment, IdentityHash, MasterKey};
