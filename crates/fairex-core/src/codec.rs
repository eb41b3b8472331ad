//! Encode and decode with fault localization.
//!
//! ```text
//!  seller                                   buyer
//!  ──────                                   ─────
//!  plaintext ──encode──► cipher chunks ───► decode(cipher, key, tree, root)
//!      │                  + key hash             │
//!      └─hash──► chunk hashes ──► tree ──► root  ├─► Verified
//!                                                └─► FaultLocated(i)
//! ```
//!
//! Every per-chunk step is a pure function of `(master_key, index, chunk)`;
//! the only join point is building the tree over all chunk hashes.

use fairex_merkle::{hash_leaves, BinaryMerkleTree, HashAlgorithm, HashValue, MerkleHasher};
use fairex_types::{Chunk, ChunkHash, ChunkIndex, Commitment, KeyHash, MasterKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cipher::{self, derive_chunk_key};
use crate::config::ExchangeConfig;
use crate::dispute::DisputeTemplateSet;
use crate::error::{CoreError, CoreResult};
use crate::parallel::try_map_indexed;

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedData {
    pub cipher_chunks: Vec<Chunk>,
    pub key_hash: KeyHash,
}

/// Result of decoding: either every chunk matches the commitment, or the
/// first chunk that does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "index", rename_all = "snake_case")]
pub enum Verdict {
    Verified,
    FaultLocated(ChunkIndex),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    /// Decrypted chunks, returned in both outcomes
    pub data: Vec<Chunk>,
    pub verdict: Verdict,
}

impl DecodeOutcome {
    pub fn is_verified(&self) -> bool {
        self.verdict == Verdict::Verified
    }

    pub fn fault_index(&self) -> Option<ChunkIndex> {
        match self.verdict {
            Verdict::Verified => None,
            Verdict::FaultLocated(index) => Some(index),
        }
    }

    /// Fault index with `-1` for "no fault".
    pub fn fault_index_signed(&self) -> i64 {
        self.fault_index().map_or(-1, |index| index as i64)
    }
}

/// Encrypt every chunk under its own derived key and commit to the master key.
pub fn encode<H: MerkleHasher>(
    hasher: &H,
    plaintext: &[Chunk],
    master_key: &MasterKey,
) -> CoreResult<EncodedData> {
    let cipher_chunks = try_map_indexed(plaintext, |index, chunk| {
        let key = derive_chunk_key(hasher, master_key, index);
        cipher::encrypt(chunk, &key)
    })?;
    let key_hash = cipher::key_hash(hasher, master_key);

    debug!(chunks = cipher_chunks.len(), key_hash = %key_hash, "Encoded chunks");

    Ok(EncodedData {
        cipher_chunks,
        key_hash,
    })
}

/// [`encode`] over hex strings, rejecting malformed chunks first.
pub fn encode_hex<H: MerkleHasher, S: AsRef<str>>(
    hasher: &H,
    plaintext: &[S],
    master_key: &MasterKey,
) -> CoreResult<EncodedData> {
    let chunks = fairex_types::parse_chunks(plaintext)?;
    encode(hasher, &chunks, master_key)
}

/// Hash every chunk's bytes.
pub fn chunk_hashes<H: MerkleHasher>(hasher: &H, chunks: &[Chunk]) -> Vec<ChunkHash> {
    hash_leaves(hasher, chunks)
}

/// Commitment tree over the plaintext chunk hashes.
pub fn commit<H: MerkleHasher>(hasher: H, plaintext: &[Chunk]) -> BinaryMerkleTree<H> {
    let leaves = chunk_hashes(&hasher, plaintext);
    BinaryMerkleTree::build(leaves, hasher)
}

/// Decrypt `cipher_chunks` and check them against the published commitment.
///
/// All digests use the hasher `original_tree` was built with.
///
/// # Errors
///
/// - `CommitmentMismatch` if `original_tree` does not have root `public_root`
/// - `LengthMismatch` if the chunk count differs from the committed leaf count
/// - `InvariantViolation` if the roots differ yet every leaf verifies
pub fn decode<H: MerkleHasher>(
    cipher_chunks: &[Chunk],
    master_key: &MasterKey,
    original_tree: &BinaryMerkleTree<H>,
    public_root: &HashValue,
) -> CoreResult<DecodeOutcome> {
    let original_root = original_tree.root();
    if &original_root != public_root {
        return Err(CoreError::CommitmentMismatch {
            expected: *public_root,
            actual: original_root,
        });
    }
    if cipher_chunks.len() != original_tree.leaf_count() {
        return Err(CoreError::LengthMismatch {
            expected: original_tree.leaf_count(),
            got: cipher_chunks.len(),
        });
    }

    let hasher = original_tree.hasher();
    debug!(stage = "init", chunks = cipher_chunks.len(), root = %public_root, "Decoding");

    let data = try_map_indexed(cipher_chunks, |index, chunk| {
        let key = derive_chunk_key(hasher, master_key, index);
        cipher::decrypt(chunk, &key)
    })?;
    let new_leaves = chunk_hashes(hasher, &data);
    let new_root = BinaryMerkleTree::build(new_leaves.clone(), hasher).root();

    debug!(stage = "decrypted", new_root = %new_root, "Rebuilt commitment over decrypted chunks");

    if &new_root == public_root {
        info!(stage = "verified", chunks = data.len(), "All chunks match the commitment");
        return Ok(DecodeOutcome {
            data,
            verdict: Verdict::Verified,
        });
    }

    for (index, leaf) in new_leaves.iter().enumerate() {
        let proof = original_tree.proof_at(index)?;
        if !original_tree.verify(&proof, leaf, public_root) {
            warn!(
                stage = "fault_located",
                index = index,
                leaf = %leaf,
                committed = %proof_leaf(original_tree, index),
                "Decrypted chunk does not match the commitment"
            );
            return Ok(DecodeOutcome {
                data,
                verdict: Verdict::FaultLocated(index),
            });
        }
    }

    error!(
        root = %public_root,
        new_root = %new_root,
        "Roots differ but every leaf verifies"
    );
    Err(CoreError::InvariantViolation(format!(
        "merkle roots {} and {} differ but no faulty chunk found",
        public_root, new_root
    )))
}

fn proof_leaf<H: MerkleHasher>(tree: &BinaryMerkleTree<H>, index: ChunkIndex) -> HashValue {
    tree.leaf(index).copied().unwrap_or(HashValue::ZERO)
}

/// Everything the seller produces before the sale, in one package.
///
/// Serializable; the commitment tree is rebuilt from `chunk_hashes` on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedExchange {
    pub hash_algorithm: HashAlgorithm,
    pub cipher_chunks: Vec<Chunk>,
    pub chunk_hashes: Vec<ChunkHash>,
    pub commitment: Commitment,
    pub templates: DisputeTemplateSet,
}

impl SealedExchange {
    /// Rebuild the commitment tree over the plaintext chunk hashes.
    pub fn tree(&self) -> BinaryMerkleTree<HashAlgorithm> {
        BinaryMerkleTree::build(self.chunk_hashes.clone(), self.hash_algorithm)
    }

    /// Check that the carried chunk hashes produce the published root.
    pub fn check_commitment(&self) -> CoreResult<()> {
        let actual = self.tree().root();
        if actual != self.commitment.merkle_root {
            return Err(CoreError::CommitmentMismatch {
                expected: self.commitment.merkle_root,
                actual,
            });
        }
        Ok(())
    }

    /// Buyer side: decode the cipher chunks under a revealed key.
    pub fn open(&self, master_key: &MasterKey) -> CoreResult<DecodeOutcome> {
        decode(
            &self.cipher_chunks,
            master_key,
            &self.tree(),
            &self.commitment.merkle_root,
        )
    }
}

/// Encode, commit and generate dispute templates in one step.
pub fn seal(
    plaintext: &[Chunk],
    master_key: &MasterKey,
    config: &ExchangeConfig,
) -> CoreResult<SealedExchange> {
    config.validate()?;
    let hasher = config.hash_algorithm;

    let encoded = encode(&hasher, plaintext, master_key)?;
    let tree = commit(hasher, plaintext);
    let chunk_hashes = tree.leaves().to_vec();
    let commitment = Commitment::new(tree.root(), encoded.key_hash);

    let templates = DisputeTemplateSet::generate(
        &config.buyer,
        &config.seller,
        &encoded.key_hash,
        &encoded.cipher_chunks,
        &chunk_hashes,
    )?;

    info!(
        chunks = plaintext.len(),
        merkle_root = %commitment.merkle_root,
        key_hash = %commitment.key_hash,
        hash = %hasher,
        "Sealed exchange"
    );

    Ok(SealedExchange {
        hash_algorithm: hasher,
        cipher_chunks: encoded.cipher_chunks,
        chunk_hashes,
        commitment,
        templates,
    })
}
