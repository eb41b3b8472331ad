//! Dispute claim templates.
//!
//! One [`ClaimTemplate`] per chunk is produced together with the commitment.
//! Each is self-contained: a contract factory can instantiate any one of them
//! without looking at the others. When decoding locates a fault at index `i`,
//! template `i` is the one the buyer takes on-chain.

use fairex_merkle::MerkleHasher;
use fairex_types::{Chunk, ChunkHash, ChunkIndex, IdentityHash, KeyHash, MasterKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cipher::{self, derive_chunk_key};
use crate::error::{CoreError, CoreResult};

/// Refund contract descriptor for one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTemplate {
    pub index: ChunkIndex,
    pub cipher_chunk: Chunk,
    /// Hash of the plaintext chunk the seller committed to
    pub chunk_hash: ChunkHash,
    pub key_hash: KeyHash,
    pub seller: IdentityHash,
    pub buyer: IdentityHash,
}

/// Outcome of evaluating a refund claim with a revealed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimVerdict {
    /// The key matches the commitment and the chunk decrypts to wrong content: buyer is refunded.
    RefundGranted,
    /// The chunk decrypts to the committed content: the seller may revert the claim.
    ChunkIntact,
    /// The key does not hash to the committed key hash: the claim cannot be made with it.
    KeyHashMismatch,
}

impl ClaimTemplate {
    /// Evaluate the refund contract's claim predicate off-chain.
    ///
    /// The contract accepts a claim when `H(key) == key_hash` and the chunk
    /// decrypted under `H(key || index)` hashes to something other than
    /// `chunk_hash`.
    pub fn adjudicate<H: MerkleHasher + ?Sized>(
        &self,
        hasher: &H,
        revealed_key: &MasterKey,
    ) -> CoreResult<ClaimVerdict> {
        if cipher::key_hash(hasher, revealed_key) != self.key_hash {
            return Ok(ClaimVerdict::KeyHashMismatch);
        }

        let chunk_key = derive_chunk_key(hasher, revealed_key, self.index);
        let plaintext = cipher::decrypt(&self.cipher_chunk, &chunk_key)?;
        let verdict = if hasher.digest(plaintext.as_bytes()) == self.chunk_hash {
            ClaimVerdict::ChunkIntact
        } else {
            ClaimVerdict::RefundGranted
        };

        debug!(index = self.index, verdict = ?verdict, "Adjudicated claim");
        Ok(verdict)
    }
}

/// The ordered per-chunk claim templates of one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeTemplateSet {
    templates: Vec<ClaimTemplate>,
}

impl DisputeTemplateSet {
    /// One template per chunk. `cipher_chunks` and `chunk_hashes` must align.
    pub fn generate(
        buyer: &IdentityHash,
        seller: &IdentityHash,
        key_hash: &KeyHash,
        cipher_chunks: &[Chunk],
        chunk_hashes: &[ChunkHash],
    ) -> CoreResult<Self> {
        if cipher_chunks.len() != chunk_hashes.len() {
            return Err(CoreError::LengthMismatch {
                expected: cipher_chunks.len(),
                got: chunk_hashes.len(),
            });
        }

        let templates = cipher_chunks
            .iter()
            .zip(chunk_hashes)
            .enumerate()
            .map(|(index, (cipher_chunk, chunk_hash))| ClaimTemplate {
                index,
                cipher_chunk: cipher_chunk.clone(),
                chunk_hash: *chunk_hash,
                key_hash: *key_hash,
                seller: seller.clone(),
                buyer: buyer.clone(),
            })
            .collect();

        Ok(Self { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: ChunkIndex) -> Option<&ClaimTemplate> {
        self.templates.get(index)
    }

    /// Template for a located fault.
    pub fn select(&self, fault_index: ChunkIndex) -> Option<&ClaimTemplate> {
        self.get(fault_index)
    }

    /// Keep the template for `fault_index`, discarding the rest.
    pub fn into_selected(self, fault_index: ChunkIndex) -> Option<ClaimTemplate> {
        self.templates.into_iter().nth(fault_index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClaimTemplate> {
        self.templates.iter()
    }

    pub fn as_slice(&self) -> &[ClaimTemplate] {
        &self.templates
    }
}

impl IntoIterator for DisputeTemplateSet {
    type Item = ClaimTemplate;
    type IntoIter = std::vec::IntoIter<ClaimTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.into_iter()
    }
}

impl<'a> IntoIterator for &'a DisputeTemplateSet {
    type Item = &'a ClaimTemplate;
    type IntoIter = std::slice::Iter<'a, ClaimTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

/// Seller deposit contract: `unlock` (seller) or `use_for_refund` (both).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingTemplate {
    pub seller: IdentityHash,
    pub buyer: IdentityHash,
}

/// Buyer payment contract: `solve(key)` (seller) or `reclaim` (buyer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExchangeTemplate {
    pub seller: IdentityHash,
    pub buyer: IdentityHash,
    pub key_hash: KeyHash,
}

impl KeyExchangeTemplate {
    /// Whether `key` unlocks the payment, i.e. `H(key) == key_hash`.
    pub fn solves<H: MerkleHasher + ?Sized>(&self, hasher: &H, key: &MasterKey) -> bool {
        cipher::key_hash(hasher, key) == self.key_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{chunk_hashes, encode};
    use fairex_merkle::Sha256Hasher;
    use fairex_types::parse_chunks;
    use fairex_types::test_utils::{buyer_identity, seller_identity};

    fn honest_set(key: &MasterKey) -> DisputeTemplateSet {
        let plaintext = parse_chunks(&["AA", "BB", "CC", "DD"]).unwrap();
        let encoded = encode(&Sha256Hasher, &plaintext, key).unwrap();
        DisputeTemplateSet::generate(
            &buyer_identity(),
            &seller_identity(),
            &encoded.key_hash,
            &encoded.cipher_chunks,
            &chunk_hashes(&Sha256Hasher, &plaintext),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_one_template_per_chunk() {
        let key = MasterKey::new("secret");
        let set = honest_set(&key);
        assert_eq!(set.len(), 4);
        for (i, template) in set.iter().enumerate() {
            assert_eq!(template.index, i);
            assert_eq!(template.seller, seller_identity());
            assert_eq!(template.buyer, buyer_identity());
            assert_eq!(template.key_hash, cipher::key_hash(&Sha256Hasher, &key));
        }
        assert_eq!(set.get(2).unwrap().cipher_chunk.to_hex(), "F9");
        assert_eq!(
            set.get(0).unwrap().chunk_hash,
            Sha256Hasher.digest(&[0xAA])
        );
    }

    #[test]
    fn test_generate_length_mismatch() {
        let chunks = parse_chunks(&["AA", "BB"]).unwrap();
        let hashes = chunk_hashes(&Sha256Hasher, &chunks[..1]);
        let err = DisputeTemplateSet::generate(
            &buyer_identity(),
            &seller_identity(),
            &Sha256Hasher.digest(b"k"),
            &chunks,
            &hashes,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn test_honest_templates_are_not_claimable() {
        let key = MasterKey::new("secret");
        let set = honest_set(&key);
        for template in &set {
            assert_eq!(
                template.adjudicate(&Sha256Hasher, &key).unwrap(),
                ClaimVerdict::ChunkIntact
            );
            assert_eq!(
                template
                    .adjudicate(&Sha256Hasher, &MasterKey::new("wrong"))
                    .unwrap(),
                ClaimVerdict::KeyHashMismatch
            );
        }
    }

    #[test]
    fn test_templates_committed_to_wrong_key_are_claimable() {
        // The seller committed to the hash of a key that does not decrypt the data.
        let plaintext = parse_chunks(&["AA", "BB"]).unwrap();
        let good = MasterKey::new("secret");
        let bad = MasterKey::new("wrong");
        let encoded = encode(&Sha256Hasher, &plaintext, &good).unwrap();
        let set = DisputeTemplateSet::generate(
            &buyer_identity(),
            &seller_identity(),
            &cipher::key_hash(&Sha256Hasher, &bad),
            &encoded.cipher_chunks,
            &chunk_hashes(&Sha256Hasher, &plaintext),
        )
        .unwrap();

        let claim = set.select(0).unwrap();
        assert_eq!(
            claim.adjudicate(&Sha256Hasher, &bad).unwrap(),
            ClaimVerdict::RefundGranted
        );
    }

    #[test]
    fn test_into_selected_keeps_one() {
        let set = honest_set(&MasterKey::new("secret"));
        let kept = set.clone().into_selected(3).unwrap();
        assert_eq!(kept.index, 3);
        assert!(set.into_selected(4).is_none());
    }

    #[test]
    fn test_key_exchange_solves() {
        let key = MasterKey::new("secret");
        let template = KeyExchangeTemplate {
            seller: seller_identity(),
            buyer: buyer_identity(),
            key_hash: cipher::key_hash(&Sha256Hasher, &key),
        };
        assert!(template.solves(&Sha256Hasher, &key));
        assert!(!template.solves(&Sha256Hasher, &MasterKey::new("other")));
    }
}
