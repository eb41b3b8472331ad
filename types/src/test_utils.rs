//! Fixtures shared by the workspace's tests.

use crate::{Chunk, IdentityHash};

/// 20-byte public-key hash standing in for the seller's wallet.
pub fn seller_identity() -> IdentityHash {
    IdentityHash::new(vec![0xA1; 20])
}

/// 20-byte public-key hash standing in for the buyer's wallet.
pub fn buyer_identity() -> IdentityHash {
    IdentityHash::new(vec![0xB0; 20])
}

/// `count` one-byte chunks `00, 01, 02, ...` (wrapping at 256).
pub fn sequential_chunks(count: usize) -> Vec<Chunk> {
    (0..count)
        .map(|i| Chunk::new(vec![(i % 256) as u8]).expect("one byte is a valid chunk"))
        .collect()
}
