//! Random exchange material for demos, tests and benchmarks.

use fairex_types::{Chunk, MasterKey, ValidationResult, MAX_CHUNK_BYTES};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// `count` chunks of `size` random bytes each. `size` is clamped to `1..=32`.
pub fn random_chunks<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    size: usize,
) -> ValidationResult<Vec<Chunk>> {
    let size = size.clamp(1, MAX_CHUNK_BYTES);
    (0..count)
        .map(|_| {
            let mut bytes = vec![0u8; size];
            rng.fill(bytes.as_mut_slice());
            Chunk::new(bytes)
        })
        .collect()
}

/// Printable key of `len` alphanumeric characters.
pub fn random_key<R: Rng + ?Sized>(rng: &mut R, len: usize) -> MasterKey {
    let key: String = rng.sample_iter(&Alphanumeric).take(len).map(char::from).collect();
    MasterKey::new(key)
}
