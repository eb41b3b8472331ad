//! Encode / decode throughput across exchange sizes and hash functions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fairex_core::sample::{random_chunks, random_key};
use fairex_core::{commit, decode, encode, Chunk, HashAlgorithm};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CHUNK_COUNTS: [usize; 3] = [64, 1024, 16384];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let mut rng = StdRng::seed_from_u64(1);
    let key = random_key(&mut rng, 32);

    for &count in &CHUNK_COUNTS {
        let plaintext = random_chunks(&mut rng, count, 32).unwrap();
        group.throughput(Throughput::Bytes((count * 32) as u64));

        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            group.bench_with_input(
                BenchmarkId::new(algorithm.as_str(), count),
                &plaintext,
                |b, plaintext| b.iter(|| encode(&algorithm, black_box(plaintext), &key).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let mut rng = StdRng::seed_from_u64(2);
    let key = random_key(&mut rng, 32);
    let wrong = random_key(&mut rng, 32);

    for &count in &CHUNK_COUNTS {
        let plaintext = random_chunks(&mut rng, count, 32).unwrap();
        let cipher_chunks: Vec<Chunk> = encode(&HashAlgorithm::Sha256, &plaintext, &key)
            .unwrap()
            .cipher_chunks;
        let tree = commit(HashAlgorithm::Sha256, &plaintext);
        let root = tree.root();
        group.throughput(Throughput::Bytes((count * 32) as u64));

        group.bench_with_input(BenchmarkId::new("verified", count), &cipher_chunks, |b, cipher| {
            b.iter(|| decode(black_box(cipher), &key, &tree, &root).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("fault_located", count), &cipher_chunks, |b, cipher| {
            b.iter(|| decode(black_box(cipher), &wrong, &tree, &root).unwrap())
        });
    }

    group.finish();
}

criterion_group!(codec_benches, bench_encode, bench_decode);
criterion_main!(codec_benches);
