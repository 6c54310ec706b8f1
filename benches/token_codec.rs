use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use cookie_realm::token::{decode, encode_at, TOKEN_LEN};
use cookie_realm::{Principal, XorKey};

fn gen_principals(n: usize, seed: u64) -> Vec<Principal> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Principal::from_bytes(rng.gen::<[u8; 16]>())).collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC00C_1E);
    let key = XorKey::new(rng.gen::<[u8; TOKEN_LEN]>());
    let ns = [1_000usize, 100_000usize];
    let mut group = c.benchmark_group("token_codec");

    for &n in &ns {
        let principals = gen_principals(n, 0xBEEF_CAFE);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("encode", n.to_string()), &principals, |b, ps| {
            b.iter(|| {
                for (i, p) in ps.iter().enumerate() {
                    criterion::black_box(encode_at(p, &key, 1_700_000_000_000 + i as i64));
                }
            });
        });

        let values: Vec<String> = principals
            .iter()
            .enumerate()
            .map(|(i, p)| encode_at(p, &key, 1_700_000_000_000 + i as i64))
            .collect();
        group.bench_with_input(BenchmarkId::new("decode", n.to_string()), &values, |b, vs| {
            b.iter(|| {
                for v in vs {
                    let _ = criterion::black_box(decode(v, &key));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
