//! Parse and dump throughput on synthetic documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use yamlet::{dump, load_str};

/// Deterministic config-shaped YAML of roughly `target_bytes`.
fn generate_yaml(target_bytes: usize, seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = String::new();
    let mut section = 0;

    while out.len() < target_bytes {
        section += 1;
        out.push_str(&format!("section_{}:\n", section));
        let entries = rng.gen_range(3..8);
        for e in 0..entries {
            match rng.gen_range(0..4) {
                0 => {
                    out.push_str(&format!("  key_{}: value_{}\n", e, rng.gen_range(0..1000)));
                }
                1 => {
                    out.push_str(&format!("  num_{}: {}\n", e, rng.gen_range(-500..500)));
                }
                2 => {
                    out.push_str(&format!("  list_{}:\n", e));
                    for i in 0..rng.gen_range(2..5) {
                        out.push_str(&format!("    - item_{}_{}\n", e, i));
                    }
                }
                _ => {
                    out.push_str(&format!(
                        "  flow_{}: {{a: {}, b: [{}, {}]}}\n",
                        e,
                        rng.gen_range(0..100),
                        rng.gen_range(0..100),
                        rng.gen_range(0..100)
                    ));
                }
            }
        }
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for &size in &[4 * 1024, 64 * 1024] {
        let input = generate_yaml(size, 42);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| load_str(black_box(input)).unwrap());
        });
    }
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let input = generate_yaml(16 * 1024, 7);
    let doc = load_str(&input).unwrap();

    let mut group = c.benchmark_group("dump");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("dump_16k", |b| {
        b.iter(|| dump(black_box(&doc)));
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_roundtrip);
criterion_main!(benches);
