use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graytone_core::{normalize, Preset, RuleSet};

const COMPONENT: &str = include_str!("../../../tests/fixtures/input/Card.tsx");

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_component", |b| {
        b.iter(|| normalize(black_box(COMPONENT)))
    });

    let large = COMPONENT.repeat(200);
    c.bench_function("normalize_large_file", |b| {
        b.iter(|| normalize(black_box(&large)))
    });

    let normalized = normalize(COMPONENT).text;
    c.bench_function("normalize_already_canonical", |b| {
        b.iter(|| RuleSet::preset(Preset::Standard).apply(black_box(&normalized)))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
