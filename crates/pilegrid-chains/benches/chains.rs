use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pilegrid_chains::{complete_chains, find_chains, ChainSearchParams};
use pilegrid_core::{characteristic_spacing, Point};
use rand::prelude::*;

/// Jittered rows of piles with ~10% dropouts, roughly a large aerial tile.
fn synthetic_field(rows: usize, cols: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pts = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            if rng.gen_bool(0.1) {
                continue;
            }
            pts.push(Point::new(
                c as f64 * 40.0 + rng.gen_range(-2.0..2.0),
                r as f64 * 120.0 + rng.gen_range(-2.0..2.0),
            ));
        }
    }
    pts
}

fn bench_chains(c: &mut Criterion) {
    let pts = synthetic_field(40, 80, 11);
    let spacing = characteristic_spacing(&pts).unwrap_or(40.0);
    let params = ChainSearchParams::with_radius(2.0 * spacing);

    c.bench_function("find_chains_3200", |b| {
        b.iter(|| find_chains(black_box(&pts), black_box(&params)))
    });

    let chains = find_chains(&pts, &params);
    c.bench_function("complete_chains_3200", |b| {
        b.iter(|| complete_chains(black_box(&pts), black_box(&chains), spacing, 3.0))
    });
}

criterion_group!(benches, bench_chains);
criterion_main!(benches);
