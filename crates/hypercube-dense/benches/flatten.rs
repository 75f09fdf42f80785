//! Benchmarks for bulk transfer out of dense storage
//!
//! Compares contiguous flattening, element-wise reads, and flattening through
//! sliced and rolled views.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hypercube_core::{Accessor, Cube, Dimension};
use hypercube_dense::{DenseConfig, DenseStore};

/// Deterministic pseudo-random fill (LCG), so runs are comparable
fn lcg_values(n: usize, mut state: u64) -> Vec<f64> {
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn square(side: u64, shift: u32) -> Cube<f64> {
    let values = lcg_values((side * side) as usize, 42);
    DenseStore::from_elements_with_config(
        Dimension::of(&[side, side]),
        values,
        &DenseConfig::new().chunk_shift(shift),
    )
    .unwrap()
    .into_cube()
}

fn bench_dense_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_flatten");

    for side in [64u64, 256, 1024].iter() {
        let elements = side * side;
        group.throughput(Throughput::Elements(elements));
        let cube = square(*side, 16);
        let mut out = vec![0.0; elements as usize];

        group.bench_with_input(BenchmarkId::new("bulk", side), side, |b, _| {
            b.iter(|| {
                cube.to_flattened(0, &mut out, 0, elements as usize).unwrap();
                black_box(&out);
            });
        });

        group.bench_with_input(BenchmarkId::new("elementwise", side), side, |b, _| {
            b.iter(|| {
                for (offset, slot) in out.iter_mut().enumerate() {
                    *slot = cube.get_at(offset as u64).unwrap();
                }
                black_box(&out);
            });
        });
    }
    group.finish();
}

fn bench_view_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_flatten");
    let side = 512u64;
    let cube = square(side, 12);
    let dims = cube.dimensions().to_vec();

    let sliced = cube
        .slice(&[
            dims[0].slice(16, side - 16).unwrap().into(),
            dims[1].slice(16, side - 16).unwrap().into(),
        ])
        .unwrap();
    let strided = cube
        .slice(&[Accessor::All, dims[1].slice_step(0, side, 2).unwrap().into()])
        .unwrap();
    let rolled = cube
        .roll(&[Some(dims[0].roll(7)), Some(dims[1].roll(-5))])
        .unwrap();
    let transposed = cube.transpose();

    for (name, view) in [
        ("sliced", &sliced),
        ("strided", &strided),
        ("rolled", &rolled),
        ("transposed", &transposed),
    ] {
        group.throughput(Throughput::Elements(view.size()));
        group.bench_function(name, |b| {
            b.iter(|| black_box(view.flatten().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dense_flatten, bench_view_flatten);
criterion_main!(benches);
