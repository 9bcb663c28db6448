//! Benchmarks for three-rs operations.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use three_core::{ArrayKind, TypedArray};
use three_geometries::BoxGeometry;
use three_math::{Euler, Matrix4, Quaternion, RotationOrder, Vector3};

/// Benchmark 4x4 matrix products and inversion.
fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix4");

    let mut a = Matrix4::IDENTITY;
    a.compose(
        Vector3::new(1.0, 2.0, 3.0),
        {
            let mut q = Quaternion::IDENTITY;
            q.set_from_euler(&Euler::new(0.3, 0.2, 0.1, RotationOrder::XYZ));
            q
        },
        Vector3::new(1.5, 0.5, 2.0),
    );
    let mut b = Matrix4::IDENTITY;
    b.make_perspective(50.0, 1.5, 0.1, 100.0);

    group.bench_function("multiply", |bench| {
        let mut out = Matrix4::IDENTITY;
        bench.iter(|| *out.multiply_matrices(black_box(&a), black_box(&b)))
    });

    group.bench_function("inverse", |bench| {
        let mut out = Matrix4::IDENTITY;
        bench.iter(|| *out.get_inverse(black_box(&a)))
    });

    group.bench_function("decompose", |bench| bench.iter(|| black_box(&a).decompose()));

    group.finish();
}

/// Benchmark Euler/quaternion round trips.
fn bench_rotation(c: &mut Criterion) {
    let euler = Euler::new(0.5, -0.25, 1.0, RotationOrder::ZXY);

    c.bench_function("euler_to_quaternion_to_euler", |b| {
        b.iter(|| {
            let mut q = Quaternion::IDENTITY;
            q.set_from_euler(black_box(&euler));
            let mut back = Euler::default();
            back.set_from_quaternion(q, Some(RotationOrder::XYZ));
            back
        })
    });
}

/// Benchmark whole-geometry passes over boxes of growing resolution.
fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    for segments in [8usize, 32, 96] {
        let base = BoxGeometry::new(1.0, 1.0, 1.0, segments, segments, segments)
            .build()
            .expect("box builds");
        let vertices = base.attribute("position").map_or(0, |p| p.count());
        group.throughput(Throughput::Elements(vertices as u64));

        group.bench_with_input(BenchmarkId::new("vertex_normals", segments), &base, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    g.compute_vertex_normals().expect("valid geometry");
                    g
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("bounding_sphere", segments), &base, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    g.compute_bounding_sphere();
                    g
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("to_non_indexed", segments), &base, |b, g| {
            b.iter(|| g.to_non_indexed().expect("valid index"))
        });
    }

    group.finish();
}

/// Benchmark typed array conversion from f64.
fn bench_typed_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_array");
    let values: Vec<f64> = (0..100_000).map(|i| (i as f64 * 0.37).sin() * 300.0).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    for kind in [ArrayKind::Float32, ArrayKind::Int16, ArrayKind::Uint8Clamped] {
        group.bench_with_input(BenchmarkId::new("from_f64", kind), &values, |b, v| {
            b.iter(|| TypedArray::from_f64_slice(kind, black_box(v)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_matrix, bench_rotation, bench_geometry, bench_typed_array);

criterion_main!(benches);
